pub mod dates;
pub mod normalize;
pub mod split;
pub mod values;

use crate::model::{CandidateRecord, NormalizedRecord};
use crate::schema::FieldSchema;
use normalize::normalize_record;
use split::split_fields;
use tracing::debug;

/// Records of one category extracted from one document.
#[derive(Debug, Clone, Default)]
pub struct CategoryRecords {
    pub records: Vec<NormalizedRecord>,
    /// Number of times the close rule fired.
    pub closed: usize,
    /// Closed records without the primary field.
    pub incomplete: usize,
    /// Records dropped by the remark filter.
    pub excluded: usize,
}

/// Scan, split and normalize one category over a document's line stream.
pub fn extract_category(lines: &[&str], schema: &FieldSchema) -> CategoryRecords {
    let candidates = scan_category(lines, schema);
    let closed = candidates.len();

    let complete: Vec<CandidateRecord> = candidates
        .into_iter()
        .filter(|r| r.contains(schema.primary))
        .collect();
    let incomplete = closed - complete.len();

    let mut records = Vec::with_capacity(complete.len());
    let mut excluded = 0;
    for mut candidate in complete {
        split_fields(&mut candidate, schema);
        let record = normalize_record(&candidate, schema);
        let remark = record.text(schema.close.column).unwrap_or("");
        if schema.is_excluded_remark(remark) {
            excluded += 1;
            continue;
        }
        records.push(record);
    }

    debug!(
        category = %schema.category,
        closed,
        incomplete,
        excluded,
        kept = records.len(),
        "category extracted"
    );

    CategoryRecords {
        records,
        closed,
        incomplete,
        excluded,
    }
}

/// Run the line scanner for one layout, returning every closed record.
///
/// Fields accumulated after the last close are dropped (truncated block).
pub fn scan_category(lines: &[&str], schema: &FieldSchema) -> Vec<CandidateRecord> {
    (0..lines.len())
        .fold(Scan::new(schema), |mut scan, i| {
            scan.step(lines, i);
            scan
        })
        .closed
}

/// Accumulator threaded through the line fold.
struct Scan<'s> {
    schema: &'s FieldSchema,
    current: CandidateRecord,
    closed: Vec<CandidateRecord>,
}

impl<'s> Scan<'s> {
    fn new(schema: &'s FieldSchema) -> Self {
        Scan {
            schema,
            current: CandidateRecord::default(),
            closed: Vec::new(),
        }
    }

    fn step(&mut self, lines: &[&str], i: usize) {
        let line = lines[i];
        let prev = i.checked_sub(1).map(|p| lines[p]);

        for lookback in [&self.schema.group_name, &self.schema.debtor_name] {
            if let Some(value) = lookback.apply(lines, i) {
                self.current.set(lookback.column, value);
            }
        }

        // First matching rule consumes the line.
        if self.try_bank_line(line, prev) || self.try_inline_pair(line) || self.try_anchor(line) {
            return;
        }
        self.try_close(line, prev);
    }

    fn try_bank_line(&mut self, line: &str, prev: Option<&str>) -> bool {
        let rule = &self.schema.bank_line;
        if !line.contains(rule.separator) {
            return false;
        }
        let Some((bank, rest)) = line.split_once(rule.currency) else {
            return false;
        };
        if let Some(guard) = rule.branch_guard {
            if !prev.is_some_and(|p| p.contains(guard)) {
                return false;
            }
        }

        let balance = rest.split_whitespace().next().unwrap_or("");
        self.current.set(rule.bank_column, bank.trim());
        self.current.set(rule.balance_column, balance);
        true
    }

    fn try_inline_pair(&mut self, line: &str) -> bool {
        for pair in self.schema.inline_pairs {
            let Some(start) = line.find(pair.first) else {
                continue;
            };
            let rest = &line[start + pair.first.len()..];
            let Some(sep) = rest.find(pair.second) else {
                continue;
            };

            let first = rest[..sep].trim();
            let first = if pair.first_token_only {
                first.split_whitespace().next().unwrap_or("")
            } else {
                first
            };
            let second = rest[sep + pair.second.len()..].trim();
            self.current.set(pair.first_column, first);
            self.current.set(pair.second_column, second);
            return true;
        }
        false
    }

    fn try_anchor(&mut self, line: &str) -> bool {
        for field in self.schema.fields {
            let Some(start) = line.find(field.start) else {
                continue;
            };
            // The end label only disambiguates the line; the splitter cuts at it.
            if let Some(end) = field.end {
                if !line.contains(end.label) {
                    continue;
                }
            }
            let value = line[start + field.start.len()..].trim();
            self.current.set(field.column, value);
            return true;
        }
        false
    }

    fn try_close(&mut self, line: &str, prev: Option<&str>) {
        let rule = &self.schema.close;
        let Some(start) = line.find(rule.label) else {
            return;
        };
        if !prev.is_some_and(|p| p.contains(rule.predecessor)) {
            return;
        }

        self.current
            .set(rule.column, line[start + rule.label.len()..].trim());
        self.closed.push(self.current.clone());

        // Debtor and group names hold for every block of the document.
        let mut next = CandidateRecord::default();
        for column in [self.schema.group_name.column, self.schema.debtor_name.column] {
            if let Some(value) = self.current.get(column) {
                next.set(column, value);
            }
        }
        self.current = next;
    }
}
