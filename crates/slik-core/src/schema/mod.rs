pub mod builtin;

use crate::model::{Category, Column};

/// How a lookback rule recognises its trigger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The trimmed line equals the label.
    Equals(&'static str),
    /// The line contains the label anywhere.
    Contains(&'static str),
}

impl Trigger {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Trigger::Equals(label) => line.trim() == *label,
            Trigger::Contains(label) => line.contains(label),
        }
    }
}

/// Derives a field from a line at a fixed offset after a trigger line.
#[derive(Debug, Clone, Copy)]
pub struct Lookback {
    pub trigger: Trigger,
    pub offset: usize,
    /// Number of leading whitespace-delimited words taken from the target line.
    pub words: usize,
    pub column: Column,
}

impl Lookback {
    /// Value for the line at `index`, if it is a trigger line.
    ///
    /// Returns `None` when the line does not trigger or when the target line
    /// lies past the end of the sequence.
    pub fn apply(&self, lines: &[&str], index: usize) -> Option<String> {
        if !self.trigger.matches(lines.get(index)?) {
            return None;
        }
        let target = lines.get(index.checked_add(self.offset)?)?;
        Some(
            target
                .split_whitespace()
                .take(self.words)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// The line that opens a facility block: bank and branch, then the balance.
///
/// `PT Bank Contoh Tbk - Cabang Jakarta Rp1.500.000,00 OS`
#[derive(Debug, Clone, Copy)]
pub struct BankLine {
    pub separator: &'static str,
    pub currency: &'static str,
    /// Label the previous line must contain, for layouts that print one.
    pub branch_guard: Option<&'static str>,
    pub bank_column: Column,
    pub balance_column: Column,
}

/// Second label of an anchored line; its value belongs to `column`.
#[derive(Debug, Clone, Copy)]
pub struct EndAnchor {
    pub label: &'static str,
    pub column: Column,
}

/// A label whose value runs to the end of the line.
///
/// When `end` is set, the line must also contain the end label, and the
/// captured text is later split at it by the field splitter.
#[derive(Debug, Clone, Copy)]
pub struct AnchorField {
    pub start: &'static str,
    pub column: Column,
    pub end: Option<EndAnchor>,
}

/// Two labels on one line whose values are sliced apart at capture time.
#[derive(Debug, Clone, Copy)]
pub struct InlinePair {
    pub first: &'static str,
    pub first_column: Column,
    pub second: &'static str,
    pub second_column: Column,
    /// Keep only the first whitespace token of the first value.
    pub first_token_only: bool,
}

/// Closes a record: a line containing `label` directly after a line
/// containing `predecessor`.
#[derive(Debug, Clone, Copy)]
pub struct RecordClose {
    pub label: &'static str,
    pub predecessor: &'static str,
    pub column: Column,
}

/// Literal corrections for labels truncated at a line wrap.
#[derive(Debug, Clone, Copy)]
pub struct VocabularyTable {
    pub column: Column,
    pub entries: &'static [(&'static str, &'static str)],
}

impl VocabularyTable {
    /// Canonical phrasing for an exact (trimmed) match, if any.
    pub fn lookup(&self, value: &str) -> Option<&'static str> {
        let value = value.trim();
        self.entries
            .iter()
            .find(|(truncated, _)| *truncated == value)
            .map(|(_, full)| *full)
    }
}

/// Layout of one category's facility blocks.
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub category: Category,
    pub group_name: Lookback,
    pub debtor_name: Lookback,
    pub bank_line: BankLine,
    pub inline_pairs: &'static [InlinePair],
    pub fields: &'static [AnchorField],
    pub close: RecordClose,
    /// Field a record must carry to be kept.
    pub primary: Column,
    /// Remark fragments (case-insensitive) that disqualify a record.
    pub excluded_remarks: &'static [&'static str],
    pub vocabulary: &'static [VocabularyTable],
}

impl FieldSchema {
    /// Columns this layout can populate, in canonical order.
    pub fn columns(&self) -> Vec<Column> {
        let mut cols = vec![
            self.group_name.column,
            self.debtor_name.column,
            self.bank_line.bank_column,
            self.bank_line.balance_column,
            self.close.column,
        ];
        for pair in self.inline_pairs {
            cols.push(pair.first_column);
            cols.push(pair.second_column);
        }
        for field in self.fields {
            cols.push(field.column);
            if let Some(end) = field.end {
                cols.push(end.column);
            }
        }
        cols.sort();
        cols.dedup();
        cols
    }

    pub fn is_excluded_remark(&self, remark: &str) -> bool {
        let lower = remark.to_lowercase();
        self.excluded_remarks
            .iter()
            .any(|frag| lower.contains(&frag.to_lowercase()))
    }
}
