use crate::model::{CandidateRecord, CellValue, Column, ColumnKind, NormalizedRecord};
use crate::parsing::dates::parse_report_date;
use crate::parsing::values::{clean_amount, clean_percentage};
use crate::schema::FieldSchema;
use regex::Regex;
use std::sync::LazyLock;

/// Identity and gender markers that the name lookbacks drag along from the
/// rest of the line.
static NAME_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*\b(?:NIK|NPWP|KTP|No(?:mor)?\.?\s*Identitas|Jenis\s+Kelamin|Laki-laki|Perempuan)\b.*$",
    )
    .expect("name tail pattern is valid")
});

/// Turn a split candidate record into typed cells.
///
/// Steps per field:
/// 1. Trim
/// 2. Replace truncated labels through the layout's vocabulary tables
/// 3. Clean by column kind: amounts lose currency and separators, percentages
///    become numbers, dates are parsed (unparseable dates and percentages
///    become empty)
pub fn normalize_record(candidate: &CandidateRecord, schema: &FieldSchema) -> NormalizedRecord {
    let mut record = NormalizedRecord::new(schema.category);

    for (column, raw) in candidate.iter() {
        let mut value = raw.trim();
        if let Some(full) = schema
            .vocabulary
            .iter()
            .filter(|table| table.column == column)
            .find_map(|table| table.lookup(value))
        {
            value = full;
        }

        let cell = match column.kind() {
            ColumnKind::Amount => CellValue::text(&clean_amount(value)),
            ColumnKind::Percentage => clean_percentage(value)
                .map(CellValue::Number)
                .unwrap_or_default(),
            ColumnKind::Date => parse_report_date(value)
                .map(CellValue::Date)
                .unwrap_or_default(),
            ColumnKind::Text if matches!(column, Column::DebtorName | Column::GroupName) => {
                CellValue::text(&clean_name(value))
            }
            ColumnKind::Text => CellValue::text(value),
        };
        record.set(column, cell);
    }

    record
}

/// Strip identity numbers and gender markers trailing a debtor or group name.
pub fn clean_name(raw: &str) -> String {
    NAME_TAIL_RE.replace(raw.trim(), "").trim().to_string()
}
