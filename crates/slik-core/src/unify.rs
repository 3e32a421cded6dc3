use crate::model::{CellValue, Column, ColumnKind, NormalizedRecord, Table, UNIFIED_COLUMNS};
use crate::parsing::values::{parse_clean_number, PercentScale};

/// Merge normalized records of all categories into the unified table.
///
/// Rows keep the order of `records`. Every row carries the full canonical
/// column set; columns a category never fills stay empty. The `Kategori`
/// column holds the category label, percentages are scaled by `scale`, and a
/// column whose filled cells are all plain numbers is turned numeric, except
/// for identifier columns, which always stay text.
pub fn unify(records: &[NormalizedRecord], scale: PercentScale) -> Table {
    let columns = UNIFIED_COLUMNS.to_vec();
    let mut rows: Vec<Vec<CellValue>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|&column| unified_cell(record, column, scale))
                .collect()
        })
        .collect();

    for (idx, column) in columns.iter().enumerate() {
        if coercible(*column) {
            coerce_numeric(&mut rows, idx);
        }
    }

    Table { columns, rows }
}

fn unified_cell(record: &NormalizedRecord, column: Column, scale: PercentScale) -> CellValue {
    if column == Column::Category {
        return CellValue::Text(record.category.label().to_string());
    }
    match record.get(column) {
        CellValue::Text(s) => CellValue::text(s),
        CellValue::Number(p) if column.kind() == ColumnKind::Percentage => {
            CellValue::Number(scale.apply(*p))
        }
        other => other.clone(),
    }
}

/// Digit strings that name something rather than count it.
const IDENTIFIER_COLUMNS: &[Column] = &[
    Column::Category,
    Column::BankCode,
    Column::AccountNumber,
    Column::InitialAgreementNo,
    Column::FinalAgreementNo,
];

fn coercible(column: Column) -> bool {
    !IDENTIFIER_COLUMNS.contains(&column) && column.kind() != ColumnKind::Date
}

/// Convert column `idx` to numbers when every non-empty cell is a plain number.
///
/// Text such as "008" or "1 - Lancar" keeps the whole column as text.
fn coerce_numeric(rows: &mut [Vec<CellValue>], idx: usize) {
    let mut any = false;
    for row in rows.iter() {
        match &row[idx] {
            CellValue::Empty | CellValue::Number(_) => {}
            CellValue::Text(s) if parse_clean_number(s).is_some() => any = true,
            _ => return,
        }
    }
    if !any {
        return;
    }

    for row in rows.iter_mut() {
        if let CellValue::Text(s) = &row[idx] {
            if let Some(n) = parse_clean_number(s) {
                row[idx] = CellValue::Number(n);
            }
        }
    }
}
