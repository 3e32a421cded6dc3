use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::error::SlikError;
use crate::model::{CellValue, Column, NormalizedRecord};

/// One row of the reference bank directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankEntry {
    /// Reporter label as printed on the bank line, e.g. `008 - PT Bank Mandiri (Persero) Tbk`.
    pub label: String,
    pub bank_name: String,
}

/// Reference directory used to split a bank line into bank and branch.
#[derive(Debug, Clone, Default)]
pub struct BankDirectory {
    entries: Vec<BankEntry>,
    names: HashMap<String, String>,
}

impl BankDirectory {
    pub fn from_entries(entries: Vec<BankEntry>) -> Self {
        // Later rows win for duplicate labels; the substring search keeps file order.
        let names = entries
            .iter()
            .map(|e| (e.label.clone(), e.bank_name.clone()))
            .collect();
        BankDirectory { entries, names }
    }

    /// Read the directory from the first sheet of a spreadsheet (xlsx, xls, ods).
    ///
    /// The first row holds headers; `label_column` and `name_column` select the
    /// two columns by header text. Rows without a label are skipped.
    pub fn load(path: &Path, label_column: &str, name_column: &str) -> Result<Self, SlikError> {
        let fail = |reason: String| SlikError::BankDirectory {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| fail(e.to_string()))?;
        let sheet = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| fail("workbook has no sheets".into()))?
            .map_err(|e| fail(e.to_string()))?;

        let mut rows = sheet.rows();
        let header = rows.next().ok_or_else(|| fail("sheet is empty".into()))?;
        let find = |name: &str| {
            header
                .iter()
                .position(|c| cell_as_string(c).is_some_and(|h| h.eq_ignore_ascii_case(name)))
                .ok_or_else(|| fail(format!("column '{name}' not found")))
        };
        let label_idx = find(label_column)?;
        let name_idx = find(name_column)?;

        let entries: Vec<BankEntry> = rows
            .filter_map(|row| {
                let label = row.get(label_idx).and_then(cell_as_string)?;
                let bank_name = row
                    .get(name_idx)
                    .and_then(cell_as_string)
                    .unwrap_or_default();
                Some(BankEntry { label, bank_name })
            })
            .collect();

        debug!(path = %path.display(), entries = entries.len(), "bank directory loaded");
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split a bank line into (label, branch).
    ///
    /// The first directory label contained in `raw` is the bank; what is left
    /// once the label is removed is the branch. Unknown banks pass through
    /// whole with an empty branch.
    pub fn resolve(&self, raw: &str) -> (String, String) {
        match self.entries.iter().find(|e| raw.contains(e.label.as_str())) {
            Some(entry) => {
                let branch = raw.replace(entry.label.as_str(), "");
                let branch = branch.trim().trim_start_matches('-').trim();
                (entry.label.clone(), branch.to_string())
            }
            None => (raw.trim().to_string(), String::new()),
        }
    }

    /// Canonical bank name for an exact label.
    pub fn bank_name(&self, label: &str) -> Option<&str> {
        self.names.get(label).map(|s| s.as_str())
    }

    /// Fill the bank columns of a record from its captured bank line.
    ///
    /// Sets the branch, the code and name split at ` - `, and replaces the
    /// bank column with the canonical name (empty for unknown labels).
    pub fn apply(&self, record: &mut NormalizedRecord) {
        let Some(raw) = record.text(Column::Bank).map(str::to_string) else {
            return;
        };
        let (label, branch) = self.resolve(&raw);

        let (code, name) = match label.split_once(" - ") {
            Some((code, name)) => (code, name),
            None => (label.as_str(), ""),
        };
        record.set(Column::BankCode, CellValue::text(code));
        record.set(Column::BankName, CellValue::text(name));
        record.set(Column::Branch, CellValue::text(&branch));
        record.set(
            Column::Bank,
            self.bank_name(&label)
                .map(CellValue::text)
                .unwrap_or_default(),
        );
    }
}

fn cell_as_string(cell: &Data) -> Option<String> {
    let s = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Empty => return None,
        other => other.to_string(),
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn directory() -> BankDirectory {
        BankDirectory::from_entries(vec![
            BankEntry {
                label: "008 - PT Bank Mandiri (Persero) Tbk".into(),
                bank_name: "MANDIRI".into(),
            },
            BankEntry {
                label: "014 - PT Bank Central Asia Tbk".into(),
                bank_name: "BCA".into(),
            },
        ])
    }

    #[test]
    fn test_resolve_known_bank() {
        let (label, branch) = directory().resolve("014 - PT Bank Central Asia Tbk - KCU Sudirman");
        assert_eq!(label, "014 - PT Bank Central Asia Tbk");
        assert_eq!(branch, "KCU Sudirman");
    }

    #[test]
    fn test_resolve_unknown_bank_passes_through() {
        let (label, branch) = directory().resolve("PT BPR Contoh - Cabang Bogor");
        assert_eq!(label, "PT BPR Contoh - Cabang Bogor");
        assert_eq!(branch, "");
    }

    #[test]
    fn test_resolve_takes_first_match_in_file_order() {
        let dir = BankDirectory::from_entries(vec![
            BankEntry {
                label: "PT Bank Contoh".into(),
                bank_name: "CONTOH".into(),
            },
            BankEntry {
                label: "PT Bank Contoh Syariah".into(),
                bank_name: "CONTOH SYARIAH".into(),
            },
        ]);
        let (label, branch) = dir.resolve("PT Bank Contoh Syariah - KC Medan");
        assert_eq!(label, "PT Bank Contoh");
        assert_eq!(branch, "Syariah - KC Medan");
    }

    #[test]
    fn test_duplicate_label_last_name_wins() {
        let dir = BankDirectory::from_entries(vec![
            BankEntry {
                label: "A".into(),
                bank_name: "first".into(),
            },
            BankEntry {
                label: "A".into(),
                bank_name: "second".into(),
            },
        ]);
        assert_eq!(dir.bank_name("A"), Some("second"));
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_apply_fills_bank_columns() {
        let mut rec = NormalizedRecord::new(Category::Credit);
        rec.set(
            Column::Bank,
            CellValue::text("008 - PT Bank Mandiri (Persero) Tbk - KC Jakarta Thamrin"),
        );
        directory().apply(&mut rec);
        assert_eq!(rec.text(Column::BankCode), Some("008"));
        assert_eq!(rec.text(Column::BankName), Some("PT Bank Mandiri (Persero) Tbk"));
        assert_eq!(rec.text(Column::Branch), Some("KC Jakarta Thamrin"));
        assert_eq!(rec.text(Column::Bank), Some("MANDIRI"));
    }

    #[test]
    fn test_apply_unknown_bank_clears_canonical_name() {
        let mut rec = NormalizedRecord::new(Category::Guarantee);
        rec.set(Column::Bank, CellValue::text("999 - PT BPR Lain - Pusat"));
        directory().apply(&mut rec);
        assert_eq!(rec.text(Column::BankCode), Some("999"));
        assert_eq!(rec.text(Column::BankName), Some("PT BPR Lain - Pusat"));
        assert!(rec.get(Column::Branch).is_empty());
        assert!(rec.get(Column::Bank).is_empty());
    }

    #[test]
    fn test_apply_without_bank_is_noop() {
        let mut rec = NormalizedRecord::new(Category::Credit);
        directory().apply(&mut rec);
        assert_eq!(rec.columns().count(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = BankDirectory::load(Path::new("/nonexistent/kode_bank.xlsx"), "KETERANGAN", "NAMA BANK")
            .unwrap_err();
        assert!(matches!(err, SlikError::BankDirectory { .. }));
    }
}
