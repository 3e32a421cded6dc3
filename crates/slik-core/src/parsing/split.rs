use crate::model::CandidateRecord;
use crate::schema::FieldSchema;

/// Separate values whose capture ran on into the next label on the line.
///
/// For every field with an end label, the captured text is split once, at
/// the first literal occurrence of the label: the part before stays in the
/// field, the part after goes to the end label's column. Without the label
/// the whole value is kept and the next column is left untouched.
pub fn split_fields(record: &mut CandidateRecord, schema: &FieldSchema) {
    for field in schema.fields {
        let Some(end) = field.end else {
            continue;
        };
        let Some(raw) = record.get(field.column).map(str::to_string) else {
            continue;
        };

        match raw.split_once(end.label) {
            Some((value, next)) => {
                record.set(field.column, value.trim());
                record.set(end.column, next.trim());
            }
            None => record.set(field.column, raw.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::schema::builtin::{CREDIT, OTHER_FACILITY};

    #[test]
    fn test_split_moves_tail_to_next_column() {
        let mut record = CandidateRecord::default();
        record.set(Column::InstrumentType, "Modal Kerja Nilai Proyek 0");
        split_fields(&mut record, &CREDIT);
        assert_eq!(record.get(Column::InstrumentType), Some("Modal Kerja"));
        assert_eq!(record.get(Column::ProjectValue), Some("0"));
    }

    #[test]
    fn test_split_without_end_label_keeps_value() {
        let mut record = CandidateRecord::default();
        record.set(Column::InstrumentType, "Modal Kerja");
        split_fields(&mut record, &CREDIT);
        assert_eq!(record.get(Column::InstrumentType), Some("Modal Kerja"));
        assert_eq!(record.get(Column::ProjectValue), None);
    }

    #[test]
    fn test_split_first_occurrence_only() {
        let mut record = CandidateRecord::default();
        record.set(
            Column::ExtensionFrequency,
            "0 Plafon Rp100.000,00 Plafon lama",
        );
        split_fields(&mut record, &CREDIT);
        assert_eq!(record.get(Column::ExtensionFrequency), Some("0"));
        assert_eq!(record.get(Column::Ceiling), Some("Rp100.000,00 Plafon lama"));
    }

    #[test]
    fn test_split_is_literal_not_pattern() {
        let mut record = CandidateRecord::default();
        record.set(Column::InstrumentType, "Kartu Kredit Tunggakan Rp0,00");
        split_fields(&mut record, &OTHER_FACILITY);
        assert_eq!(record.get(Column::InstrumentType), Some("Kartu Kredit"));
        assert_eq!(record.get(Column::Arrears), Some("Rp0,00"));
    }

    #[test]
    fn test_split_ignores_absent_fields() {
        let mut record = CandidateRecord::default();
        split_fields(&mut record, &CREDIT);
        assert!(record.is_empty());
    }
}
