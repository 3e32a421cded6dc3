use crate::error::SlikError;
use crate::model::Category;
use crate::parsing::values::PercentScale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Spreadsheet mapping bank-line labels to canonical bank names.
    pub bank_directory: Option<PathBuf>,
    pub percent_scale: PercentScale,
    /// Header of the directory column holding the bank-line label.
    pub label_column: String,
    /// Header of the directory column holding the canonical bank name.
    pub name_column: String,
    pub categories: Vec<Category>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            bank_directory: None,
            percent_scale: PercentScale::default(),
            label_column: "KETERANGAN".into(),
            name_column: "NAMA BANK".into(),
            categories: Category::ALL.to_vec(),
        }
    }
}

/// Load conversion options from a JSON file.
pub fn load_options(path: &Path) -> Result<ConvertOptions, SlikError> {
    let content = std::fs::read_to_string(path).map_err(|e| SlikError::OptionsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let options: ConvertOptions =
        serde_json::from_str(&content).map_err(|e| SlikError::OptionsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_options(&options)?;
    Ok(options)
}

/// Parse conversion options from a JSON string (no file path context).
pub fn parse_options_str(json: &str) -> Result<ConvertOptions, SlikError> {
    let options: ConvertOptions = serde_json::from_str(json)?;
    validate_options(&options)?;
    Ok(options)
}

pub fn validate_options(options: &ConvertOptions) -> Result<(), SlikError> {
    if options.categories.is_empty() {
        return Err(SlikError::OptionsInvalid(
            "categories must not be empty".into(),
        ));
    }
    for (i, category) in options.categories.iter().enumerate() {
        if options.categories[..i].contains(category) {
            return Err(SlikError::OptionsInvalid(format!(
                "category '{}' listed twice",
                category.key()
            )));
        }
    }
    if options.label_column.trim().is_empty() {
        return Err(SlikError::OptionsInvalid(
            "label_column must not be blank".into(),
        ));
    }
    if options.name_column.trim().is_empty() {
        return Err(SlikError::OptionsInvalid(
            "name_column must not be blank".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.percent_scale, PercentScale::Fraction);
        assert_eq!(opts.categories.len(), 5);
        assert_eq!(opts.label_column, "KETERANGAN");
        assert!(validate_options(&opts).is_ok());
    }

    #[test]
    fn test_parse_partial_json_keeps_defaults() {
        let opts = parse_options_str(
            r#"{"percent_scale": "raw", "bank_directory": "kode_bank.xlsx"}"#,
        )
        .unwrap();
        assert_eq!(opts.percent_scale, PercentScale::Raw);
        assert_eq!(opts.bank_directory, Some(PathBuf::from("kode_bank.xlsx")));
        assert_eq!(opts.name_column, "NAMA BANK");
    }

    #[test]
    fn test_parse_categories() {
        let opts = parse_options_str(r#"{"categories": ["credit", "letter_of_credit"]}"#).unwrap();
        assert_eq!(
            opts.categories,
            vec![Category::Credit, Category::LetterOfCredit]
        );
    }

    #[test]
    fn test_empty_categories_rejected() {
        let err = parse_options_str(r#"{"categories": []}"#).unwrap_err();
        assert!(matches!(err, SlikError::OptionsInvalid(_)));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let err = parse_options_str(r#"{"categories": ["credit", "credit"]}"#).unwrap_err();
        assert!(matches!(err, SlikError::OptionsInvalid(_)));
    }

    #[test]
    fn test_blank_column_rejected() {
        let err = parse_options_str(r#"{"label_column": "  "}"#).unwrap_err();
        assert!(matches!(err, SlikError::OptionsInvalid(_)));
    }

    #[test]
    fn test_unknown_scale_is_json_error() {
        let err = parse_options_str(r#"{"percent_scale": "basis_points"}"#).unwrap_err();
        assert!(matches!(err, SlikError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_options(Path::new("/nonexistent/slik.json")).unwrap_err();
        assert!(matches!(err, SlikError::OptionsLoad { .. }));
    }
}
