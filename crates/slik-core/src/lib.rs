pub mod bank;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod options;
pub mod parsing;
pub mod schema;
pub mod unify;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use bank::BankDirectory;
use error::SlikError;
use extraction::{line_stream, PageContent, PdfExtractor};
use model::{Category, ConversionWarning, NormalizedRecord, Table};
use options::{validate_options, ConvertOptions};
use parsing::extract_category;
use schema::builtin::schema_for;
use unify::unify;

/// A report as uploaded: a display name and the raw PDF bytes.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceDocument {
            name: name.into(),
            bytes,
        }
    }
}

/// A report after text extraction.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub name: String,
    pub pages: Vec<PageContent>,
}

/// Outcome of one conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionResult {
    pub table: Table,
    pub warnings: Vec<ConversionWarning>,
    /// Rows contributed by each requested category.
    pub category_counts: BTreeMap<Category, usize>,
}

/// Main API entry point: convert a batch of reports into one unified table.
///
/// Each document is extracted and scanned independently. A document that
/// cannot be read contributes nothing and is reported as a warning; only a
/// missing `pdftotext` binary aborts the run. An empty table means there was
/// nothing to export.
pub fn convert(
    documents: &[SourceDocument],
    extractor: &dyn PdfExtractor,
    options: &ConvertOptions,
) -> Result<ConversionResult, SlikError> {
    validate_options(options)?;

    let mut warnings = Vec::new();
    let mut extracted = Vec::with_capacity(documents.len());
    for doc in documents {
        match extractor.extract_pages(&doc.bytes) {
            Ok(pages) => {
                debug!(
                    document = %doc.name,
                    backend = extractor.backend_name(),
                    pages = pages.len(),
                    "text extracted"
                );
                extracted.push(ExtractedDocument {
                    name: doc.name.clone(),
                    pages,
                });
            }
            Err(SlikError::PdftotextNotFound) => return Err(SlikError::PdftotextNotFound),
            Err(e) => push_warning(&mut warnings, &doc.name, e.to_string()),
        }
    }

    let directory = match load_directory(options) {
        Ok(directory) => Some(directory),
        Err(warning) => {
            push_warning(&mut warnings, &warning.source, warning.reason);
            None
        }
    };

    let mut result = convert_extracted(&extracted, directory.as_ref(), options);
    warnings.append(&mut result.warnings);
    result.warnings = warnings;
    Ok(result)
}

/// Load the bank directory named in the options.
///
/// Failure is not fatal for a run, so it comes back as the warning to report.
/// A directory without entries counts as a failure.
pub fn load_directory(options: &ConvertOptions) -> Result<BankDirectory, ConversionWarning> {
    let Some(path) = &options.bank_directory else {
        return Err(ConversionWarning {
            source: "bank directory".into(),
            reason: "no bank directory configured, bank names passed through".into(),
        });
    };
    let directory =
        BankDirectory::load(path, &options.label_column, &options.name_column).map_err(|e| {
            ConversionWarning {
                source: path.display().to_string(),
                reason: format!("{e}, bank names passed through"),
            }
        })?;
    if directory.is_empty() {
        return Err(ConversionWarning {
            source: path.display().to_string(),
            reason: "bank directory has no entries, bank names passed through".into(),
        });
    }
    Ok(directory)
}

/// Scan already extracted documents and merge the result.
///
/// Rows are grouped by category (in category order) and, within a category,
/// follow document order. Without a directory, bank lines stay as captured.
pub fn convert_extracted(
    documents: &[ExtractedDocument],
    directory: Option<&BankDirectory>,
    options: &ConvertOptions,
) -> ConversionResult {
    let mut warnings = Vec::new();
    let mut by_category: BTreeMap<Category, Vec<NormalizedRecord>> = options
        .categories
        .iter()
        .map(|&c| (c, Vec::new()))
        .collect();

    for doc in documents {
        if doc.pages.is_empty() {
            push_warning(&mut warnings, &doc.name, "no extractable text".into());
            continue;
        }

        // Lookback names never leak across documents: each scan starts fresh.
        let lines = line_stream(&doc.pages);
        let mut found = 0;
        for (category, records) in by_category.iter_mut() {
            let out = extract_category(&lines, schema_for(*category));
            found += out.records.len();
            records.extend(out.records);
        }
        info!(document = %doc.name, lines = lines.len(), records = found, "document scanned");
    }

    let mut category_counts = BTreeMap::new();
    let mut records = Vec::new();
    for (category, mut recs) in by_category {
        if let Some(directory) = directory {
            recs.iter_mut().for_each(|r| directory.apply(r));
        }
        category_counts.insert(category, recs.len());
        records.extend(recs);
    }

    let table = unify(&records, options.percent_scale);
    info!(rows = table.len(), "conversion finished");

    ConversionResult {
        table,
        warnings,
        category_counts,
    }
}

fn push_warning(warnings: &mut Vec<ConversionWarning>, source: &str, reason: String) {
    warn!(source, reason = %reason, "conversion warning");
    warnings.push(ConversionWarning {
        source: source.to_string(),
        reason,
    });
}
