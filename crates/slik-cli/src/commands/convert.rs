use slik_core::error::SlikError;
use slik_core::export::{TableSink, XlsxSink};
use slik_core::extraction::pdftotext::PdftotextExtractor;
use slik_core::model::Category;
use slik_core::options::{load_options, validate_options, ConvertOptions};
use slik_core::parsing::values::PercentScale;
use slik_core::{ConversionResult, SourceDocument};
use std::path::PathBuf;
use tracing::debug;

use crate::output;

pub struct ConvertArgs {
    pub input_files: Vec<PathBuf>,
    pub bank_directory: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub percent_scale: Option<String>,
    pub categories: Vec<String>,
    pub output_format: String,
    pub out: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> Result<(), SlikError> {
    let options = build_options(&args)?;
    debug!(?options, "options resolved");

    let mut documents = Vec::with_capacity(args.input_files.len());
    for path in &args.input_files {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(SourceDocument::new(name, bytes));
    }

    let extractor = PdftotextExtractor::new();
    let result = slik_core::convert(&documents, &extractor, &options)?;

    match args.out {
        Some(path) => {
            if result.table.is_empty() {
                eprintln!("nothing to export");
            } else {
                let sink = XlsxSink::new();
                sink.write_table(&result.table, &path)?;
                eprintln!(
                    "Converted {} row(s) from {} document(s), written to {} ({})",
                    result.table.len(),
                    documents.len(),
                    path.display(),
                    sink.sink_name()
                );
            }
            print_summary(&result);
        }
        None => match args.output_format.as_str() {
            "json" => output::json::print(&result)?,
            _ => output::table::print(&result),
        },
    }

    Ok(())
}

/// Options file first, then command-line overrides.
fn build_options(args: &ConvertArgs) -> Result<ConvertOptions, SlikError> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => ConvertOptions::default(),
    };

    if let Some(dir) = &args.bank_directory {
        options.bank_directory = Some(dir.clone());
    }
    if let Some(scale) = &args.percent_scale {
        options.percent_scale = PercentScale::from_str_loose(scale).ok_or_else(|| {
            SlikError::OptionsInvalid(format!(
                "unknown percent scale '{scale}' (expected 'raw' or 'fraction')"
            ))
        })?;
    }
    if !args.categories.is_empty() {
        options.categories = args
            .categories
            .iter()
            .map(|name| {
                Category::from_str_loose(name).ok_or_else(|| {
                    SlikError::OptionsInvalid(format!("unknown category '{name}'"))
                })
            })
            .collect::<Result<_, _>>()?;
    }

    validate_options(&options)?;
    Ok(options)
}

fn print_summary(result: &ConversionResult) {
    for (category, count) in &result.category_counts {
        eprintln!("  {:<24} {count}", category.label());
    }
    for w in &result.warnings {
        eprintln!("  warning: {}: {}", w.source, w.reason);
    }
}
