pub mod pdftotext;

use crate::error::SlikError;

/// Text extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
}

impl PageContent {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        PageContent {
            page_number,
            text: text.into(),
        }
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text from PDF bytes, returning one PageContent per page in
    /// document order. A PDF without extractable text yields no pages.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SlikError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Flatten pages into one ordered line sequence.
///
/// Pages are split on newlines and concatenated in document order; line
/// positions in the result are what lookback offsets refer to.
pub fn line_stream(pages: &[PageContent]) -> Vec<&str> {
    pages
        .iter()
        .flat_map(|p| p.text.split('\n'))
        .map(|l| l.trim_end_matches('\r'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_stream_preserves_page_order() {
        let pages = vec![
            PageContent::new(1, "Nomor Laporan\nabc"),
            PageContent::new(2, "def\r\nghi"),
        ];
        assert_eq!(
            line_stream(&pages),
            vec!["Nomor Laporan", "abc", "def", "ghi"]
        );
    }

    #[test]
    fn test_line_stream_empty() {
        assert!(line_stream(&[]).is_empty());
    }
}
