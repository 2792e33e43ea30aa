use crate::error::IndexingError;
use crate::models::{PageNumber, PageRecord};
use lopdf::Document;
use std::path::Path;

/// Narrow seam over the PDF parsing collaborator.
pub trait PdfExtractor {
    /// Extract per-page text in physical page order. A document with zero
    /// readable text yields an empty list, not an error.
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageRecord>, IndexingError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageRecord>, IndexingError> {
        let source_file = file_label(path);

        let document = Document::load(path).map_err(|error| IndexingError::PdfParse {
            file: source_file.clone(),
            details: error.to_string(),
        })?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| IndexingError::PdfParse {
                    file: source_file.clone(),
                    details: error.to_string(),
                })?;

            if text.trim().is_empty() {
                continue;
            }

            pages.push(PageRecord {
                text,
                // lopdf pages are 1-based ordinals; raw metadata is 0-indexed.
                page: PageNumber::Known(page_no.saturating_sub(1)),
                source_file: source_file.clone(),
            });
        }

        Ok(pages)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
