//! PDF text extraction.
//!
//! Reads a PDF into per-page text plus the document statistics the quiz
//! pipeline needs (page count, word count). Layout is not preserved.

use lopdf::Document;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during PDF processing
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF file: {0}")]
    OpenError(String),

    #[error("PDF has no pages")]
    EmptyDocument,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A single page from a PDF document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfPage {
    /// Page index (0-based)
    pub index: u32,
    /// Extracted text, lines separated by `\n`
    pub text: String,
}

impl PdfPage {
    /// Check if this page has no extractable text
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A PDF document with extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfDocument {
    /// Pages in document order
    pub pages: Vec<PdfPage>,
}

impl PdfDocument {
    /// Load a PDF document from a file path
    pub fn load(path: &Path) -> Result<Self, PdfError> {
        debug!("Loading PDF from: {}", path.display());

        if !path.exists() {
            return Err(PdfError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }

        let doc = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(PdfError::EmptyDocument);
        }

        debug!("PDF has {} pages", page_numbers.len());

        // get_pages() is a BTreeMap, so pages come out in order
        let pages: Vec<PdfPage> = page_numbers
            .into_iter()
            .map(|page_num| Self::extract_page(&doc, page_num))
            .collect();

        for page in pages.iter().filter(|p| p.is_empty()) {
            debug!("Page {} has no extractable text", page.index + 1);
        }

        Ok(PdfDocument { pages })
    }

    /// Extract a single page; unreadable pages become empty rather than failing the document
    fn extract_page(doc: &Document, page_num: u32) -> PdfPage {
        let text = match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not extract text from page {}: {}", page_num, e);
                String::new()
            }
        };

        PdfPage {
            index: page_num.saturating_sub(1),
            text: normalize_page_text(&text),
        }
    }

    /// Get all text from the document as a single string
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Get the number of pages
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Count whitespace-separated words across all pages
    pub fn word_count(&self) -> u32 {
        self.pages
            .iter()
            .map(|p| count_words(&p.text))
            .sum()
    }
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Trim trailing whitespace on every line and drop leading/trailing blank lines
fn normalize_page_text(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

/// Build a one-page PDF whose page shows `text` in a standard font
#[cfg(test)]
pub(crate) fn single_page_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc_with_pages(texts: &[&str]) -> PdfDocument {
        PdfDocument {
            pages: texts
                .iter()
                .enumerate()
                .map(|(i, t)| PdfPage {
                    index: i as u32,
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_full_text_joins_pages() {
        let doc = doc_with_pages(&["First page.", "Second page."]);
        assert_eq!(doc.full_text(), "First page.\n\nSecond page.");
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_word_count() {
        let doc = doc_with_pages(&["one two  three", "\nfour\tfive\n", ""]);
        assert_eq!(doc.word_count(), 5);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_empty_page() {
        let doc = doc_with_pages(&["  \n ", "text"]);
        assert!(doc.pages[0].is_empty());
        assert!(!doc.pages[1].is_empty());
    }

    #[test]
    fn test_normalize_page_text() {
        assert_eq!(normalize_page_text("\nTitle   \nBody line \n\n"), "Title\nBody line");
    }

    #[test]
    fn test_load_missing_file() {
        let result = PdfDocument::load(Path::new("/definitely/not/here.pdf"));
        assert!(matches!(result, Err(PdfError::IoError(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf").unwrap();

        let result = PdfDocument::load(file.path());
        assert!(matches!(result, Err(PdfError::OpenError(_))));
    }

    #[test]
    fn test_load_readable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&single_page_pdf("The introduction explains results."))
            .unwrap();

        let doc = PdfDocument::load(file.path()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].index, 0);
        assert!(!doc.pages[0].is_empty());
        let text = doc.full_text();
        assert!(text.contains("introduction"));
        assert!(text.contains("results"));
        assert!(doc.word_count() >= 4);
    }
}
