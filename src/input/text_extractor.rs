//! Text extraction from PDF bytes and from job description files

use crate::error::{CareerCompassError, Result};
use log::debug;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Once;
use tokio::fs;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// The header may be preceded by some junk bytes
const HEADER_SEARCH_WINDOW: usize = 1024;

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}
static QUIET_HOOK: Once = Once::new();

/// Concatenated text of all pages of an in-memory PDF, in page order.
///
/// Fails with [`CareerCompassError::Extraction`] for anything that is not a
/// readable, unencrypted PDF. Parser panics are caught and reported the same way.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let header_end = bytes.len().min(HEADER_SEARCH_WINDOW + PDF_MAGIC.len());
    if !bytes[..header_end].windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
        return Err(CareerCompassError::Extraction(
            "not a PDF document (missing %PDF header)".to_string(),
        ));
    }

    let extracted = catch_parser_panic(|| {
        if is_encrypted(bytes) {
            return Err(CareerCompassError::Extraction(
                "PDF document is encrypted".to_string(),
            ));
        }
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| CareerCompassError::Extraction(format!("unreadable PDF: {}", e)))
    });

    match extracted {
        Ok(result) => result,
        Err(message) => Err(CareerCompassError::Extraction(format!(
            "PDF parser failed on malformed document: {}",
            message
        ))),
    }
}

/// Only the trailer's `/Encrypt` entry counts; page content may mention the word
fn is_encrypted(bytes: &[u8]) -> bool {
    match lopdf::Document::load_mem(bytes) {
        Ok(doc) => doc.trailer.get(b"Encrypt").is_ok(),
        Err(e) => {
            debug!("lopdf could not load document: {}", e);
            false
        }
    }
}

/// Run a parser call, turning a panic into its message.
///
/// The default panic hook stays silent for panics caught here.
fn catch_parser_panic<T>(f: impl FnOnce() -> T) -> std::result::Result<T, String> {
    QUIET_HOOK.call_once(|| {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                default_hook(info);
            }
        }));
    });

    QUIET_PANICS.with(|quiet| quiet.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    QUIET_PANICS.with(|quiet| quiet.set(false));

    outcome.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        debug!("PDF parser panicked: {}", message);
        message
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        extract_pdf_text(&bytes).map_err(|e| match e {
            CareerCompassError::Extraction(msg) => {
                CareerCompassError::Extraction(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Render markdown and keep only its text
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    // Block-level closing tags end a line so words don't run together
    let block_end_regex = Regex::new(r"</(p|li|h[1-6]|blockquote|pre|tr)>|<br\s*/?>").expect("Invalid block regex");
    let text = block_end_regex.replace_all(&html_output, "\n");

    let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
    let stripped = tag_regex.replace_all(&text, "");

    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_bytes_rejected() {
        let result = extract_pdf_text(b"this is a plain text file, not a pdf");
        assert!(matches!(result, Err(CareerCompassError::Extraction(_))));
    }

    #[test]
    fn test_empty_bytes_rejected() {
        assert!(matches!(extract_pdf_text(b""), Err(CareerCompassError::Extraction(_))));
    }

    #[test]
    fn test_parser_panic_is_caught_quietly() {
        let result: std::result::Result<(), String> =
            catch_parser_panic(|| panic!("bad xref at {}", 42));

        assert_eq!(result, Err("bad xref at 42".to_string()));
        assert!(!QUIET_PANICS.with(Cell::get));
        assert_eq!(catch_parser_panic(|| 7), Ok(7));
    }

    #[test]
    fn test_truncated_pdf_rejected() {
        let bytes = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R";
        assert!(matches!(extract_pdf_text(bytes), Err(CareerCompassError::Extraction(_))));
    }

    #[test]
    fn test_markdown_to_text() {
        let text = markdown_to_text("# Data Engineer\n\n**Required:** Spark & SQL\n\n- Airflow\n- dbt");
        assert!(text.contains("Data Engineer"));
        assert!(text.contains("Spark & SQL"));
        assert!(text.contains("Airflow"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
        assert_eq!(text.lines().next(), Some("Data Engineer"));
    }
}
