//! Per-page PDF text extraction.
//!
//! The parser sits behind [`PageSource`] so the concatenator only depends on
//! "open a document and give me each page's text". [`LopdfSource`] is the
//! shipped implementation.

use crate::error::Result;
use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Something that can open a PDF and return the text of every page, in
/// document order.
///
/// A fault anywhere (open, page enumeration, any single page) fails the
/// whole document. Page text carries no trailing block terminator; the
/// per-page newline is added when the body is rendered.
pub trait PageSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>>;
}

/// `lopdf`-backed page source.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfSource;

impl LopdfSource {
    pub fn new() -> Self {
        Self
    }
}

impl PageSource for LopdfSource {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let doc = Document::load(path)?;

        // BTreeMap keyed by page number, so iteration is already in page order.
        let pages = doc.get_pages();
        log::debug!("{}: {} page(s)", path.display(), pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            let text = doc.extract_text(&[*page_number])?;
            texts.push(strip_page_terminator(text));
        }

        Ok(texts)
    }
}

/// lopdf closes every extracted page with a newline at its last `ET`.
/// Drop exactly that one so the page matches the raw text layer.
fn strip_page_terminator(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// Result of extracting one existing file, before it is rendered into a
/// block body.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Extracted { pages: Vec<String> },
    Failed { message: String },
}

impl ExtractionOutcome {
    /// Render to the block body: each page followed by `\n`, or
    /// `Error reading {path}: {message}` with no trailing newline.
    pub fn render(&self, path: &Path) -> String {
        match self {
            ExtractionOutcome::Extracted { pages } => {
                let capacity = pages.iter().map(|p| p.len() + 1).sum();
                let mut text = String::with_capacity(capacity);
                for page in pages {
                    text.push_str(page);
                    text.push('\n');
                }
                text
            }
            ExtractionOutcome::Failed { message } => {
                format!("Error reading {}: {}", path.display(), message)
            }
        }
    }

    pub fn page_count(&self) -> Option<usize> {
        match self {
            ExtractionOutcome::Extracted { pages } => Some(pages.len()),
            ExtractionOutcome::Failed { .. } => None,
        }
    }
}

/// Run `source` against `path`, turning errors and parser panics into
/// [`ExtractionOutcome::Failed`]. Never fails.
pub fn extract_outcome(source: &dyn PageSource, path: &Path) -> ExtractionOutcome {
    let result = quietly_catch_unwind(|| source.page_texts(path));

    match result {
        Ok(Ok(pages)) => ExtractionOutcome::Extracted { pages },
        Ok(Err(e)) => ExtractionOutcome::Failed {
            message: e.to_string(),
        },
        Err(payload) => ExtractionOutcome::Failed {
            message: panic_message(payload.as_ref()),
        },
    }
}

/// Extract the text of the PDF at `path`, or the inline error string.
pub fn extract_text(source: &dyn PageSource, path: &Path) -> String {
    extract_outcome(source, path).render(path)
}

type PanicPayload = Box<dyn std::any::Any + Send>;

/// `catch_unwind` with the default stderr hook swapped for a debug log line
/// while `f` runs. The previous hook is restored afterwards.
fn quietly_catch_unwind<T>(f: impl FnOnce() -> T) -> std::result::Result<T, PanicPayload> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        log::debug!("PDF parser panicked: {}", info);
    }));

    let result = panic::catch_unwind(AssertUnwindSafe(f));

    panic::set_hook(previous);
    result
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF parser panicked (malformed document)".to_string()
    }
}

/// Replays a fixed set of pages, a fault or a parser panic.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) enum ScriptedSource {
    Pages(Vec<String>),
    Fault(String),
    Panic(String),
}

#[cfg(test)]
impl PageSource for ScriptedSource {
    fn page_texts(&self, _path: &Path) -> Result<Vec<String>> {
        match self {
            ScriptedSource::Pages(pages) => Ok(pages.clone()),
            ScriptedSource::Fault(message) => Err(crate::error::PdfConcatError::Extraction {
                message: message.clone(),
            }),
            ScriptedSource::Panic(message) => panic!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pages(texts: &[&str]) -> ScriptedSource {
        ScriptedSource::Pages(texts.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_pages_are_newline_terminated() {
        let path = Path::new("/cwd/doc.pdf");
        assert_eq!(extract_text(&pages(&["A", "B"]), path), "A\nB\n");
    }

    #[test]
    fn test_zero_pages_is_empty() {
        let path = Path::new("/cwd/doc.pdf");
        assert_eq!(extract_text(&pages(&[]), path), "");
    }

    #[test]
    fn test_page_text_is_not_trimmed() {
        let path = Path::new("/cwd/doc.pdf");
        assert_eq!(extract_text(&pages(&["line\n", ""]), path), "line\n\n\n");
    }

    #[test]
    fn test_page_terminator_is_stripped_once() {
        assert_eq!(strip_page_terminator("Hello\n".to_string()), "Hello");
        assert_eq!(strip_page_terminator("Hello\n\n".to_string()), "Hello\n");
        assert_eq!(strip_page_terminator("Hello".to_string()), "Hello");
        assert_eq!(strip_page_terminator(String::new()), "");
    }

    #[test]
    fn test_fault_is_inlined() {
        let path = Path::new("/cwd/doc.pdf");
        let source = ScriptedSource::Fault("broken xref".to_string());
        assert_eq!(
            extract_text(&source, path),
            "Error reading /cwd/doc.pdf: broken xref"
        );
    }

    #[test]
    fn test_panic_is_inlined() {
        let path = Path::new("/cwd/doc.pdf");
        let source = ScriptedSource::Panic("index out of range".to_string());
        let outcome = extract_outcome(&source, path);
        assert_eq!(
            outcome,
            ExtractionOutcome::Failed {
                message: "index out of range".to_string()
            }
        );
        assert_eq!(outcome.page_count(), None);
    }

    #[test]
    fn test_quiet_catch_passes_values_and_panics() {
        let caught = quietly_catch_unwind(|| -> u8 { panic!("boom") });
        let payload = caught.err().unwrap();
        assert_eq!(panic_message(payload.as_ref()), "boom");

        assert_eq!(quietly_catch_unwind(|| 7).ok(), Some(7));
    }

    #[test]
    fn test_lopdf_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();

        let body = extract_text(&LopdfSource::new(), &path);
        let prefix = format!("Error reading {}: ", path.display());
        assert!(body.starts_with(&prefix), "unexpected body: {}", body);
        assert!(!body.ends_with('\n'));
    }

    #[test]
    fn test_lopdf_empty_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.pdf");
        fs::write(&path, b"").unwrap();

        let outcome = extract_outcome(&LopdfSource::new(), &path);
        assert!(matches!(outcome, ExtractionOutcome::Failed { .. }));
    }
}
