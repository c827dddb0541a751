pub mod concatenator;
pub mod pdf_text;
pub mod report;

pub use concatenator::{Concatenator, ExtractionProgress, PlannedBlock};
pub use pdf_text::{extract_text, ExtractionOutcome, LopdfSource, PageSource};
pub use report::{ExtractionReport, ExtractionSummary, FileReport, FileStatus};
