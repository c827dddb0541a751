use crate::config::ExtractionConfig;
use crate::error::{PdfConcatError, Result};
use crate::extractor::pdf_text::{extract_outcome, ExtractionOutcome, LopdfSource, PageSource};
use crate::extractor::report::{ExtractionReport, FileReport, FileStatus};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub fn start_marker(filename: &str) -> String {
    format!("========== START OF {} ==========\n", filename)
}

pub fn end_marker(filename: &str) -> String {
    format!("\n========== END OF {} ==========\n", filename)
}

pub fn not_found_body(path: &Path) -> String {
    format!("File not found: {}\n", path.display())
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn start_file(&mut self, filename: &str) {
        self.current_file = Some(filename.to_string());
    }

    pub fn finish_file(&mut self, bytes: u64) {
        self.files_processed += 1;
        self.bytes_written += bytes;
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// A block as it would be written, without touching any PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBlock {
    pub filename: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// Output sink that counts bytes and tags write failures with the output path.
struct BlockWriter<'a, W: Write> {
    inner: &'a mut W,
    path: &'a Path,
}

impl<'a, W: Write> BlockWriter<'a, W> {
    fn write_str(&mut self, s: &str) -> Result<u64> {
        self.inner
            .write_all(s.as_bytes())
            .map_err(|e| PdfConcatError::OutputFile {
                path: self.path.display().to_string(),
                source: e,
            })?;
        Ok(s.len() as u64)
    }
}

pub struct Concatenator {
    source: Box<dyn PageSource>,
}

impl Concatenator {
    pub fn new() -> Self {
        Self {
            source: Box::new(LopdfSource::new()),
        }
    }

    pub fn with_source(source: Box<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Extract every configured file into the output file, truncating it
    /// first. The handle is released on every return path.
    pub fn concatenate(
        &self,
        extraction: &ExtractionConfig,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<ExtractionReport> {
        let output_path = extraction.resolved_output_path();
        let start = Instant::now();

        let file = fs::File::create(&output_path).map_err(|e| PdfConcatError::OutputFile {
            path: output_path.display().to_string(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let files = self.write_blocks(extraction, &mut writer, &output_path, progress_callback)?;

        writer.flush().map_err(|e| PdfConcatError::OutputFile {
            path: output_path.display().to_string(),
            source: e,
        })?;

        log::info!(
            "Wrote {} block(s) to {}",
            files.len(),
            output_path.display()
        );

        Ok(ExtractionReport::new(&output_path, files, start.elapsed()))
    }

    /// Write one START/body/END block per configured file, in list order.
    ///
    /// Only PDF faults are absorbed into the body. Existence-check and write
    /// failures abort the run.
    pub fn write_blocks<W: Write>(
        &self,
        extraction: &ExtractionConfig,
        writer: &mut W,
        output_path: &Path,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<Vec<FileReport>> {
        let mut out = BlockWriter {
            inner: writer,
            path: output_path,
        };
        let mut progress = ExtractionProgress::new(extraction.files.len());
        let mut reports = Vec::with_capacity(extraction.files.len());

        for filename in &extraction.files {
            progress.start_file(filename);
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let path = extraction.input_path(filename);
            let mut bytes = out.write_str(&start_marker(filename))?;

            let status = if entry_exists(&path)? {
                let outcome = extract_outcome(self.source.as_ref(), &path);
                bytes += out.write_str(&outcome.render(&path))?;

                match outcome {
                    ExtractionOutcome::Extracted { pages } => {
                        log::debug!("{}: extracted {} page(s)", filename, pages.len());
                        FileStatus::Extracted { pages: pages.len() }
                    }
                    ExtractionOutcome::Failed { message } => {
                        log::warn!("Error reading {}: {}", path.display(), message);
                        FileStatus::Failed { message }
                    }
                }
            } else {
                log::warn!("File not found: {}", path.display());
                bytes += out.write_str(&not_found_body(&path))?;
                FileStatus::NotFound
            };

            bytes += out.write_str(&end_marker(filename))?;
            progress.finish_file(bytes);

            reports.push(FileReport {
                filename: filename.clone(),
                path: path.display().to_string(),
                status,
                bytes_written: bytes,
            });
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(reports)
    }

    /// Resolve every input and check whether it exists, without extracting.
    pub fn plan(&self, extraction: &ExtractionConfig) -> Result<Vec<PlannedBlock>> {
        extraction
            .files
            .iter()
            .map(|filename| {
                let path = extraction.input_path(filename);
                let exists = entry_exists(&path)?;
                Ok(PlannedBlock {
                    filename: filename.clone(),
                    path,
                    exists,
                })
            })
            .collect()
    }
}

impl Default for Concatenator {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_exists(path: &Path) -> Result<bool> {
    path.try_exists().map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            PdfConcatError::Permission {
                path: path.display().to_string(),
            }
        } else {
            PdfConcatError::Io(e)
        }
    })
}
