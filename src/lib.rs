pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DisplayConfig, ExtractionConfig, LoggingConfig};
pub use error::{PdfConcatError, Result, UserFriendlyError};

pub use extractor::{
    extract_text, Concatenator, ExtractionOutcome, ExtractionProgress, ExtractionReport,
    FileReport, FileStatus, LopdfSource, PageSource, PlannedBlock,
};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface: one configured extraction run.
pub struct PdfConcat {
    config: Config,
    concatenator: Concatenator,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl PdfConcat {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(config.display.show_progress && !quiet);

        Self {
            config,
            concatenator: Concatenator::new(),
            output_formatter,
            progress_manager,
        }
    }

    /// Swap the PDF parser.
    pub fn with_source(mut self, source: Box<dyn PageSource>) -> Self {
        self.concatenator = Concatenator::with_source(source);
        self
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Extract every configured PDF into the output file.
    pub fn run(&self) -> Result<ExtractionReport> {
        let extraction = &self.config.extraction;

        self.output_formatter.start_operation(&format!(
            "Extracting {} file(s) into {}",
            extraction.files.len(),
            extraction.output_path.display()
        ));
        self.output_formatter
            .debug(&format!("Base directory: {}", extraction.base_directory.display()));

        let file_progress = self
            .progress_manager
            .create_file_progress(extraction.files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let result = self
            .concatenator
            .concatenate(extraction, Some(&progress_callback));

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                file_progress.abandon_with_message("Extraction aborted");
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Wrote {} block(s)", report.files.len()),
            report.summary.duration,
        );

        for problem in report.problems() {
            self.output_formatter.debug(&format!("{}: {:?}", problem.filename, problem.status));
        }

        if self.config.display.show_summary {
            self.output_formatter.print_extraction_report(&report);
        }

        Ok(report)
    }

    /// Resolve the inputs and report what a run would do, without writing.
    pub fn plan(&self) -> Result<Vec<PlannedBlock>> {
        self.concatenator.plan(&self.config.extraction)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    pub fn handle_error(&self, error: &PdfConcatError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
