use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfconcat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract text from desc.pdf and inst.pdf into pdf_content.txt")]
#[command(
    long_about = "pdfconcat reads desc.pdf and inst.pdf from the current directory, extracts \
                  the text of every page and writes it to pdf_content.txt, one delimited \
                  block per input. Missing or unreadable inputs are reported inside their block."
)]
#[command(after_help = "EXAMPLES:\n  \
    pdfconcat\n  \
    pdfconcat --dry-run\n  \
    pdfconcat --output-format json --quiet\n  \
    pdfconcat --generate-config --config pdfconcat.toml")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for status messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress bar
    #[arg(long, help = "Do not show a progress bar")]
    pub no_progress: bool,

    /// Diagnostic log level (error, warn, info, debug, trace, off)
    #[arg(long, env = "PDFCONCAT_LOG", help = "Log level for diagnostics written to stderr")]
    pub log_level: Option<String>,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show which inputs would be read without writing the output file")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    /// Load and validate the configuration, anchoring the inputs and the
    /// output at the current working directory. An unreadable working
    /// directory is fatal.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;
        config.extraction.base_directory = std::env::current_dir()?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let show_progress = if self.no_progress || self.quiet {
            Some(false)
        } else {
            None
        };

        CliOverrides::new()
            .with_show_progress(show_progress)
            .with_log_level(self.log_level.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
