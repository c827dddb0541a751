use crate::error::{PdfConcatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILES: &[&str] = &["desc.pdf", "inst.pdf"];
pub const DEFAULT_OUTPUT_PATH: &str = "pdf_content.txt";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Inputs and output of a run. Not read from config files; the binary
    /// always uses the defaults.
    #[serde(skip)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub files: Vec<String>,
    pub output_path: PathBuf,
    pub base_directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_progress: bool,
    pub show_summary: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Reference file list and output name. The base directory stays empty until
/// the run resolves the working directory.
impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            files: DEFAULT_FILES.iter().map(|f| f.to_string()).collect(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            base_directory: PathBuf::new(),
        }
    }
}

impl ExtractionConfig {
    pub fn new<I, S>(files: I, output_path: impl Into<PathBuf>, base_directory: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            output_path: output_path.into(),
            base_directory: base_directory.into(),
        }
    }

    /// Absolute location of an input, as written into not-found and error bodies.
    pub fn input_path(&self, filename: &str) -> PathBuf {
        self.base_directory.join(filename)
    }

    /// Output location; relative paths resolve against the base directory.
    pub fn resolved_output_path(&self) -> PathBuf {
        self.base_directory.join(&self.output_path)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_summary: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PdfConcatError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PdfConcatError::Config {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| PdfConcatError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["pdfconcat.toml", ".pdfconcat.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(show_progress) = cli_args.show_progress {
            self.display.show_progress = show_progress;
        }

        if let Some(ref level) = cli_args.log_level {
            self.logging.level = level.trim().to_lowercase();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.files.is_empty() {
            return Err(PdfConcatError::Config {
                message: "At least one input file must be listed".to_string(),
            });
        }

        if self.extraction.files.iter().any(|f| f.trim().is_empty()) {
            return Err(PdfConcatError::Config {
                message: "Input file names must not be empty".to_string(),
            });
        }

        if self.extraction.output_path.as_os_str().is_empty() {
            return Err(PdfConcatError::Config {
                message: "Output path must not be empty".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(PdfConcatError::Config {
                message: format!(
                    "Unknown log level '{}' (expected one of: {})",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.as_str() {
            "error" => log::LevelFilter::Error,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Warn,
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub show_progress: Option<bool>,
    pub log_level: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_show_progress(mut self, show_progress: Option<bool>) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extraction.files, vec!["desc.pdf", "inst.pdf"]);
        assert_eq!(config.extraction.output_path, PathBuf::from("pdf_content.txt"));
        assert_eq!(config.extraction.base_directory, PathBuf::new());
        assert!(config.display.show_progress);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.extraction.files.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extraction.files.push("  ".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[display]").unwrap();
        writeln!(temp_file, "show_summary = false").unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(!loaded_config.display.show_summary);
        assert!(loaded_config.display.show_progress);
        assert_eq!(loaded_config.logging.level, "warn");
    }

    #[test]
    fn test_extraction_section_is_ignored_in_files() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[extraction]").unwrap();
        writeln!(temp_file, "files = [\"other.pdf\"]").unwrap();
        writeln!(temp_file, "[logging]").unwrap();
        writeln!(temp_file, "level = \"debug\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.extraction.files, vec!["desc.pdf", "inst.pdf"]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.display.show_progress);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(PdfConcatError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_show_progress(Some(false))
            .with_log_level(Some(" DEBUG ".to_string()));

        config.merge_with_cli_args(&overrides);

        assert!(!config.display.show_progress);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_paths_resolve_against_base_directory() {
        let extraction = ExtractionConfig::new(["a.pdf"], "out.txt", "/work");
        assert_eq!(extraction.input_path("a.pdf"), PathBuf::from("/work/a.pdf"));
        assert_eq!(extraction.resolved_output_path(), PathBuf::from("/work/out.txt"));
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[display]"));
        assert!(sample.contains("[logging]"));
        assert!(!sample.contains("[extraction]"));
    }
}
