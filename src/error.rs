use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfConcatError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to write output file {path}: {source}")]
    OutputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    /// A fault raised while opening or reading a PDF. The message is kept
    /// verbatim because it ends up inline in the output file.
    #[error("{message}")]
    Extraction { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for PdfConcatError {
    fn user_message(&self) -> String {
        match self {
            PdfConcatError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            PdfConcatError::OutputFile { path, source } => {
                format!("Could not write output file {}: {}", path, source)
            }
            PdfConcatError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            PdfConcatError::Extraction { message } => {
                format!("PDF extraction failed: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            PdfConcatError::Config { .. } => Some(
                "Check your configuration file syntax, or run with --generate-config to start from a fresh sample.".to_string()
            ),
            PdfConcatError::OutputFile { .. } => Some(
                "Make sure the working directory is writable and the output file is not open in another program.".to_string()
            ),
            PdfConcatError::Permission { .. } => Some(
                "Ensure you have read permission for the input files and write permission for the working directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl PdfConcatError {
    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PdfConcatError::Config { .. } => 3,
            PdfConcatError::OutputFile { .. } => 4,
            PdfConcatError::Permission { .. } => 7,
            PdfConcatError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => 7,
            _ => 1,
        }
    }
}

impl From<toml::de::Error> for PdfConcatError {
    fn from(error: toml::de::Error) -> Self {
        PdfConcatError::Config {
            message: error.to_string(),
        }
    }
}

impl From<lopdf::Error> for PdfConcatError {
    fn from(error: lopdf::Error) -> Self {
        PdfConcatError::Extraction {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfConcatError>;
