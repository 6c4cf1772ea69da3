use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Navigation to {url} failed: {message}")]
    NavigationError { url: String, message: String },

    #[error("Browser operation failed: {message}")]
    BrowserError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upload failed{}: {message}", status_suffix(.status))]
    UploadError { status: Option<u16>, message: String },

    #[error("Cannot {operation} while session is {state}")]
    SessionStateError { operation: String, state: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Browser,
    Storage,
    Upload,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ScrapeError {
    pub fn browser(message: impl Into<String>) -> Self {
        Self::BrowserError {
            message: message.into(),
        }
    }

    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NavigationError {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NavigationError { .. } | Self::BrowserError { .. } => ErrorCategory::Browser,
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Storage
            }
            Self::UploadError { .. } => ErrorCategory::Upload,
            Self::SessionStateError { .. } => ErrorCategory::Session,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路或平台暫時性問題，可重新執行
            ErrorCategory::Browser | ErrorCategory::Upload => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Session => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NavigationError { .. } => {
                "Check that the start URL is reachable and the page loads in a regular browser"
            }
            Self::BrowserError { .. } => {
                "Make sure the WebDriver server (e.g. chromedriver) is running and the selectors are valid CSS"
            }
            Self::IoError(_) => "Check that the output directory exists and is writable",
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Scraped values could not be serialized; re-run with --verbose to inspect them"
            }
            Self::UploadError { .. } => {
                "Verify the upload endpoint URL; exported files are kept on disk and can be re-uploaded"
            }
            Self::SessionStateError { .. } => {
                "Create a new session for every scrape; sessions are single-use"
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration value and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NavigationError { url, .. } => format!("Could not load page: {}", url),
            Self::BrowserError { .. } => "The browser could not complete the request".to_string(),
            Self::IoError(e) => format!("Could not write output file: {}", e),
            Self::UploadError { .. } => "Uploading products to the store failed".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (status {})", code))
        .unwrap_or_default()
}
