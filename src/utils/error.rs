use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("RSS parsing error: {0}")]
    RssError(#[from] rss::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid bill citation '{citation}': {reason}")]
    CitationError { citation: String, reason: String },

    #[error("Feed error: {message}")]
    FeedError { message: String },

    #[error("Unexpected CDG response for {url}: {message}")]
    CdgResponseError { url: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ApiError(_) | ReportError::CdgResponseError { .. } => {
                ErrorCategory::Network
            }
            ReportError::RssError(_)
            | ReportError::XmlError(_)
            | ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::CitationError { .. }
            | ReportError::FeedError { .. } => ErrorCategory::Data,
            ReportError::UrlError(_)
            | ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Upstream services may recover on a later run
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::ApiError(_) => {
                "Check network connectivity and that CDG_API_KEY is valid and not rate limited"
            }
            ReportError::CdgResponseError { .. } => {
                "The Congress.gov API returned an unexpected payload; retry later or check the bill URL"
            }
            ReportError::RssError(_) | ReportError::XmlError(_) | ReportError::FeedError { .. } => {
                "Verify the CBO feed URL returns a valid RSS document"
            }
            ReportError::CitationError { .. } => {
                "The feed contains a bill number this tool cannot map to a congress.gov URL"
            }
            ReportError::CsvError(_) | ReportError::SerializationError(_) => {
                "Report rendering failed; rerun with --verbose for details"
            }
            ReportError::UrlError(_)
            | ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. } => {
                "Review the command line flags and configuration file"
            }
            ReportError::IoError(_) => "Check that the output directory is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach an upstream service: {}", self),
            ErrorCategory::Data => format!("Could not process the report data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
