use std::fmt;

/// Convenience result alias used across the crate
pub type Result<T> = std::result::Result<T, ShortstatsError>;

#[derive(Debug, Clone)]
pub enum ShortstatsError {
    NotFound(String),
    InvalidPayload(String),
    ExportNoData(String),
    ArtifactUnavailable(String),
    ArtifactNotReady(String),
    ArtifactFailed(String),
    Network(String),
    Api(String),
    Auth(String),
    Validation(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
    Internal(String),
}

impl ShortstatsError {
    /// Stable error code, used in logs and colored output
    pub fn code(&self) -> &'static str {
        match self {
            ShortstatsError::NotFound(_) => "E001",
            ShortstatsError::InvalidPayload(_) => "E002",
            ShortstatsError::ExportNoData(_) => "E003",
            ShortstatsError::ArtifactUnavailable(_) => "E004",
            ShortstatsError::ArtifactNotReady(_) => "E005",
            ShortstatsError::ArtifactFailed(_) => "E006",
            ShortstatsError::Network(_) => "E007",
            ShortstatsError::Api(_) => "E008",
            ShortstatsError::Auth(_) => "E009",
            ShortstatsError::Validation(_) => "E010",
            ShortstatsError::Config(_) => "E011",
            ShortstatsError::FileOperation(_) => "E012",
            ShortstatsError::Serialization(_) => "E013",
            ShortstatsError::Internal(_) => "E014",
        }
    }

    /// Human-readable error category
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortstatsError::NotFound(_) => "Lookup Not Found",
            ShortstatsError::InvalidPayload(_) => "Invalid Payload",
            ShortstatsError::ExportNoData(_) => "Export Without Data",
            ShortstatsError::ArtifactUnavailable(_) => "Artifact Unavailable",
            ShortstatsError::ArtifactNotReady(_) => "Artifact Not Ready",
            ShortstatsError::ArtifactFailed(_) => "Artifact Failed",
            ShortstatsError::Network(_) => "Network Error",
            ShortstatsError::Api(_) => "Service Error",
            ShortstatsError::Auth(_) => "Authentication Error",
            ShortstatsError::Validation(_) => "Validation Error",
            ShortstatsError::Config(_) => "Configuration Error",
            ShortstatsError::FileOperation(_) => "File Operation Error",
            ShortstatsError::Serialization(_) => "Serialization Error",
            ShortstatsError::Internal(_) => "Internal Error",
        }
    }

    /// Error detail message
    pub fn message(&self) -> &str {
        match self {
            ShortstatsError::NotFound(msg) => msg,
            ShortstatsError::InvalidPayload(msg) => msg,
            ShortstatsError::ExportNoData(msg) => msg,
            ShortstatsError::ArtifactUnavailable(msg) => msg,
            ShortstatsError::ArtifactNotReady(msg) => msg,
            ShortstatsError::ArtifactFailed(msg) => msg,
            ShortstatsError::Network(msg) => msg,
            ShortstatsError::Api(msg) => msg,
            ShortstatsError::Auth(msg) => msg,
            ShortstatsError::Validation(msg) => msg,
            ShortstatsError::Config(msg) => msg,
            ShortstatsError::FileOperation(msg) => msg,
            ShortstatsError::Serialization(msg) => msg,
            ShortstatsError::Internal(msg) => msg,
        }
    }

    /// Colored multi-line format for terminal error panels
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Plain single-line format
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortstatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortstatsError {}

// Convenience constructors
impl ShortstatsError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::NotFound(msg.into())
    }

    pub fn invalid_payload<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::InvalidPayload(msg.into())
    }

    pub fn export_no_data<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::ExportNoData(msg.into())
    }

    pub fn artifact_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::ArtifactUnavailable(msg.into())
    }

    pub fn artifact_not_ready<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::ArtifactNotReady(msg.into())
    }

    pub fn artifact_failed<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::ArtifactFailed(msg.into())
    }

    pub fn network<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Network(msg.into())
    }

    pub fn api<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Api(msg.into())
    }

    pub fn auth<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Auth(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Serialization(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        ShortstatsError::Internal(msg.into())
    }
}

// From impls for common failure sources
impl From<std::io::Error> for ShortstatsError {
    fn from(err: std::io::Error) -> Self {
        ShortstatsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortstatsError {
    fn from(err: serde_json::Error) -> Self {
        ShortstatsError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ShortstatsError {
    fn from(err: csv::Error) -> Self {
        ShortstatsError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for ShortstatsError {
    fn from(err: ureq::Error) -> Self {
        ShortstatsError::Network(err.to_string())
    }
}

impl From<config::ConfigError> for ShortstatsError {
    fn from(err: config::ConfigError) -> Self {
        ShortstatsError::Config(err.to_string())
    }
}
