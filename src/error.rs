use thiserror::Error;

/// Errors that can occur while talking to the recognition service or
/// interpreting what it sent back
#[derive(Error, Debug)]
pub enum LensError {
    /// No response was received from the service
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// A required key was absent from the upload response
    #[error("Response is missing the `{0}` field")]
    MarkerNotFound(&'static str),

    /// The ingredient value had an unexpected shape
    #[error("Malformed ingredient list: {0}")]
    MalformedList(String),

    /// The response was well-formed but held no records
    #[error("The service returned no results")]
    EmptyResult,

    /// The image reference could not be resolved to a local file
    #[error("No image file to upload")]
    NothingToUpload,

    /// Another upload or search is already in flight
    #[error("A request is already in progress")]
    Busy,

    /// The configured base URL does not parse
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Reading or writing a local image file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response body was not the JSON it claimed to be
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Client builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl LensError {
    /// Short text shown to the user when this error ends a flow
    pub fn notice(&self) -> String {
        match self {
            LensError::Transport(e) => format!("Error: {}", e),
            LensError::Server { body, .. } => format!("Request failed: {}", body),
            LensError::NothingToUpload => "File is null".to_string(),
            other => other.to_string(),
        }
    }
}
