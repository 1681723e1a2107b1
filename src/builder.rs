use reqwest::{Client, Url};
use std::time::Duration;

use crate::{client::FlaskClient, config::LensConfig, LensError};

const USER_AGENT: &str = concat!("recipe-lens/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`FlaskClient`]
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: LensConfig,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Start from a loaded configuration instead of the defaults
    pub fn from_config(config: LensConfig) -> Self {
        Self {
            config,
            timeout: None,
        }
    }

    /// Set the service root URL
    ///
    /// # Example
    /// ```
    /// use recipe_lens::FlaskClient;
    ///
    /// let builder = FlaskClient::builder()
    ///     .base_url("http://192.168.45.158:5000/");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the upload endpoint path
    ///
    /// Older backends expose the recognizer at `upload` instead of
    /// `upload_and_find`.
    pub fn upload_path(mut self, path: impl Into<String>) -> Self {
        self.config.upload_path = path.into();
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_lens::FlaskClient;
    /// use std::time::Duration;
    ///
    /// let builder = FlaskClient::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the client
    ///
    /// # Errors
    /// Returns `LensError` if:
    /// - The base URL does not parse or is not http(s)
    /// - The HTTP client cannot be created
    pub fn build(mut self) -> Result<FlaskClient, LensError> {
        let url = Url::parse(&self.config.base_url)
            .map_err(|e| LensError::InvalidBaseUrl(format!("{}: {}", self.config.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LensError::InvalidBaseUrl(format!(
                "{}: unsupported scheme",
                self.config.base_url
            )));
        }
        if !self.config.base_url.ends_with('/') {
            self.config.base_url.push('/');
        }

        let timeout = self.timeout.unwrap_or_else(|| self.config.timeout());
        self.config.timeout = timeout.as_secs();

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LensError::BuilderError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(FlaskClient::from_parts(client, self.config))
    }
}
