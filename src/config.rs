use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the recognition service client and the session shell
#[derive(Debug, Deserialize, Clone)]
pub struct LensConfig {
    /// Root URL of the recognition service, e.g. `http://192.168.0.10:5000/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the multipart upload endpoint (`upload` on older backends)
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Path prefix under which annotated output images are served
    #[serde(default = "default_download_path")]
    pub download_path: String,
    /// Path of the recipe search endpoint
    #[serde(default = "default_search_path")]
    pub search_path: String,
    /// Path prefix of the recipe detail endpoint
    #[serde(default = "default_detail_path")]
    pub detail_path: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Directory where camera captures are written
    #[serde(default = "default_capture_dir")]
    pub capture_dir: PathBuf,
    /// Fixed ingredient string searched instead of the user's list when set
    #[serde(default)]
    pub sample_ingredients: Option<String>,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            download_path: default_download_path(),
            search_path: default_search_path(),
            detail_path: default_detail_path(),
            timeout: default_timeout(),
            capture_dir: default_capture_dir(),
            sample_ingredients: None,
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:5000/".to_string()
}

fn default_upload_path() -> String {
    "upload_and_find".to_string()
}

fn default_download_path() -> String {
    "download".to_string()
}

fn default_search_path() -> String {
    "findfoodlist".to_string()
}

fn default_detail_path() -> String {
    "saverecipe".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_capture_dir() -> PathBuf {
    std::env::temp_dir().join("recipe-lens")
}

impl LensConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_LENS__ prefix
    /// 2. recipe-lens.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_LENS__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Absolute URL of an endpoint path under `base_url`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    /// URL the annotated output image can be downloaded from
    pub fn download_url(&self, output_image: &str) -> String {
        format!("{}/{}", self.endpoint(&self.download_path), output_image)
    }

    /// The search string used when the recipe list screen opens
    ///
    /// `sample_ingredients` wins over the user's list when it is set.
    pub fn search_query<'a>(&'a self, user_csv: &'a str) -> &'a str {
        self.sample_ingredients.as_deref().unwrap_or(user_csv)
    }
}

/// Load configuration from file and environment variables
///
/// See [`LensConfig::load`] for the precedence rules.
pub fn load_config() -> Result<LensConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-lens").required(false))
        // Use double underscore for nested keys, like the file layout
        .add_source(
            Environment::with_prefix("RECIPE_LENS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
