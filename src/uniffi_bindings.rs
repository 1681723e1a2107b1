//! UniFFI bindings for recipe-lens
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::model::{RecipeDetail, RecipeIngredient, RecipeSummary};
use crate::{AnalysisResult, Favorites, FlaskClient, LensConfig, LensError};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible ingredient of a recipe summary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeIngredient {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub original: String,
    pub image: String,
}

/// FFI-compatible recipe summary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeSummary {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub likes: i64,
    pub used_ingredients: Vec<FfiRecipeIngredient>,
    pub missed_ingredients: Vec<FfiRecipeIngredient>,
}

/// FFI-compatible recipe detail, flattened for display
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipeDetail {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub servings: u32,
    pub ready_in_minutes: u32,
    pub cuisines: Vec<String>,
    pub summary: String,
    /// Original ingredient lines
    pub ingredients: Vec<String>,
    /// Steps as "N. text"
    pub steps: Vec<String>,
    /// Empty when the recipe has no pairing
    pub paired_wines: Vec<String>,
}

/// FFI-compatible analysis of an uploaded image
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiAnalysis {
    pub image_url: String,
    pub ingredients: Vec<String>,
}

impl From<RecipeIngredient> for FfiRecipeIngredient {
    fn from(ingredient: RecipeIngredient) -> Self {
        FfiRecipeIngredient {
            id: ingredient.id,
            name: ingredient.name,
            amount: ingredient.amount,
            unit: ingredient.unit,
            original: ingredient.original,
            image: ingredient.image,
        }
    }
}

impl From<FfiRecipeIngredient> for RecipeIngredient {
    fn from(ffi: FfiRecipeIngredient) -> Self {
        RecipeIngredient {
            id: ffi.id,
            name: ffi.name,
            amount: ffi.amount,
            unit: ffi.unit,
            original: ffi.original,
            image: ffi.image,
            ..Default::default()
        }
    }
}

impl From<RecipeSummary> for FfiRecipeSummary {
    fn from(recipe: RecipeSummary) -> Self {
        FfiRecipeSummary {
            id: recipe.id,
            title: recipe.title,
            image: recipe.image,
            likes: recipe.likes,
            used_ingredients: recipe.used_ingredients.into_iter().map(Into::into).collect(),
            missed_ingredients: recipe
                .missed_ingredients
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<FfiRecipeSummary> for RecipeSummary {
    fn from(ffi: FfiRecipeSummary) -> Self {
        RecipeSummary {
            id: ffi.id,
            title: ffi.title,
            image: ffi.image,
            likes: ffi.likes,
            used_ingredient_count: ffi.used_ingredients.len() as u32,
            used_ingredients: ffi.used_ingredients.into_iter().map(Into::into).collect(),
            missed_ingredient_count: ffi.missed_ingredients.len() as u32,
            missed_ingredients: ffi.missed_ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RecipeDetail> for FfiRecipeDetail {
    fn from(detail: RecipeDetail) -> Self {
        FfiRecipeDetail {
            ingredients: detail
                .ingredient_lines()
                .into_iter()
                .map(str::to_string)
                .collect(),
            steps: detail.numbered_steps(),
            paired_wines: detail
                .wine_pairing
                .map(|w| w.paired_wines)
                .unwrap_or_default(),
            id: detail.id,
            title: detail.title,
            image: detail.image,
            servings: detail.servings,
            ready_in_minutes: detail.ready_in_minutes,
            cuisines: detail.cuisines,
            summary: detail.summary,
        }
    }
}

impl From<AnalysisResult> for FfiAnalysis {
    fn from(result: AnalysisResult) -> Self {
        FfiAnalysis {
            image_url: result.image_url,
            ingredients: result.ingredients,
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiLensError {
    /// No response from the service
    NetworkError { message: String },
    /// Non-success status
    ServerError { status: u16, message: String },
    /// The upload response could not be read
    ParseError { message: String },
    /// No image file to upload
    NothingToUpload { message: String },
    /// Reading or writing a local file failed
    IoError { message: String },
    /// Invalid configuration
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiLensError::NetworkError { message } => write!(f, "Network error: {}", message),
            FfiLensError::ServerError { status, message } => {
                write!(f, "Server error {}: {}", status, message)
            }
            FfiLensError::ParseError { message } => write!(f, "Parse error: {}", message),
            FfiLensError::NothingToUpload { message } => write!(f, "{}", message),
            FfiLensError::IoError { message } => write!(f, "I/O error: {}", message),
            FfiLensError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiLensError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiLensError {}

impl From<LensError> for FfiLensError {
    fn from(err: LensError) -> Self {
        let message = err.to_string();
        match err {
            LensError::Transport(_) => FfiLensError::NetworkError { message },
            LensError::Server { status, body } => FfiLensError::ServerError {
                status,
                message: body,
            },
            LensError::MarkerNotFound(_)
            | LensError::MalformedList(_)
            | LensError::Json(_)
            | LensError::EmptyResult => FfiLensError::ParseError { message },
            LensError::NothingToUpload => FfiLensError::NothingToUpload { message },
            LensError::Io(_) => FfiLensError::IoError { message },
            LensError::InvalidBaseUrl(_)
            | LensError::BuilderError(_)
            | LensError::ConfigError(_) => FfiLensError::ConfigError { message },
            LensError::Busy => FfiLensError::RuntimeError { message },
        }
    }
}

/// Connection settings passed from the app
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiLensConfig {
    /// Service root URL (uses default if not specified)
    pub base_url: Option<String>,
    /// Upload endpoint path (uses default if not specified)
    pub upload_path: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
}

impl FfiLensConfig {
    fn into_client(self) -> Result<FlaskClient, FfiLensError> {
        let mut builder = FlaskClient::builder();
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(upload_path) = self.upload_path {
            builder = builder.upload_path(upload_path);
        }
        if let Some(timeout_secs) = self.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Ok(builder.build()?)
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiLensError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiLensError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Upload an image file and return the detected ingredients
///
/// # Arguments
/// * `image_path` - Local path of the image, already resolved from the
///   platform reference
/// * `config` - Optional connection settings
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn analyze_image(
    image_path: String,
    config: Option<FfiLensConfig>,
) -> Result<FfiAnalysis, FfiLensError> {
    if image_path.trim().is_empty() {
        return Err(LensError::NothingToUpload.into());
    }
    let client = config.unwrap_or_default().into_client()?;
    let rt = create_runtime()?;
    rt.block_on(async {
        let result = crate::analyze_image(&client, Path::new(&image_path)).await?;
        Ok(result.into())
    })
}

/// Decode an upload response body without touching the network
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_analysis(raw: String, base_url: Option<String>) -> Result<FfiAnalysis, FfiLensError> {
    let mut config = LensConfig::default();
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    Ok(AnalysisResult::parse(&raw, &config)?.into())
}

/// Search recipes for a comma separated ingredient list
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn search_recipes(
    ingredients: String,
    config: Option<FfiLensConfig>,
) -> Result<Vec<FfiRecipeSummary>, FfiLensError> {
    let client = config.unwrap_or_default().into_client()?;
    let rt = create_runtime()?;
    rt.block_on(async {
        let recipes = client.search_recipes(&ingredients).await?;
        Ok(recipes.into_iter().map(Into::into).collect())
    })
}

/// Fetch the full record of a recipe; `None` when the service has none
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn fetch_recipe_detail(
    recipe_id: i64,
    config: Option<FfiLensConfig>,
) -> Result<Option<FfiRecipeDetail>, FfiLensError> {
    let client = config.unwrap_or_default().into_client()?;
    let rt = create_runtime()?;
    rt.block_on(async {
        let detail = client.fetch_recipe_detail(recipe_id).await?;
        Ok(detail.map(Into::into))
    })
}

/// Ingredient names offered for manual additions
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn ingredient_vocabulary() -> Vec<String> {
    crate::VOCABULARY.iter().map(|s| s.to_string()).collect()
}

/// Favorites after toggling `recipe`
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn toggle_favorite(
    favorites: Vec<FfiRecipeSummary>,
    recipe: FfiRecipeSummary,
) -> Vec<FfiRecipeSummary> {
    let mut current = Favorites::new();
    for favorite in favorites {
        current.toggle(&favorite.into());
    }
    current.toggle(&recipe.into());
    current.iter().cloned().map(Into::into).collect()
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
