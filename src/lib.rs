pub mod acquisition;
pub mod browse;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod extraction;
pub mod ingredients;
pub mod model;
pub mod navigation;
pub mod session;
pub mod state;
pub mod uniffi_bindings;

use log::info;
use std::path::Path;

pub use acquisition::{CaptureSink, ContentResolver, ImageRef, StaticContentResolver};
pub use browse::{DetailTarget, Favorites};
pub use builder::ClientBuilder;
pub use client::{FlaskClient, UploadReply};
pub use config::LensConfig;
pub use error::LensError;
pub use extraction::AnalysisResult;
pub use ingredients::{IngredientList, VOCABULARY};
pub use model::{RecipeDetail, RecipeSummary};
pub use navigation::{Route, Tab};
pub use session::Session;
pub use state::{AppState, Command, DetailState, Message};

/// Upload an image and decode what the service found in it
///
/// A non-success reply is still decoded: some backends report failures in the
/// same body shape.
///
/// # Example
/// ```no_run
/// # use recipe_lens::{analyze_image, FlaskClient};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FlaskClient::builder().base_url("http://192.168.45.158:5000/").build()?;
/// let result = analyze_image(&client, Path::new("fridge.jpg")).await?;
/// println!("{}", result.ingredients_csv());
/// # Ok(())
/// # }
/// ```
pub async fn analyze_image(
    client: &FlaskClient,
    image_path: &Path,
) -> Result<AnalysisResult, LensError> {
    let reply = client.upload_image(image_path).await?;
    if !reply.is_success() {
        info!("Upload answered {}, decoding body anyway", reply.status);
    }
    AnalysisResult::parse(&reply.body, client.config())
}

/// Recipes for a list of ingredients, joined into the search form
pub async fn recipes_for(
    client: &FlaskClient,
    ingredients: &IngredientList,
) -> Result<Vec<RecipeSummary>, LensError> {
    client.search_recipes(&ingredients.to_csv()).await
}

/// Full record of a recipe, `EmptyResult` when the service has none
pub async fn recipe_detail(client: &FlaskClient, recipe_id: i64) -> Result<RecipeDetail, LensError> {
    client
        .fetch_recipe_detail(recipe_id)
        .await?
        .ok_or(LensError::EmptyResult)
}
