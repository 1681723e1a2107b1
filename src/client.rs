use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::path::Path;
use tokio::fs;

use crate::builder::ClientBuilder;
use crate::config::LensConfig;
use crate::error::LensError;
use crate::model::{RecipeDetail, RecipeSummary};

/// Reply to an image upload
///
/// Non-success statuses still carry their body here instead of failing: the
/// body is what the service had to say, and the caller decides what to do
/// with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReply {
    pub status: u16,
    pub body: String,
}

impl UploadReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the recognition and recipe service
#[derive(Debug, Clone)]
pub struct FlaskClient {
    client: Client,
    config: LensConfig,
}

impl FlaskClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Client with the configured timeout and endpoints
    pub fn new(config: LensConfig) -> Result<Self, LensError> {
        ClientBuilder::from_config(config).build()
    }

    pub(crate) fn from_parts(client: Client, config: LensConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// Upload an image for ingredient recognition
    ///
    /// The file goes out as multipart field `file` named after the file.
    pub async fn upload_image(&self, image_path: &Path) -> Result<UploadReply, LensError> {
        let image_data = fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());

        let part = Part::bytes(image_data)
            .file_name(file_name)
            .mime_str("image/*")?;
        let form = Form::new().part("file", part);

        let url = self.config.endpoint(&self.config.upload_path);
        debug!("Uploading {} to {}", image_path.display(), url);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let reply = UploadReply { status, body };
        if reply.is_success() {
            info!("Upload succeeded: {}", reply.body);
        } else {
            warn!("Upload failed ({}): {}", reply.status, reply.body);
        }
        Ok(reply)
    }

    /// Recipes that can be made from a comma separated ingredient list
    ///
    /// An empty array is a successful empty result; a non-success status is
    /// `LensError::Server`.
    pub async fn search_recipes(&self, ingredients: &str) -> Result<Vec<RecipeSummary>, LensError> {
        let url = self.config.endpoint(&self.config.search_path);
        debug!("Searching recipes for '{}'", ingredients);

        let response = self
            .client
            .get(&url)
            .query(&[("ingredients", ingredients)])
            .send()
            .await?;
        let body = success_body(response).await?;

        let recipes: Vec<RecipeSummary> = serde_json::from_str(&body)?;
        info!("Found {} recipes", recipes.len());
        Ok(recipes)
    }

    /// Full record of one recipe, `None` when the service knows no such id
    pub async fn fetch_recipe_detail(
        &self,
        recipe_id: i64,
    ) -> Result<Option<RecipeDetail>, LensError> {
        let url = format!(
            "{}/{}",
            self.config.endpoint(&self.config.detail_path),
            recipe_id
        );
        debug!("Calling API with recipe id: {}", recipe_id);

        let response = self.client.get(&url).send().await?;
        let body = success_body(response).await?;

        let details: Vec<RecipeDetail> = serde_json::from_str(&body)?;
        if details.is_empty() {
            debug!("Empty detail response for recipe {}", recipe_id);
        }
        Ok(details.into_iter().next())
    }

    /// URL of an annotated output image
    pub fn download_url(&self, output_image: &str) -> String {
        self.config.download_url(output_image)
    }

    /// Bytes of an annotated output image
    pub async fn download_image(&self, output_image: &str) -> Result<Vec<u8>, LensError> {
        let response = self.client.get(self.download_url(output_image)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!("Download of {} failed ({}): {}", output_image, status, body);
            return Err(LensError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Body of a success response, or the status and body as a `Server` error
async fn success_body(response: Response) -> Result<String, LensError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        warn!("Request failed ({}): {}", status, body);
        Err(LensError::Server {
            status: status.as_u16(),
            body,
        })
    }
}
