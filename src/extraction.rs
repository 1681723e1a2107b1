//! Decoding of the recognition service's upload response.
//!
//! The service answers with free-form text that embeds a JSON object carrying
//! `output_image` and `ingredients`. The embedded object is decoded when it
//! can be found; otherwise the raw text is scanned for the quoted keys.

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::LensConfig;
use crate::error::LensError;

const OUTPUT_IMAGE: &str = "output_image";
const INGREDIENTS: &str = "ingredients";

/// What the recognition service found in an uploaded image
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Name of the annotated image on the service
    pub output_image: String,
    /// Download URL of the annotated image
    pub image_url: String,
    /// Detected ingredient tokens, blanks removed
    pub ingredients: Vec<String>,
}

impl AnalysisResult {
    /// Decode an upload response body
    ///
    /// # Errors
    /// - `MarkerNotFound` when either key is absent
    /// - `MalformedList` when the ingredient value is neither a string nor an
    ///   array of strings, or is left unterminated in the raw text
    pub fn parse(raw: &str, config: &LensConfig) -> Result<Self, LensError> {
        let (output_image, ingredients) = match embedded_object(raw) {
            Some(object) => {
                debug!("Decoding embedded JSON object from upload response");
                from_object(&object)?
            }
            None => {
                debug!("No JSON object in upload response, scanning for keys");
                from_markers(raw)?
            }
        };

        Ok(AnalysisResult {
            image_url: config.download_url(&output_image),
            output_image,
            ingredients,
        })
    }

    /// Ingredients joined back into the comma separated search form
    pub fn ingredients_csv(&self) -> String {
        self.ingredients.join(",")
    }
}

/// Split a comma separated ingredient string into tokens
///
/// Every space is removed before splitting and blank tokens are dropped, so
/// `"egg, onion,,garlic"` yields `["egg", "onion", "garlic"]`.
pub fn split_ingredients(csv: &str) -> Vec<String> {
    csv.replace(' ', "")
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// First JSON object in `raw` that carries at least one of the known keys
fn embedded_object(raw: &str) -> Option<Map<String, Value>> {
    raw.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(object)))
                if object.contains_key(OUTPUT_IMAGE) || object.contains_key(INGREDIENTS) =>
            {
                Some(object)
            }
            _ => None,
        }
    })
}

fn from_object(object: &Map<String, Value>) -> Result<(String, Vec<String>), LensError> {
    let output_image = object
        .get(OUTPUT_IMAGE)
        .and_then(Value::as_str)
        .ok_or(LensError::MarkerNotFound(OUTPUT_IMAGE))?
        .to_string();

    let ingredients = match object.get(INGREDIENTS) {
        None => return Err(LensError::MarkerNotFound(INGREDIENTS)),
        Some(Value::String(csv)) => split_ingredients(csv),
        Some(Value::Array(items)) => {
            let mut tokens = Vec::with_capacity(items.len());
            for item in items {
                let name = item.as_str().ok_or_else(|| {
                    LensError::MalformedList(format!("non-string ingredient {}", item))
                })?;
                tokens.extend(split_ingredients(name));
            }
            tokens
        }
        Some(other) => {
            return Err(LensError::MalformedList(format!(
                "expected a string or array, got {}",
                other
            )))
        }
    };

    Ok((output_image, ingredients))
}

fn from_markers(raw: &str) -> Result<(String, Vec<String>), LensError> {
    let output_image = between(raw, "output_image\": \"", &["\""])
        .ok_or(LensError::MarkerNotFound(OUTPUT_IMAGE))?;

    let start = "ingredients\": \"";
    if !raw.contains(start) {
        return Err(LensError::MarkerNotFound(INGREDIENTS));
    }
    // The list is normally followed by another key; accept a closing quote
    // when it is the last one.
    let csv = between(raw, start, &["\",", "\""]).ok_or_else(|| {
        warn!("Unterminated ingredient list in upload response");
        LensError::MalformedList("unterminated ingredient string".to_string())
    })?;

    Ok((output_image.to_string(), split_ingredients(csv)))
}

/// Text after the first `start` up to the first of `ends` that occurs
fn between<'a>(raw: &'a str, start: &str, ends: &[&str]) -> Option<&'a str> {
    let (_, rest) = raw.split_once(start)?;
    ends.iter()
        .find_map(|end| rest.find(end))
        .map(|idx| &rest[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LensConfig {
        LensConfig::default()
    }

    #[test]
    fn test_parse_embedded_json() {
        let raw = r#"{"output_image": "abc.jpg", "ingredients": "egg, onion,,garlic", "count": 3}"#;
        let result = AnalysisResult::parse(raw, &config()).unwrap();

        assert_eq!(result.output_image, "abc.jpg");
        assert_eq!(result.image_url, "http://127.0.0.1:5000/download/abc.jpg");
        assert_eq!(result.ingredients, vec!["egg", "onion", "garlic"]);
        assert_eq!(result.ingredients_csv(), "egg,onion,garlic");
    }

    #[test]
    fn test_parse_json_wrapped_in_text() {
        let raw = "Detection finished {\"ingredients\":[\"egg\",\" milk\"],\"output_image\":\"out_1.jpg\"} done";
        let result = AnalysisResult::parse(raw, &config()).unwrap();

        assert_eq!(result.output_image, "out_1.jpg");
        assert_eq!(result.ingredients, vec!["egg", "milk"]);
    }

    #[test]
    fn test_parse_falls_back_to_markers() {
        // Single-quoted wrapper is not JSON, so the keys are scanned for
        let raw = r#"{'result': output_image": "abc.jpg", ingredients": "egg, onion,,garlic", }"#;
        let result = AnalysisResult::parse(raw, &config()).unwrap();

        assert_eq!(result.image_url, "http://127.0.0.1:5000/download/abc.jpg");
        assert_eq!(result.ingredients, vec!["egg", "onion", "garlic"]);
    }

    #[test]
    fn test_markers_accept_trailing_ingredient_key() {
        let raw = r#"output_image": "x.png", ingredients": "kimchi,pork""#;
        let result = AnalysisResult::parse(raw, &config()).unwrap();
        assert_eq!(result.ingredients, vec!["kimchi", "pork"]);
    }

    #[test]
    fn test_missing_ingredients_is_an_error() {
        let raw = r#"{"output_image": "abc.jpg"}"#;
        let err = AnalysisResult::parse(raw, &config()).unwrap_err();
        assert!(matches!(err, LensError::MarkerNotFound("ingredients")));
    }

    #[test]
    fn test_missing_output_image_is_an_error() {
        let err = AnalysisResult::parse("Internal Server Error", &config()).unwrap_err();
        assert!(matches!(err, LensError::MarkerNotFound("output_image")));
    }

    #[test]
    fn test_wrong_ingredient_shape_is_malformed() {
        let raw = r#"{"output_image": "abc.jpg", "ingredients": 7}"#;
        let err = AnalysisResult::parse(raw, &config()).unwrap_err();
        assert!(matches!(err, LensError::MalformedList(_)));
    }

    #[test]
    fn test_split_strips_internal_spaces() {
        assert_eq!(
            split_ingredients("Spring onion, bean curd"),
            vec!["Springonion", "beancurd"]
        );
        assert!(split_ingredients(" , ,").is_empty());
    }
}
