use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` the same as a missing key
///
/// Struct-level `#[serde(default)]` only covers absent keys, and the service
/// sends `null` for images, aisles and units it does not know.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ingredient attached to a recipe summary, either one the user has or one
/// they are missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub aisle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
}

/// Lightweight recipe record returned by the search endpoint
///
/// Equality is by value over every field. Two summaries with the same title
/// but different like counts are different favorites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub likes: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub used_ingredient_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub used_ingredients: Vec<RecipeIngredient>,
    #[serde(deserialize_with = "null_as_default")]
    pub missed_ingredient_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub missed_ingredients: Vec<RecipeIngredient>,
}

/// Full recipe record returned by the detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub aggregate_likes: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub servings: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub ready_in_minutes: u32,
    pub preparation_minutes: Option<i32>,
    pub cooking_minutes: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub health_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub price_per_serving: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub spoonacular_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub weight_watcher_smart_points: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub cheap: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub dairy_free: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub gluten_free: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub low_fodmap: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub sustainable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub vegan: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub vegetarian: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub very_healthy: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub very_popular: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub gaps: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cuisines: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub diets: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub dish_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub occasions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub credits_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub spoonacular_source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(deserialize_with = "null_as_default")]
    pub analyzed_instructions: Vec<InstructionSet>,
    #[serde(deserialize_with = "null_as_default")]
    pub extended_ingredients: Vec<ExtendedIngredient>,
    pub wine_pairing: Option<WinePairing>,
}

impl RecipeDetail {
    /// Steps of every instruction set, numbered as the service numbered them
    pub fn numbered_steps(&self) -> Vec<String> {
        self.analyzed_instructions
            .iter()
            .flat_map(|set| set.steps.iter())
            .map(|step| format!("{}. {}", step.number, step.step))
            .collect()
    }

    /// Original ingredient lines, in service order
    pub fn ingredient_lines(&self) -> Vec<&str> {
        self.extended_ingredients
            .iter()
            .map(|i| i.original.as_str())
            .collect()
    }
}

/// Named group of steps; unnamed groups have an empty `name`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionSet {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    #[serde(deserialize_with = "null_as_default")]
    pub number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub step: String,
    #[serde(deserialize_with = "null_as_default")]
    pub equipment: Vec<StepItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: Vec<StepItem>,
    pub length: Option<StepLength>,
}

/// Equipment or ingredient mentioned in a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub localized_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepLength {
    #[serde(deserialize_with = "null_as_default")]
    pub number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtendedIngredient {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub aisle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub consistency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub name_clean: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub original: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub measures: Measures,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measures {
    #[serde(deserialize_with = "null_as_default")]
    pub metric: Measure,
    #[serde(deserialize_with = "null_as_default")]
    pub us: Measure,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Measure {
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_long: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_short: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WinePairing {
    #[serde(deserialize_with = "null_as_default")]
    pub paired_wines: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pairing_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_matches: Vec<ProductMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub average_rating: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_count: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}
