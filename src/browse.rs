use crate::model::RecipeSummary;
use crate::navigation::Route;

/// Number of columns the recipe grid is laid out in
pub const GRID_COLUMNS: usize = 2;

/// Session-scoped favorites, in the order they were added
///
/// Membership is by value: a summary is a favorite if an equal summary is in
/// the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    recipes: Vec<RecipeSummary>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, recipe: &RecipeSummary) -> bool {
        self.recipes.contains(recipe)
    }

    /// Remove `recipe` if present, append it otherwise
    ///
    /// Returns whether the recipe is a favorite afterwards.
    pub fn toggle(&mut self, recipe: &RecipeSummary) -> bool {
        if let Some(pos) = self.recipes.iter().position(|r| r == recipe) {
            self.recipes.remove(pos);
            false
        } else {
            self.recipes.push(recipe.clone());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeSummary> {
        self.recipes.iter()
    }

    pub fn as_slice(&self) -> &[RecipeSummary] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Rows of at most `columns` recipes, in list order
pub fn grid_rows(recipes: &[RecipeSummary], columns: usize) -> Vec<&[RecipeSummary]> {
    recipes.chunks(columns.max(1)).collect()
}

/// How a selected recipe is handed to the detail screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailTarget {
    /// By numeric id; the detail screen fetches the record
    ById(i64),
    /// By title and image, for screens that only show the summary
    ByTitleImage { title: String, image: String },
}

impl DetailTarget {
    pub fn for_recipe(recipe: &RecipeSummary) -> Self {
        DetailTarget::ById(recipe.id)
    }

    pub fn route(&self) -> Route {
        match self {
            DetailTarget::ById(id) => Route::RecipeInfo { id: *id },
            DetailTarget::ByTitleImage { title, image } => Route::RecipeInfoLegacy {
                title: title.clone(),
                image: image.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, title: &str) -> RecipeSummary {
        RecipeSummary {
            id,
            title: title.to_string(),
            image: format!("{}.jpg", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::new();
        let soup = recipe(1, "Kimchi stew");

        assert!(favorites.toggle(&soup));
        assert_eq!(favorites.as_slice(), &[soup.clone()]);

        assert!(!favorites.toggle(&soup));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_membership_is_by_value() {
        let mut favorites = Favorites::new();
        favorites.toggle(&recipe(1, "Kimchi stew"));

        assert!(favorites.contains(&recipe(1, "Kimchi stew")));

        let mut liked = recipe(1, "Kimchi stew");
        liked.likes = 10;
        assert!(!favorites.contains(&liked));
    }

    #[test]
    fn test_toggle_keeps_order_of_others() {
        let mut favorites = Favorites::new();
        let (a, b, c) = (recipe(1, "a"), recipe(2, "b"), recipe(3, "c"));
        favorites.toggle(&a);
        favorites.toggle(&b);
        favorites.toggle(&c);
        favorites.toggle(&b);

        let ids: Vec<i64> = favorites.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_grid_rows_two_columns() {
        let recipes: Vec<_> = (1..=5).map(|i| recipe(i, "r")).collect();
        let rows = grid_rows(&recipes, GRID_COLUMNS);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].len(), 1);
        assert_eq!(rows[2][0].id, 5);
    }

    #[test]
    fn test_detail_target_routes() {
        assert_eq!(
            DetailTarget::for_recipe(&recipe(42, "x")).route(),
            Route::RecipeInfo { id: 42 }
        );
        let legacy = DetailTarget::ByTitleImage {
            title: "Pajeon".to_string(),
            image: "p.jpg".to_string(),
        };
        assert!(matches!(legacy.route(), Route::RecipeInfoLegacy { .. }));
    }
}
