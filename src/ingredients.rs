/// Ingredient names offered when the user adds to a detected list
pub const VOCABULARY: [&str; 35] = [
    "kimchi",
    "pork",
    "beef",
    "chicken",
    "sausage",
    "Fish Cakes",
    "Radish",
    "bean curd",
    "onion",
    "Spring onion",
    "garlic",
    "potato",
    "pepper",
    "egg",
    "Carrot",
    "milk",
    "Sliced Cheese",
    "Frozen dumplings",
    "Ramen",
    "bean sprouts",
    "Canned tuna",
    "cucumber",
    "enoki mushroom",
    "Matsutake mushroom",
    "Shiitake mushrooms",
    "bacon",
    "spam",
    "tomato",
    "Cherry Tomatoes",
    "Bean",
    "Tomato",
    "Cheese",
    "Basil",
    "Garlic",
    "Onion",
];

/// Case-sensitive membership test against [`VOCABULARY`]
pub fn vocabulary_contains(name: &str) -> bool {
    VOCABULARY.contains(&name)
}

/// Editable list of ingredient tokens
///
/// Tokens keep insertion order and duplicates. Blank tokens may be stored but
/// are never shown or searched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientList {
    tokens: Vec<String>,
}

impl IngredientList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a token at the end, even if it is already present
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Tokens as displayed: everything that is not blank
    pub fn visible(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .collect()
    }

    /// Visible tokens joined with commas, the form the search endpoint takes
    pub fn to_csv(&self) -> String {
        self.visible().join(",")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order_and_duplicates() {
        let mut list = IngredientList::from_tokens(["egg"]);
        list.push("Basil");
        list.push("egg");

        assert_eq!(list.visible(), vec!["egg", "Basil", "egg"]);
        assert_eq!(list.to_csv(), "egg,Basil,egg");
    }

    #[test]
    fn test_visible_hides_blank_tokens() {
        let list = IngredientList::from_tokens(["egg", "", "  ", "onion"]);
        assert_eq!(list.len(), 4);
        assert_eq!(list.visible(), vec!["egg", "onion"]);
        assert_eq!(list.to_csv(), "egg,onion");
    }

    #[test]
    fn test_vocabulary_is_case_sensitive() {
        assert_eq!(VOCABULARY.len(), 35);
        assert!(vocabulary_contains("Garlic"));
        assert!(vocabulary_contains("garlic"));
        assert!(!vocabulary_contains("GARLIC"));
    }
}
