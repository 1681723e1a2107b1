use log::debug;
use std::fmt;

/// Screens and their parameters
///
/// Paths look like `recipeInfo/42`; string parameters are URL-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Favorite,
    Profile {
        user_id: String,
    },
    Camera,
    Analysis {
        image_ref: String,
    },
    RecipeList,
    RecipeInfo {
        id: i64,
    },
    RecipeInfoLegacy {
        title: String,
        image: String,
    },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "home".to_string(),
            Route::Favorite => "favorite".to_string(),
            Route::Profile { user_id } => format!("profile/{}", urlencoding::encode(user_id)),
            Route::Camera => "camera".to_string(),
            Route::Analysis { image_ref } => {
                format!("analysis/{}", urlencoding::encode(image_ref))
            }
            Route::RecipeList => "recipe".to_string(),
            Route::RecipeInfo { id } => format!("recipeInfo/{}", id),
            Route::RecipeInfoLegacy { title, image } => format!(
                "recipeInfo/{}/{}",
                urlencoding::encode(title),
                urlencoding::encode(image)
            ),
        }
    }

    /// Decode a path
    ///
    /// Parameters that fail to decode fall back to defaults (`0` for ids, an
    /// empty string otherwise) instead of failing. Unknown paths go home.
    pub fn parse(path: &str) -> Route {
        // Trailing empty segments are parameters: `recipeInfo/Pajeon/` has an
        // empty image.
        let mut segments = path.trim_start_matches('/').split('/');
        let name = segments.next().unwrap_or_default();
        let params: Vec<String> = segments.map(decode_param).collect();
        let param = |i: usize| params.get(i).cloned().unwrap_or_default();

        match (name, params.len()) {
            ("home", _) | ("", _) => Route::Home,
            ("favorite", _) => Route::Favorite,
            ("profile", _) => Route::Profile { user_id: param(0) },
            ("camera", _) => Route::Camera,
            ("analysis", _) => Route::Analysis {
                image_ref: param(0),
            },
            ("recipe", _) => Route::RecipeList,
            ("recipeInfo", n) if n >= 2 => Route::RecipeInfoLegacy {
                title: param(0),
                image: param(1),
            },
            ("recipeInfo", _) => Route::RecipeInfo {
                id: param(0).parse().unwrap_or_else(|_| {
                    debug!("Recipe id in '{}' does not parse, using 0", path);
                    0
                }),
            },
            _ => {
                debug!("Unknown route '{}', going home", path);
                Route::Home
            }
        }
    }

    /// Whether the route is one of the bottom navigation tabs
    pub fn is_tab(&self) -> bool {
        matches!(self, Route::Home | Route::Favorite | Route::Profile { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode_param(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_default()
}

/// Bottom navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Favorite,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Favorite, Tab::Profile];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Favorite => "Favorite",
            Tab::Profile => "Profile",
        }
    }

    pub fn route(&self, user_id: &str) -> Route {
        match self {
            Tab::Home => Route::Home,
            Tab::Favorite => Route::Favorite,
            Tab::Profile => Route::Profile {
                user_id: user_id.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_decode_back() {
        let routes = [
            Route::Home,
            Route::Favorite,
            Route::Profile {
                user_id: "김철수".to_string(),
            },
            Route::Analysis {
                image_ref: "content://media/external/images/media/42".to_string(),
            },
            Route::RecipeList,
            Route::RecipeInfo { id: 715538 },
            Route::RecipeInfoLegacy {
                title: "Rice & Beans".to_string(),
                image: "https://img.example/r b.jpg".to_string(),
            },
            Route::RecipeInfoLegacy {
                title: "Pajeon".to_string(),
                image: String::new(),
            },
            Route::RecipeInfoLegacy {
                title: String::new(),
                image: String::new(),
            },
            Route::Profile {
                user_id: String::new(),
            },
            Route::Analysis {
                image_ref: String::new(),
            },
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_leading_slash_is_ignored() {
        assert_eq!(Route::parse("/recipeInfo/7"), Route::RecipeInfo { id: 7 });
        assert_eq!(Route::parse("/favorite"), Route::Favorite);
    }

    #[test]
    fn test_bad_recipe_id_falls_back_to_zero() {
        assert_eq!(Route::parse("recipeInfo/abc"), Route::RecipeInfo { id: 0 });
        assert_eq!(Route::parse("recipeInfo"), Route::RecipeInfo { id: 0 });
    }

    #[test]
    fn test_undecodable_param_falls_back_to_empty() {
        // %FF is not valid UTF-8
        assert_eq!(
            Route::parse("profile/%FF"),
            Route::Profile {
                user_id: String::new()
            }
        );
    }

    #[test]
    fn test_unknown_route_goes_home() {
        assert_eq!(Route::parse("recipeScreen"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
    }

    #[test]
    fn test_tabs() {
        assert_eq!(Tab::ALL.len(), 3);
        assert_eq!(Tab::Favorite.route("me"), Route::Favorite);
        assert!(Tab::Profile.route("me").is_tab());
        assert!(!Route::RecipeList.is_tab());
    }
}
