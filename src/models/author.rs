use serde::{Deserialize, Serialize};

/// Who the memoir is about. Substituted into every prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorContext {
    /// How the protagonist is referred to, e.g. `Josh`.
    pub name: String,
    /// Short description, e.g. `a young woman` or `a veteran`.
    pub description: String,
    /// What the memoir is about, e.g. `motherhood and loss`.
    pub themes: String,
    /// Real names that must survive outlining unchanged.
    pub mentioned_names: Vec<String>,
}

impl Default for AuthorContext {
    fn default() -> Self {
        Self {
            name: "the author".to_string(),
            description: "an author".to_string(),
            themes: "their life".to_string(),
            mentioned_names: Vec::new(),
        }
    }
}
