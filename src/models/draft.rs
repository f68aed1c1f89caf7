use serde::{Deserialize, Serialize};

/// How the write phase treats an existing draft.
///
/// - `Append`: add new scenes after whatever is already there
/// - `Overwrite`: truncate the draft once before writing the first scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DraftMode {
    #[default]
    Append,
    Overwrite,
}

impl DraftMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Overwrite => "overwrite",
        }
    }
}

/// Render one draft scene as a markdown block headed by its outline point.
pub fn scene_block(outline_point: &str, scene: &str) -> String {
    format!("## {}\n\n{}", outline_point, scene)
}
