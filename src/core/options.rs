use serde::{Deserialize, Serialize};

/// Labels used for synthetic entries. Loaded alongside the catalog so a
/// front end can localize them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeOptions {
    pub fave_folder_label: String,
    pub new_fave_folder_label: String,
    pub visibility_header: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            fave_folder_label: "Faves".to_string(),
            new_fave_folder_label: "New folder".to_string(),
            visibility_header: "Visible".to_string(),
        }
    }
}
