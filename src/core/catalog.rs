use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::core::{options::TreeOptions, store::StoreError, tree::FilterTree};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FilterEntry {
    pub name: String,
    pub hash: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub warning: bool,
}

/// A fave; an empty `name` records an empty fave folder at `path`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FaveEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub path: Vec<String>,
}

/// Everything needed to (re)build a tree from scratch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub options: TreeOptions,
    #[serde(default)]
    pub filters: Vec<FilterEntry>,
    #[serde(default)]
    pub faves: Vec<FaveEntry>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&data).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clears `tree` and adds every entry, then sorts both hierarchies.
    pub fn populate(&self, tree: &mut FilterTree) {
        tree.set_options(self.options.clone());
        tree.clear();
        tree.set_header(&self.header);
        for f in &self.filters {
            tree.add_filter(&f.name, &f.hash, &f.path, f.warning);
        }
        for fave in &self.faves {
            tree.add_fave(&fave.name, &fave.hash, &fave.path);
        }
        tree.sort();
        log::info!(
            "catalog loaded: {} filters, {} faves",
            self.filters.len(),
            self.faves.len()
        );
    }
}
