use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Settings key holding the expanded-folder paths.
pub const EXPANDED_FOLDERS_KEY: &str = "Config/ExpandedFolders";

/// Errors raised by the persistent stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store IO failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store JSON failed for {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/* ============================ Store contracts ============================== */

/// Per-filter visibility keyed by filter hash. Unknown hashes are visible.
pub trait VisibilityStore {
    fn is_visible(&self, hash: &str) -> bool;
    fn set_visibility(&mut self, hash: &str, visible: bool);
    fn load(&mut self) -> Result<(), StoreError>;
    fn save(&self) -> Result<(), StoreError>;
}

/// String-list settings, e.g. [`EXPANDED_FOLDERS_KEY`].
pub trait SettingsStore {
    fn string_list(&self, key: &str) -> Option<Vec<String>>;
    fn set_string_list(&mut self, key: &str, list: Vec<String>);
    fn load(&mut self) -> Result<(), StoreError>;
    fn save(&self) -> Result<(), StoreError>;
}

/* ============================ In-memory stores ============================= */

#[derive(Debug, Clone, Default)]
pub struct MemoryVisibilityStore {
    hidden: BTreeSet<String>,
}

impl MemoryVisibilityStore {
    #[must_use]
    pub fn with_hidden<I, S>(hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hidden: hashes.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn hidden(&self) -> &BTreeSet<String> {
        &self.hidden
    }
}

impl VisibilityStore for MemoryVisibilityStore {
    fn is_visible(&self, hash: &str) -> bool {
        !self.hidden.contains(hash)
    }

    fn set_visibility(&mut self, hash: &str, visible: bool) {
        if visible {
            self.hidden.remove(hash);
        } else {
            self.hidden.insert(hash.to_string());
        }
    }

    fn load(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, Vec<String>>,
}

impl SettingsStore for MemorySettings {
    fn string_list(&self, key: &str) -> Option<Vec<String>> {
        self.values.get(key).cloned()
    }

    fn set_string_list(&mut self, key: &str, list: Vec<String>) {
        self.values.insert(key.to_string(), list);
    }

    fn load(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/* ============================== JSON stores ================================ */

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct VisibilityFile {
    version: u32,
    /// Hashes of filters the user has hidden.
    #[serde(default)]
    hidden: BTreeSet<String>,
}

/// Visibility persisted as a JSON list of hidden hashes.
#[derive(Debug, Clone)]
pub struct JsonVisibilityStore {
    path: PathBuf,
    inner: MemoryVisibilityStore,
}

impl JsonVisibilityStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemoryVisibilityStore::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VisibilityStore for JsonVisibilityStore {
    fn is_visible(&self, hash: &str) -> bool {
        self.inner.is_visible(hash)
    }

    fn set_visibility(&mut self, hash: &str, visible: bool) {
        self.inner.set_visibility(hash, visible);
    }

    /// A missing file means "everything visible".
    fn load(&mut self) -> Result<(), StoreError> {
        let file: VisibilityFile = read_json_or_default(&self.path)?;
        self.inner.hidden = file.hidden;
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        let file = VisibilityFile {
            version: 1,
            hidden: self.inner.hidden.clone(),
        };
        write_json_atomic(&self.path, &file)
    }
}

/// Settings persisted as a flat JSON object of string lists.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    inner: MemorySettings,
}

impl JsonSettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemorySettings::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn string_list(&self, key: &str) -> Option<Vec<String>> {
        self.inner.string_list(key)
    }

    fn set_string_list(&mut self, key: &str, list: Vec<String>) {
        self.inner.set_string_list(key, list);
    }

    fn load(&mut self) -> Result<(), StoreError> {
        self.inner.values = read_json_or_default(&self.path)?;
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        write_json_atomic(&self.path, &self.inner.values)
    }
}

/* ================================ JSON IO ================================== */

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&data).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes next to the target first and renames over it.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let data = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
