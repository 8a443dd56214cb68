//! Configuration store seam.
//!
//! The overlay manager talks to the platform's configuration storage only
//! through these traits. Reading ([`ConfigSource`]) and writing
//! ([`ConfigStore`]) are split so a caller holding only a shared reference
//! cannot persist anything.

mod toml_dir;

pub use toml_dir::TomlDirStore;

use std::path::PathBuf;

use thiserror::Error;
use toml::{Table, Value};

use crate::overrides::{get_nested, set_nested};

/// Errors raised when a store rejects a write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{0}")]
    Rejected(String),
}

/// Read side of a configuration store.
pub trait ConfigSource {
    /// Load a configuration object for editing. `None` means the object does
    /// not exist or cannot be read; this never fails.
    fn get_editable(&self, name: &str) -> Option<EditableConfig>;
}

/// Write side of a configuration store.
pub trait ConfigStore: ConfigSource {
    /// Persist an edited configuration object.
    fn save(&mut self, config: EditableConfig) -> Result<(), StoreError>;
}

/// A configuration object loaded for editing.
///
/// Holds a working copy of the object's data plus the ordered list of `set`
/// calls made on it, so stores can either replace the whole object or replay
/// the individual edits.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableConfig {
    name: String,
    data: Table,
    edits: Vec<(String, Value)>,
}

impl EditableConfig {
    pub fn new(name: impl Into<String>, data: Table) -> Self {
        Self {
            name: name.into(),
            data,
            edits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current data, including unsaved edits.
    pub fn data(&self) -> &Table {
        &self.data
    }

    /// Edits made since the object was loaded, in call order.
    pub fn edits(&self) -> &[(String, Value)] {
        &self.edits
    }

    /// Read a value by dotted key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        get_nested(&self.data, key)
    }

    /// Set a value by dotted key, creating intermediate tables as needed.
    /// The value replaces whatever was stored at `key`, tables included.
    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        set_nested(&mut self.data, key, value.clone());
        self.edits.push((key.to_string(), value));
        self
    }

    pub fn into_data(self) -> Table {
        self.data
    }
}
