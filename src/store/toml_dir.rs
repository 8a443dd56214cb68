//! File-backed store: one `<name>.toml` file per configuration object.
//!
//! Saving replays the recorded `set` calls onto the existing document with
//! `toml_edit`, so comments and formatting in the file survive.

use std::path::{Path, PathBuf};

use toml::{Table, Value};
use toml_edit::{DocumentMut, InlineTable, Item};

use super::{ConfigSource, ConfigStore, EditableConfig, StoreError};

#[derive(Debug, Clone)]
pub struct TomlDirStore {
    root: PathBuf,
}

impl TomlDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `name`, or `None` when the name would escape the directory.
    pub fn object_path(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        valid.then(|| self.root.join(format!("{name}.toml")))
    }
}

impl ConfigSource for TomlDirStore {
    fn get_editable(&self, name: &str) -> Option<EditableConfig> {
        let Some(path) = self.object_path(name) else {
            tracing::warn!(config = name, "invalid configuration object name");
            return None;
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    config = name,
                    path = %path.display(),
                    "no such configuration object"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    config = name,
                    path = %path.display(),
                    error = %e,
                    "cannot read configuration object"
                );
                return None;
            }
        };

        match content.parse::<Table>() {
            Ok(data) => Some(EditableConfig::new(name, data)),
            Err(e) => {
                tracing::warn!(
                    config = name,
                    path = %path.display(),
                    error = %e,
                    "cannot parse configuration object"
                );
                None
            }
        }
    }
}

impl ConfigStore for TomlDirStore {
    fn save(&mut self, config: EditableConfig) -> Result<(), StoreError> {
        let path = self
            .object_path(config.name())
            .ok_or_else(|| {
                StoreError::Rejected(format!("invalid object name '{}'", config.name()))
            })?;

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };

        let new_content = apply_edits(&content, config.edits(), &path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(&path, new_content).map_err(|e| StoreError::Io { path, source: e })
    }
}

/// Pure function: replay `edits` onto a TOML document string.
pub(crate) fn apply_edits(
    content: &str,
    edits: &[(String, Value)],
    path: &Path,
) -> Result<String, StoreError> {
    let mut doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        StoreError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    for (key, value) in edits {
        set_in_document(&mut doc, key, value);
    }

    Ok(doc.to_string())
}

fn set_in_document(doc: &mut DocumentMut, key: &str, value: &Value) {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current: &mut Item = doc.as_item_mut();
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        if !current.get(segment).is_some_and(Item::is_table_like) {
            current[segment] = if current.is_inline_table() {
                Item::Value(toml_edit::Value::InlineTable(InlineTable::new()))
            } else {
                let mut table = toml_edit::Table::new();
                table.set_implicit(true);
                Item::Table(table)
            };
        }
        current = &mut current[segment];
    }

    current[leaf] = if current.is_inline_table() {
        Item::Value(to_edit_value(value))
    } else {
        to_edit_item(value)
    };
}

fn to_edit_item(value: &Value) -> Item {
    match value {
        Value::Table(t) => {
            let mut table = toml_edit::Table::new();
            for (k, v) in t {
                table.insert(k, to_edit_item(v));
            }
            Item::Table(table)
        }
        other => Item::Value(to_edit_value(other)),
    }
}

fn to_edit_value(value: &Value) -> toml_edit::Value {
    match value {
        Value::String(s) => s.as_str().into(),
        Value::Integer(i) => (*i).into(),
        Value::Float(f) => (*f).into(),
        Value::Boolean(b) => (*b).into(),
        Value::Datetime(dt) => {
            let text = dt.to_string();
            text.parse().unwrap_or_else(|_| text.as_str().into())
        }
        Value::Array(items) => {
            toml_edit::Value::Array(items.iter().map(to_edit_value).collect())
        }
        Value::Table(t) => toml_edit::Value::InlineTable(
            t.iter()
                .map(|(k, v)| (k.as_str(), to_edit_value(v)))
                .collect(),
        ),
    }
}
