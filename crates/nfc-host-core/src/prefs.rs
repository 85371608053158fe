//! Persistent key-value preferences.
//!
//! The device host keeps exactly one durable value, the modification time of
//! the last firmware image it applied. The store is namespaced the way the
//! platform preference files are: one table per owner, `i64` values inside.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PrefsError;

type Tables = BTreeMap<String, BTreeMap<String, i64>>;

/// Durable `i64` preference storage.
pub trait PreferenceStore: Send {
    /// Read `key` in `namespace`, or `default` if it was never written.
    fn get_long(&self, namespace: &str, key: &str, default: i64) -> i64;

    /// Write `key` in `namespace`.
    fn put_long(&mut self, namespace: &str, key: &str, value: i64) -> Result<(), PrefsError>;
}

/// Volatile store, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    tables: Tables,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_long(&self, namespace: &str, key: &str, default: i64) -> i64 {
        self.tables
            .get(namespace)
            .and_then(|t| t.get(key))
            .copied()
            .unwrap_or(default)
    }

    fn put_long(&mut self, namespace: &str, key: &str, value: i64) -> Result<(), PrefsError> {
        self.tables
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store persisted as a TOML file, rewritten on every `put_long`.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    tables: Tables,
}

impl TomlPreferenceStore {
    /// Open the store at `path`. A missing or empty file yields an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Tables::new()
            } else {
                toml::from_str(&content)?
            }
        } else {
            Tables::new()
        };
        debug!(path = %path.display(), namespaces = tables.len(), "Opened preference store");
        Ok(Self { path, tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `tables` next to the target and rename over it, so the file on
    /// disk is always either the old or the new contents.
    fn save(&self, tables: &Tables) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(tables)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get_long(&self, namespace: &str, key: &str, default: i64) -> i64 {
        self.tables
            .get(namespace)
            .and_then(|t| t.get(key))
            .copied()
            .unwrap_or(default)
    }

    fn put_long(&mut self, namespace: &str, key: &str, value: i64) -> Result<(), PrefsError> {
        // Memory only changes once the file does.
        let mut tables = self.tables.clone();
        tables
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        self.save(&tables)?;
        self.tables = tables;
        Ok(())
    }
}
