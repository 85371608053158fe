//! Host configuration.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::protocol::NFC_CONTROLLER_FIRMWARE_FILE_NAME;

/// Configuration of a device host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Path to the controller firmware image.
    pub firmware_path: PathBuf,
    /// Path to the TOML preference file.
    pub preferences_path: PathBuf,
    /// Directory reported as NFA storage.
    pub storage_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            firmware_path: PathBuf::from(NFC_CONTROLLER_FIRMWARE_FILE_NAME),
            preferences_path: PathBuf::from("nfc_prefs.toml"),
            storage_dir: PathBuf::from("."),
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HostConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
