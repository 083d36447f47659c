// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KeyslotError, Result};

/// Settings for one key store instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Number of slots in the backing buffer.
    pub capacity: usize,
    /// JSON manifest of read-only keys to provision at start-up.
    pub bootstrap_manifest: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            bootstrap_manifest: None,
        }
    }
}

impl StoreConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// A relative `bootstrap_manifest` path is resolved against the
    /// directory holding the configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&raw)?;

        if let (Some(manifest), Some(dir)) = (config.bootstrap_manifest.as_mut(), path.parent()) {
            if manifest.is_relative() {
                *manifest = dir.join(&*manifest);
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(KeyslotError::Config("capacity must be at least 1".into()));
        }
        Ok(())
    }
}
