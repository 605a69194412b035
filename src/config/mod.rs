// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::PageLimits;

const CONFIG_NAME: &str = "musify";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub database_path: String,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
    pub blob: BlobConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            database_path: "musify.db".to_string(),
            default_page_limit: 20,
            max_page_limit: 100,
            blob: BlobConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_limit, self.max_page_limit)
    }
}

/// Blob storage endpoint and URL signing settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BlobConfig {
    pub base_url: String,
    pub bucket: String,
    pub signing_secret: String,
    pub upload_ttl_secs: u32,
    pub download_ttl_secs: u32,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            bucket: "musify".to_string(),
            signing_secret: String::new(),
            upload_ttl_secs: 5 * 60,
            download_ttl_secs: 60 * 60,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_else(|e| {
        log::warn!("Failed to load configuration, using defaults: {e}");
        AppConfig::default()
    })
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, confy::ConfyError> {
    confy::load_path(path)
}
