//! Configuration management for Barcode GW
//!
//! Handles loading, parsing, and hot-reloading of YAML configuration files.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::fs;

use crate::fields::FieldKind;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub input: InputConfig,
    pub pages: Vec<PageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

/// Inventory backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryConfig {
    /// Base URL of the tracker exposing `/get_box_info/<barcode>`
    pub base_url: String,
    #[serde(default = "default_lookup_timeout_ms")]
    pub timeout_ms: u64,
    /// Lookup driver: "http" or "console" (dry-run)
    #[serde(default = "default_inventory_driver")]
    pub driver: String,
}

/// Keystroke handling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Quiet period after the last keystroke that ends a burst
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// A burst must buffer strictly more keys than this to count as a scan
    #[serde(default = "default_min_scan_keys")]
    pub min_scan_keys: usize,
    /// Duration of the green flash after a detected scan
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_scan_keys: default_min_scan_keys(),
            flash_ms: default_flash_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Directory for daily-rolled log files; console only when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A workflow page of the hosting tracker
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PageConfig {
    pub name: String,
    /// Tracker route this page corresponds to; automatic lookup after a scan
    /// is gated on the active page's path containing `log_pull`
    pub path: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// A single form field on a page
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Completion suggestions for barcode fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl PageConfig {
    /// Whether a detected scan on this page triggers an automatic lookup
    pub fn auto_lookup(&self) -> bool {
        self.path.contains("log_pull")
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.inventory.base_url.is_empty() {
            anyhow::bail!("inventory.base_url cannot be empty");
        }
        if !self.inventory.base_url.starts_with("http://")
            && !self.inventory.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "inventory.base_url must be an http(s) URL, got '{}'",
                self.inventory.base_url
            );
        }
        match self.inventory.driver.as_str() {
            "http" | "console" => {}
            other => anyhow::bail!("Unknown inventory driver '{}' (http or console)", other),
        }

        if self.input.debounce_ms == 0 {
            anyhow::bail!("input.debounce_ms must be greater than 0");
        }
        if self.input.min_scan_keys == 0 {
            anyhow::bail!("input.min_scan_keys must be greater than 0");
        }

        if self.pages.is_empty() {
            anyhow::bail!("At least one page must be defined");
        }

        let mut page_names = HashSet::new();
        for (page_idx, page) in self.pages.iter().enumerate() {
            if page.name.is_empty() {
                anyhow::bail!("Page {} name cannot be empty", page_idx);
            }
            if !page_names.insert(&page.name) {
                anyhow::bail!("Duplicate page name '{}'", page.name);
            }
            if page.path.is_empty() {
                anyhow::bail!("Page '{}' path cannot be empty", page.name);
            }

            let mut field_names = HashSet::new();
            for field in &page.fields {
                if field.name.is_empty() {
                    anyhow::bail!("Page '{}' has a field with an empty name", page.name);
                }
                if !field_names.insert(&field.name) {
                    anyhow::bail!(
                        "Duplicate field name '{}' in page '{}'",
                        field.name,
                        page.name
                    );
                }
            }
        }

        Ok(())
    }
}

// Default value functions
fn default_lookup_timeout_ms() -> u64 {
    5000
}
fn default_inventory_driver() -> String {
    "http".to_string()
}
fn default_debounce_ms() -> u64 {
    100
}
fn default_min_scan_keys() -> usize {
    5
}
fn default_flash_ms() -> u64 {
    1000
}
