//! Page navigation and management

use anyhow::{anyhow, Result};
use tracing::info;

use crate::config::PageConfig;

use super::{form_from_page, Router};

impl Router {
    /// Get the active page configuration
    pub async fn get_active_page(&self) -> Option<PageConfig> {
        let config = self.config.read().await;
        let index = *self.active_page_index.read().await;
        config.pages.get(index).cloned()
    }

    /// Get the active page name
    pub async fn get_active_page_name(&self) -> String {
        self.get_active_page()
            .await
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "(none)".to_string())
    }

    /// Whether a detected scan on the active page triggers a lookup
    pub async fn auto_lookup_active(&self) -> bool {
        self.get_active_page()
            .await
            .map(|p| p.auto_lookup())
            .unwrap_or(false)
    }

    /// List all page names
    pub async fn list_pages(&self) -> Vec<String> {
        let config = self.config.read().await;
        config.pages.iter().map(|p| p.name.clone()).collect()
    }

    /// Set active page by index or name
    pub async fn set_active_page(&self, name_or_index: &str) -> Result<()> {
        let config = self.config.read().await;

        // Try parsing as index first
        if let Ok(index) = name_or_index.parse::<usize>() {
            if index < config.pages.len() {
                *self.active_page_index.write().await = index;
                let page_name = self.get_active_page_name().await;
                info!("Active page: {}", page_name);
                drop(config); // Release lock before refresh
                self.refresh_form().await;
                return Ok(());
            }
            return Err(anyhow!("Page index {} out of range", index));
        }

        // Try finding by name
        if let Some(index) = config
            .pages
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name_or_index))
        {
            *self.active_page_index.write().await = index;
            let page_name = self.get_active_page_name().await;
            info!("Active page: {}", page_name);
            drop(config); // Release lock before refresh
            self.refresh_form().await;
            return Ok(());
        }

        Err(anyhow!("Page '{}' not found", name_or_index))
    }

    /// Navigate to the next page (circular)
    pub async fn next_page(&self) {
        let config = self.config.read().await;
        if config.pages.is_empty() {
            return;
        }

        let mut index = self.active_page_index.write().await;
        *index = (*index + 1) % config.pages.len();
        let page_name = config.pages[*index].name.clone();
        info!("Next page → {}", page_name);
        drop(index);
        drop(config);

        self.refresh_form().await;
    }

    /// Navigate to the previous page (circular)
    pub async fn prev_page(&self) {
        let config = self.config.read().await;
        if config.pages.is_empty() {
            return;
        }

        let mut index = self.active_page_index.write().await;
        *index = if *index == 0 {
            config.pages.len() - 1
        } else {
            *index - 1
        };
        let page_name = config.pages[*index].name.clone();
        info!("Previous page → {}", page_name);
        drop(index);
        drop(config);

        self.refresh_form().await;
    }

    /// Rebuild transient state for the active page: fresh form, no pending
    /// detector buffers, hidden panel
    pub(crate) async fn refresh_form(&self) {
        let config = self.config.read().await;
        let index = *self.active_page_index.read().await;
        let form = config
            .pages
            .get(index)
            .map(form_from_page)
            .unwrap_or_default();
        drop(config);

        *self.form.lock() = form;
        self.detectors.lock().clear();
        self.panel.write().reset();
    }
}
