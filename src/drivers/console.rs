//! Console driver - logs all lookups for testing and debugging
//!
//! Useful for exercising scan detection and page flow without a tracker
//! backend. Every lookup is logged and answered with "not found".

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::drivers::{BoxInfo, InventoryDriver};

pub struct ConsoleDriver {
    name: String,
    /// Track if driver is initialized
    initialized: Arc<RwLock<bool>>,
    /// Lookup counter for debugging
    lookup_count: Arc<RwLock<u64>>,
}

impl ConsoleDriver {
    /// Create a new ConsoleDriver with a given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initialized: Arc::new(RwLock::new(false)),
            lookup_count: Arc::new(RwLock::new(0)),
        }
    }
}

#[async_trait]
impl InventoryDriver for ConsoleDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> Result<()> {
        *self.initialized.write().await = true;
        *self.lookup_count.write().await = 0;
        info!("✅ ConsoleDriver '{}' initialized (dry-run lookups)", self.name);
        Ok(())
    }

    async fn lookup(&self, barcode: &str) -> Result<BoxInfo> {
        if !*self.initialized.read().await {
            warn!(
                "⚠️  ConsoleDriver '{}' not initialized, answering not-found",
                self.name
            );
            return Ok(BoxInfo::not_found());
        }

        let mut count = self.lookup_count.write().await;
        *count += 1;
        let lookup_num = *count;
        drop(count);

        info!(
            "🔎 [{}] Driver '{}' lookup: {} [#{}]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.name,
            barcode,
            lookup_num
        );

        debug!(
            driver = %self.name,
            barcode,
            lookup_count = lookup_num,
            "ConsoleDriver lookup"
        );

        Ok(BoxInfo::not_found())
    }

    async fn shutdown(&self) -> Result<()> {
        let was_initialized = *self.initialized.read().await;

        if was_initialized {
            let final_count = *self.lookup_count.read().await;
            info!(
                "🛑 ConsoleDriver '{}' shutting down ({} lookups served)",
                self.name, final_count
            );
        }

        *self.initialized.write().await = false;
        Ok(())
    }
}
