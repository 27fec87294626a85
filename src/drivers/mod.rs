//! Inventory lookup drivers
//!
//! The router talks to the tracker backend through the `InventoryDriver`
//! trait. The HTTP driver is the production path; the console driver logs
//! lookups for dry runs and tests.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod console;
pub mod http;

pub use console::ConsoleDriver;
pub use http::HttpInventoryDriver;

/// Box metadata returned by the lookup endpoint.
///
/// The backend answers `{"found": false}` with no other fields for unknown
/// barcodes, hence the optional members.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoxInfo {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_quantity: Option<i64>,
}

impl BoxInfo {
    pub fn not_found() -> Self {
        Self {
            found: false,
            box_id: None,
            hardware_type: None,
            lot_number: None,
            remaining_quantity: None,
        }
    }
}

/// Driver trait - all inventory backends implement this
///
/// Note: All methods take &self (not &mut self) to support Arc<dyn
/// InventoryDriver>. Drivers should use interior mutability for mutable
/// state.
#[async_trait]
pub trait InventoryDriver: Send + Sync {
    /// Get the driver name (e.g., "console", "inventory-http")
    fn name(&self) -> &str;

    /// Initialize the driver (build clients, verify configuration, etc.)
    async fn init(&self) -> Result<()>;

    /// Look up box metadata for a barcode
    async fn lookup(&self, barcode: &str) -> Result<BoxInfo>;

    /// Shutdown the driver gracefully
    async fn shutdown(&self) -> Result<()>;
}
