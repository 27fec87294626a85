//! Lookup dispatch and reply application
//!
//! Lookups run in spawned tasks so the event loop keeps processing keys.
//! There is no cancellation: replies apply in arrival order, and a late
//! reply overwrites the panel regardless of which scan triggered it.
//! Failures are logged and otherwise swallowed.

use std::sync::Arc;

use tracing::{info, warn};

use crate::drivers::BoxInfo;
use crate::panel::BoxDetails;

use super::Router;

/// A completed lookup, sent back to the event loop
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub barcode: String,
    pub info: BoxInfo,
}

impl Router {
    /// Spawn an asynchronous lookup for a barcode
    pub fn dispatch_lookup(&self, barcode: &str) {
        let driver = Arc::clone(&self.driver);
        let tx = self.lookup_tx.clone();
        let barcode = barcode.to_string();

        tokio::spawn(async move {
            match driver.lookup(&barcode).await {
                Ok(info) => {
                    let _ = tx.send(LookupOutcome { barcode, info });
                }
                Err(e) => {
                    warn!("Barcode lookup failed for {}: {:#}", barcode, e);
                }
            }
        });
    }

    /// Apply a lookup reply to the panel and the dependent quantity bound
    pub fn apply_lookup_reply(&self, outcome: LookupOutcome) {
        let LookupOutcome { barcode, info } = outcome;

        if info.found {
            let details = BoxDetails {
                box_id: info.box_id.unwrap_or_default(),
                hardware_type: info.hardware_type.unwrap_or_default(),
                lot_number: info.lot_number.unwrap_or_default(),
                remaining_quantity: info.remaining_quantity.unwrap_or(0),
            };

            info!(
                "📦 Box found for {}: {} ({} remaining)",
                barcode, details.box_id, details.remaining_quantity
            );

            {
                let mut form = self.form.lock();
                if let Some(quantity) = form.get_mut("quantity_pulled") {
                    quantity.max = Some(details.remaining_quantity);
                    quantity.placeholder = Some(format!("Max: {}", details.remaining_quantity));
                }
            }

            self.panel.write().show_found(details);
        } else {
            info!("📦 Box not found for {}", barcode);
            self.panel.write().show_not_found();
        }
    }
}
