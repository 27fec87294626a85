//! Router module - Core orchestration of key events, scan detection, and
//! lookups
//!
//! The Router is the explicitly constructed controller that owns:
//! - The active page's form (focus, typing, blur validation)
//! - One scan detector per barcode field
//! - Lookup dispatch to the inventory driver and reply application
//! - Page navigation, which gates automatic lookups
//!
//! It replaces the original's ambient global handler: `main` builds exactly
//! one Router and injects the driver and config into it.

mod keys;
mod lookup;
mod page;
mod scan;


pub use lookup::LookupOutcome;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::info;

use crate::config::{AppConfig, InputConfig, PageConfig};
use crate::drivers::InventoryDriver;
use crate::fields::{Field, FieldEvent, Form};
use crate::input::ScanDetector;
use crate::panel::BoxInfoPanel;

/// Main router orchestrating the form, scan detection, and lookup flow
pub struct Router {
    /// Application configuration
    pub(crate) config: Arc<RwLock<AppConfig>>,
    /// Keystroke parameters, mirrored for lock-free-ish sync access
    pub(crate) input_cfg: parking_lot::RwLock<InputConfig>,
    /// Inventory lookup backend
    pub(crate) driver: Arc<dyn InventoryDriver>,
    /// Fields of the active page
    pub(crate) form: parking_lot::Mutex<Form>,
    /// Scan detector per barcode field (at most one pending deadline each)
    pub(crate) detectors: parking_lot::Mutex<HashMap<String, ScanDetector>>,
    /// Lookup result display
    pub(crate) panel: parking_lot::RwLock<BoxInfoPanel>,
    /// Active page index
    pub(crate) active_page_index: Arc<RwLock<usize>>,
    /// Change notifications for programmatic field writes
    pub(crate) field_events: mpsc::UnboundedSender<FieldEvent>,
    /// Receiver for field events (stored for retrieval)
    pub(crate) field_events_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<FieldEvent>>>,
    /// Completed lookup replies from spawned tasks
    pub(crate) lookup_tx: mpsc::UnboundedSender<LookupOutcome>,
    /// Receiver for lookup replies (stored for retrieval)
    pub(crate) lookup_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<LookupOutcome>>>,
}

impl Router {
    /// Create a new Router with initial configuration and lookup driver
    pub fn new(config: AppConfig, driver: Arc<dyn InventoryDriver>) -> Self {
        let (field_tx, field_rx) = mpsc::unbounded_channel();
        let (lookup_tx, lookup_rx) = mpsc::unbounded_channel();

        let form = config
            .pages
            .first()
            .map(form_from_page)
            .unwrap_or_default();
        let input_cfg = config.input.clone();

        Self {
            config: Arc::new(RwLock::new(config)),
            input_cfg: parking_lot::RwLock::new(input_cfg),
            driver,
            form: parking_lot::Mutex::new(form),
            detectors: parking_lot::Mutex::new(HashMap::new()),
            panel: parking_lot::RwLock::new(BoxInfoPanel::new()),
            active_page_index: Arc::new(RwLock::new(0)),
            field_events: field_tx,
            field_events_rx: parking_lot::Mutex::new(Some(field_rx)),
            lookup_tx,
            lookup_rx: parking_lot::Mutex::new(Some(lookup_rx)),
        }
    }

    /// Take the lookup reply receiver (should only be called once by the
    /// main loop or REPL)
    pub fn take_lookup_receiver(&self) -> Option<mpsc::UnboundedReceiver<LookupOutcome>> {
        self.lookup_rx.lock().take()
    }

    /// Take the field event receiver (should only be called once)
    pub fn take_field_event_receiver(&self) -> Option<mpsc::UnboundedReceiver<FieldEvent>> {
        self.field_events_rx.lock().take()
    }

    /// Clone of the current form state, for rendering
    pub fn form_snapshot(&self) -> Form {
        self.form.lock().clone()
    }

    /// Rendered panel lines, for display surfaces
    pub fn panel_lines(&self) -> Vec<String> {
        self.panel.read().lines()
    }

    /// Focus a field of the active form by name
    pub fn focus_field(&self, name: &str) -> bool {
        self.form.lock().focus(name)
    }

    /// Update configuration (hot-reload support)
    ///
    /// Rebuilds the active form from the new page set, which drops transient
    /// field values and in-flight detector buffers.
    pub async fn update_config(&self, new_config: AppConfig) -> anyhow::Result<()> {
        info!("🔄 Updating configuration (hot-reload)...");

        *self.input_cfg.write() = new_config.input.clone();
        *self.config.write().await = new_config;

        // Ensure active page index is still valid
        let config = self.config.read().await;
        let mut index = self.active_page_index.write().await;
        if *index >= config.pages.len() {
            *index = 0;
        }
        drop(index);
        drop(config);

        self.refresh_form().await;

        info!("✅ Configuration updated successfully");
        Ok(())
    }
}

/// Build a form from a page's field configuration
pub(crate) fn form_from_page(page: &PageConfig) -> Form {
    let fields = page
        .fields
        .iter()
        .map(|fc| {
            let mut field = Field::new(fc.name.clone(), fc.kind);
            field.suggestions = fc.suggestions.clone();
            field
        })
        .collect();
    Form::new(fields)
}
