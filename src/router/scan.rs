//! Scan deadline polling and scanned-barcode handling

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::fields::FieldEvent;
use crate::input::Classification;

use super::Router;

impl Router {
    /// Earliest pending deadline across detectors and field flashes.
    /// The event loop sleeps until this instant.
    pub fn next_deadline(&self) -> Option<Instant> {
        let detector_deadline = self
            .detectors
            .lock()
            .values()
            .filter_map(|d| d.deadline())
            .min();
        let flash_deadline = self.form.lock().next_flash_deadline();

        match (detector_deadline, flash_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Expire due deadlines: classify finished bursts and clear finished
    /// flashes
    pub async fn poll(&self, now: Instant) {
        let scans: Vec<(String, String)> = {
            let mut detectors = self.detectors.lock();
            let mut scans = Vec::new();
            for (field, detector) in detectors.iter_mut() {
                match detector.expire(now) {
                    Some(Classification::Scan(code)) => scans.push((field.clone(), code)),
                    Some(Classification::Discarded) => {
                        debug!("Burst on '{}' discarded as human typing", field);
                    }
                    None => {}
                }
            }
            scans
        };

        for (field, code) in scans {
            self.handle_scanned_barcode(&field, &code, now).await;
        }

        self.form.lock().clear_expired_flashes(now);
    }

    /// Apply a completed scan: set the field value, notify listeners, flash
    /// the field, and dispatch a lookup when the active page calls for one
    pub(crate) async fn handle_scanned_barcode(&self, field_name: &str, code: &str, now: Instant) {
        let flash_ms = self.input_cfg.read().flash_ms;

        {
            let mut form = self.form.lock();
            let Some(field) = form.get_mut(field_name) else {
                return;
            };
            field.set_value(code);
            field.flash(now + Duration::from_millis(flash_ms));
        }

        info!("📠 Scan detected on '{}': {}", field_name, code);

        let _ = self.field_events.send(FieldEvent::Changed {
            field: field_name.to_string(),
            value: code.to_string(),
        });

        if self.auto_lookup_active().await {
            self.dispatch_lookup(code);
        }
    }
}
