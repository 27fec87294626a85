//! Key event routing
//!
//! Translates key-downs into field edits, focus traversal with blur
//! validation, the global focus shortcut, and scan detector feeds.

use std::time::Instant;

use tracing::{debug, info};

use crate::fields::FieldKind;
use crate::input::{format, Key, KeyPress};
use crate::validate::FormValidator;

use super::Router;

impl Router {
    /// Route a key-down at the current instant
    pub fn on_key(&self, press: KeyPress) {
        self.on_key_at(press, Instant::now());
    }

    /// Route a key-down observed at `now`
    pub fn on_key_at(&self, press: KeyPress, now: Instant) {
        // Global shortcut: modifier+b focuses and selects the first barcode
        // field on the page
        if press.ctrl {
            if let Key::Char('b') | Key::Char('B') = press.key {
                if let Some(name) = self.form.lock().focus_first_barcode() {
                    info!("⌨️  Shortcut: focused barcode field '{}'", name);
                }
                return;
            }
            // Other modifier chords are not field input
            return;
        }

        // The field that receives this keydown (before any focus change)
        let target = {
            let form = self.form.lock();
            match form.focused() {
                Some(field) => (field.name.clone(), field.kind),
                None => return,
            }
        };
        let (target_name, target_kind) = target;

        match &press.key {
            Key::Tab => {
                let departed = self.form.lock().advance_focus();
                if let Some(name) = departed {
                    self.blur_validate(&name);
                }
            }
            Key::Char(c) => {
                let mut form = self.form.lock();
                if let Some(field) = form.focused_mut() {
                    field.insert_char(*c);
                    // Barcode fields are normalized in place on every input
                    if field.kind == FieldKind::Barcode {
                        let normalized = format::normalize(&field.value);
                        field.value = normalized;
                    }
                }
            }
            Key::Backspace => {
                if let Some(field) = self.form.lock().focused_mut() {
                    field.backspace();
                }
            }
            Key::Enter | Key::Esc => {}
        }

        // Every key-down on a barcode field feeds its scan detector
        if target_kind == FieldKind::Barcode {
            let (window, min_keys) = {
                let cfg = self.input_cfg.read();
                (
                    std::time::Duration::from_millis(cfg.debounce_ms),
                    cfg.min_scan_keys,
                )
            };
            let mut detectors = self.detectors.lock();
            detectors
                .entry(target_name)
                .or_insert_with(|| crate::input::ScanDetector::new(window, min_keys))
                .record_key(press.key, now);
        }
    }

    /// Run the blur validator matching the field's kind
    pub(crate) fn blur_validate(&self, name: &str) {
        let mut form = self.form.lock();
        let Some(field) = form.get_mut(name) else {
            return;
        };
        let ok = match field.kind {
            FieldKind::Quantity => FormValidator::validate_quantity(field),
            FieldKind::Barcode => FormValidator::validate_barcode(field),
            FieldKind::Text => return,
        };
        if !ok {
            debug!(
                "Field '{}' failed validation: {}",
                name,
                field.feedback.as_deref().unwrap_or("")
            );
        }
    }

    /// Validate every barcode and quantity field of the active form,
    /// returning (field, passed) pairs
    pub fn validate_all(&self) -> Vec<(String, bool)> {
        let mut form = self.form.lock();
        let names: Vec<String> = form.fields().iter().map(|f| f.name.clone()).collect();

        let mut results = Vec::new();
        for name in names {
            let Some(field) = form.get_mut(&name) else {
                continue;
            };
            let ok = match field.kind {
                FieldKind::Quantity => FormValidator::validate_quantity(field),
                FieldKind::Barcode => FormValidator::validate_barcode(field),
                FieldKind::Text => continue,
            };
            results.push((name, ok));
        }
        results
    }
}
