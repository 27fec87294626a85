//! Form and field state
//!
//! A [`Form`] is the set of named input fields a workflow page owns, with
//! focus handled by the router instead of ambient listeners. Fields carry
//! their own validity, feedback text, bound maximum, and scan-flash deadline.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// What a field holds; decides which validator runs on blur and whether the
/// scan detector watches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Barcode,
    Quantity,
    #[default]
    Text,
}

/// Validation state of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// Never validated, or edited since the last check
    #[default]
    Unchecked,
    Valid,
    Invalid,
}

/// Notification emitted when a field's value is set programmatically
/// (e.g. by a completed scan), so other listeners can react
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Changed { field: String, value: String },
}

/// A single input field
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    /// Upper bound for quantity fields, set from lookup results
    pub max: Option<i64>,
    pub placeholder: Option<String>,
    pub validity: Validity,
    /// Feedback text shown next to the field; created on first failure
    pub feedback: Option<String>,
    /// Select-all state; the next typed character replaces the content
    pub selected: bool,
    /// Known codes offered for completion
    pub suggestions: Vec<String>,
    flash_until: Option<Instant>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: String::new(),
            max: None,
            placeholder: None,
            validity: Validity::Unchecked,
            feedback: None,
            selected: false,
            suggestions: Vec::new(),
            flash_until: None,
        }
    }

    /// Type a character into the field, replacing the content when the field
    /// is in the selected state
    pub fn insert_char(&mut self, c: char) {
        if self.selected {
            self.value.clear();
            self.selected = false;
        }
        self.value.push(c);
        self.validity = Validity::Unchecked;
    }

    pub fn backspace(&mut self) {
        if self.selected {
            self.value.clear();
            self.selected = false;
        } else {
            self.value.pop();
        }
        self.validity = Validity::Unchecked;
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.selected = false;
        self.validity = Validity::Unchecked;
    }

    /// Arm the scan feedback flash until the given deadline
    pub fn flash(&mut self, until: Instant) {
        self.flash_until = Some(until);
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        matches!(self.flash_until, Some(until) if now < until)
    }

    pub fn flash_deadline(&self) -> Option<Instant> {
        self.flash_until
    }

    fn clear_expired_flash(&mut self, now: Instant) -> bool {
        if matches!(self.flash_until, Some(until) if now >= until) {
            self.flash_until = None;
            true
        } else {
            false
        }
    }
}

/// The fields of the active workflow page, in tab order
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
    focused: Option<usize>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        let focused = if fields.is_empty() { None } else { Some(0) };
        Self { fields, focused }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn focused(&self) -> Option<&Field> {
        self.focused.and_then(|i| self.fields.get(i))
    }

    pub fn focused_mut(&mut self) -> Option<&mut Field> {
        match self.focused {
            Some(i) => self.fields.get_mut(i),
            None => None,
        }
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.focused().map(|f| f.name.as_str())
    }

    /// Focus a field by name
    pub fn focus(&mut self, name: &str) -> bool {
        match self.fields.iter().position(|f| f.name == name) {
            Some(i) => {
                self.focused = Some(i);
                true
            }
            None => false,
        }
    }

    /// Focus and select the first barcode field, returning its name.
    /// Backs the global modifier+`b` shortcut.
    pub fn focus_first_barcode(&mut self) -> Option<String> {
        let i = self
            .fields
            .iter()
            .position(|f| f.kind == FieldKind::Barcode)?;
        self.focused = Some(i);
        self.fields[i].selected = true;
        Some(self.fields[i].name.clone())
    }

    /// Move focus to the next field (wrapping), returning the name of the
    /// field that lost focus so the caller can blur-validate it
    pub fn advance_focus(&mut self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let current = self.focused.unwrap_or(0);
        let departed = self.fields[current].name.clone();
        self.fields[current].selected = false;
        self.focused = Some((current + 1) % self.fields.len());
        Some(departed)
    }

    /// Drop expired flash deadlines; true if any field changed
    pub fn clear_expired_flashes(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for field in &mut self.fields {
            changed |= field.clear_expired_flash(now);
        }
        changed
    }

    /// Earliest pending flash deadline across all fields
    pub fn next_flash_deadline(&self) -> Option<Instant> {
        self.fields.iter().filter_map(|f| f.flash_until).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn make_form() -> Form {
        Form::new(vec![
            Field::new("barcode", FieldKind::Barcode),
            Field::new("quantity_pulled", FieldKind::Quantity),
            Field::new("qc_personnel", FieldKind::Text),
        ])
    }

    #[test]
    fn test_first_field_focused_by_default() {
        let form = make_form();
        assert_eq!(form.focused_name(), Some("barcode"));
    }

    #[test]
    fn test_advance_focus_wraps_and_reports_departed() {
        let mut form = make_form();
        assert_eq!(form.advance_focus().as_deref(), Some("barcode"));
        assert_eq!(form.focused_name(), Some("quantity_pulled"));
        assert_eq!(form.advance_focus().as_deref(), Some("quantity_pulled"));
        assert_eq!(form.advance_focus().as_deref(), Some("qc_personnel"));
        assert_eq!(form.focused_name(), Some("barcode"));
    }

    #[test]
    fn test_focus_first_barcode_selects() {
        let mut form = make_form();
        form.focus("qc_personnel");
        assert_eq!(form.focus_first_barcode().as_deref(), Some("barcode"));
        assert!(form.focused().unwrap().selected);
    }

    #[test]
    fn test_typing_into_selected_field_replaces_content() {
        let mut field = Field::new("barcode", FieldKind::Barcode);
        field.set_value("OLD-CODE");
        field.selected = true;

        field.insert_char('N');
        assert_eq!(field.value, "N");
        assert!(!field.selected);
    }

    #[test]
    fn test_flash_window() {
        let mut form = make_form();
        let now = Instant::now();
        let until = now + Duration::from_secs(1);

        form.get_mut("barcode").unwrap().flash(until);
        assert!(form.get("barcode").unwrap().is_flashing(now));
        assert_eq!(form.next_flash_deadline(), Some(until));

        assert!(form.clear_expired_flashes(until));
        assert!(!form.get("barcode").unwrap().is_flashing(until));
        assert_eq!(form.next_flash_deadline(), None);
    }
}
