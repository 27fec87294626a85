//! Box info display panel
//!
//! Holds the result of the most recent barcode lookup for the hosting
//! surface to render. Hidden until a lookup completes; a later reply always
//! replaces the current content.

use colored::*;

/// Details of a found box, as returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxDetails {
    pub box_id: String,
    pub hardware_type: String,
    pub lot_number: String,
    pub remaining_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelContent {
    #[default]
    Empty,
    Found(BoxDetails),
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct BoxInfoPanel {
    visible: bool,
    content: PanelContent,
}

impl BoxInfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    pub fn show_found(&mut self, details: BoxDetails) {
        self.content = PanelContent::Found(details);
        self.visible = true;
    }

    pub fn show_not_found(&mut self) {
        self.content = PanelContent::NotFound;
        self.visible = true;
    }

    /// Hide and clear, e.g. on page change
    pub fn reset(&mut self) {
        self.visible = false;
        self.content = PanelContent::Empty;
    }

    /// Render the panel as display lines for the CLI surface
    pub fn lines(&self) -> Vec<String> {
        if !self.visible {
            return Vec::new();
        }
        match &self.content {
            PanelContent::Empty => Vec::new(),
            PanelContent::Found(d) => vec![
                format!("{} {}", "Box ID:".bold(), d.box_id),
                format!("{} {}", "Hardware Type:".bold(), d.hardware_type),
                format!("{} {}", "Lot Number:".bold(), d.lot_number),
                format!(
                    "{} {}",
                    "Available Quantity:".bold(),
                    d.remaining_quantity.to_string().green()
                ),
            ],
            PanelContent::NotFound => {
                vec![format!("{}", "Barcode not found in inventory".red())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> BoxDetails {
        BoxDetails {
            box_id: "WIDGET_LOT7_3".to_string(),
            hardware_type: "Widget".to_string(),
            lot_number: "LOT7".to_string(),
            remaining_quantity: 7,
        }
    }

    #[test]
    fn test_panel_hidden_until_lookup() {
        let panel = BoxInfoPanel::new();
        assert!(!panel.is_visible());
        assert!(panel.lines().is_empty());
    }

    #[test]
    fn test_found_renders_details() {
        let mut panel = BoxInfoPanel::new();
        panel.show_found(details());
        assert!(panel.is_visible());
        let lines = panel.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("WIDGET_LOT7_3"));
        assert!(lines[3].contains('7'));
    }

    #[test]
    fn test_not_found_message() {
        let mut panel = BoxInfoPanel::new();
        panel.show_not_found();
        let lines = panel.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Barcode not found in inventory"));
    }

    #[test]
    fn test_late_reply_overwrites() {
        let mut panel = BoxInfoPanel::new();
        panel.show_found(details());
        panel.show_not_found();
        assert_eq!(panel.content(), &PanelContent::NotFound);
    }
}
