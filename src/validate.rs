//! Form validation
//!
//! Stateless checks run on field blur. Each returns whether the field passed
//! and updates the field's validity plus its adjacent feedback text (created
//! on the first failure, matching the lazily inserted feedback element of the
//! original tracker UI).

use crate::fields::{Field, Validity};
use crate::input::format;

pub struct FormValidator;

impl FormValidator {
    /// Quantity must be a positive integer, at or below the field's bound
    /// maximum when one is set.
    pub fn validate_quantity(field: &mut Field) -> bool {
        let value = match field.value.trim().parse::<i64>() {
            Ok(v) if v > 0 => v,
            _ => {
                return Self::fail(field, "Quantity must be a positive number");
            }
        };

        if let Some(max) = field.max {
            if value > max {
                return Self::fail(field, format!("Quantity cannot exceed {}", max));
            }
        }

        Self::pass(field)
    }

    /// Barcode must be non-empty after trimming and match `[A-Z0-9\-_]{4,50}`.
    pub fn validate_barcode(field: &mut Field) -> bool {
        let value = field.value.trim();

        if value.is_empty() {
            return Self::fail(field, "Barcode is required");
        }

        if !format::is_valid_barcode(value) {
            return Self::fail(field, "Invalid barcode format");
        }

        Self::pass(field)
    }

    fn fail(field: &mut Field, message: impl Into<String>) -> bool {
        field.validity = Validity::Invalid;
        field.feedback = Some(message.into());
        false
    }

    fn pass(field: &mut Field) -> bool {
        field.validity = Validity::Valid;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldKind;

    fn quantity_field(value: &str, max: Option<i64>) -> Field {
        let mut field = Field::new("quantity_pulled", FieldKind::Quantity);
        field.set_value(value);
        field.max = max;
        field
    }

    fn barcode_field(value: &str) -> Field {
        let mut field = Field::new("barcode", FieldKind::Barcode);
        field.set_value(value);
        field
    }

    #[test]
    fn test_quantity_rejects_zero_and_negative() {
        for bad in ["0", "-3"] {
            let mut field = quantity_field(bad, None);
            assert!(!FormValidator::validate_quantity(&mut field));
            assert_eq!(field.validity, Validity::Invalid);
            assert_eq!(
                field.feedback.as_deref(),
                Some("Quantity must be a positive number")
            );
        }
    }

    #[test]
    fn test_quantity_rejects_non_numeric() {
        let mut field = quantity_field("seven", None);
        assert!(!FormValidator::validate_quantity(&mut field));
        assert_eq!(
            field.feedback.as_deref(),
            Some("Quantity must be a positive number")
        );
    }

    #[test]
    fn test_quantity_rejects_above_max() {
        let mut field = quantity_field("8", Some(7));
        assert!(!FormValidator::validate_quantity(&mut field));
        assert_eq!(field.feedback.as_deref(), Some("Quantity cannot exceed 7"));
    }

    #[test]
    fn test_quantity_accepts_positive_within_max() {
        let mut field = quantity_field("7", Some(7));
        assert!(FormValidator::validate_quantity(&mut field));
        assert_eq!(field.validity, Validity::Valid);

        let mut unbounded = quantity_field("12", None);
        assert!(FormValidator::validate_quantity(&mut unbounded));
    }

    #[test]
    fn test_barcode_rejects_empty() {
        let mut field = barcode_field("   ");
        assert!(!FormValidator::validate_barcode(&mut field));
        assert_eq!(field.feedback.as_deref(), Some("Barcode is required"));
    }

    #[test]
    fn test_barcode_rejects_bad_format() {
        for bad in ["abc-123", "ABC 123", "AB", "ABC.123"] {
            let mut field = barcode_field(bad);
            assert!(!FormValidator::validate_barcode(&mut field), "{}", bad);
            assert_eq!(field.feedback.as_deref(), Some("Invalid barcode format"));
        }
    }

    #[test]
    fn test_barcode_accepts_valid_code() {
        let mut field = barcode_field("ABC-123_1");
        assert!(FormValidator::validate_barcode(&mut field));
        assert_eq!(field.validity, Validity::Valid);
    }

    #[test]
    fn test_revalidation_recovers_after_fix() {
        let mut field = barcode_field("bad code");
        assert!(!FormValidator::validate_barcode(&mut field));

        field.set_value("GOOD-CODE");
        assert!(FormValidator::validate_barcode(&mut field));
        assert_eq!(field.validity, Validity::Valid);
    }
}
