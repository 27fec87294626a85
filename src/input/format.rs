//! Barcode text normalization
//!
//! Barcode fields only ever hold uppercase alphanumerics plus `-` and `_`.
//! Everything typed or scanned into one passes through [`normalize`].

/// Minimum accepted barcode length
pub const BARCODE_MIN_LEN: usize = 4;
/// Maximum accepted barcode length
pub const BARCODE_MAX_LEN: usize = 50;

/// Check whether a character is allowed in a barcode
pub fn is_barcode_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

/// Normalize raw field text: uppercase, then drop every character outside
/// `[A-Z0-9\-_]`.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .flat_map(|c| c.to_uppercase())
        .filter(|c| is_barcode_char(*c))
        .collect()
}

/// Check a barcode against the accepted format: `[A-Z0-9\-_]{4,50}`
pub fn is_valid_barcode(barcode: &str) -> bool {
    let len = barcode.chars().count();
    (BARCODE_MIN_LEN..=BARCODE_MAX_LEN).contains(&len)
        && barcode.chars().all(is_barcode_char)
}
