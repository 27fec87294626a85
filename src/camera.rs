//! Camera-based scanning stub
//!
//! Placeholder for a future camera capture integration. Every start attempt
//! fails with a structured error that callers surface as a blocking prompt;
//! manual or keyboard-wedge entry remains the only working path.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera access not supported on this device")]
    NotSupported,
    #[error("Camera barcode scanning is not yet available. Please enter barcodes manually.")]
    NotAvailable,
}

pub struct CameraScanner {
    device_present: bool,
}

impl CameraScanner {
    /// Probe for a capture device. No backend is wired up, so none is found.
    pub fn new() -> Self {
        Self {
            device_present: false,
        }
    }

    #[cfg(test)]
    fn with_device() -> Self {
        Self {
            device_present: true,
        }
    }

    /// Start camera scanning. Always fails until a capture backend exists.
    pub fn start(&self) -> Result<(), CameraError> {
        if !self.device_present {
            return Err(CameraError::NotSupported);
        }
        Err(CameraError::NotAvailable)
    }
}

impl Default for CameraScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_without_device_reports_unsupported() {
        assert_eq!(CameraScanner::new().start(), Err(CameraError::NotSupported));
    }

    #[test]
    fn test_start_with_device_reports_unavailable() {
        assert_eq!(
            CameraScanner::with_device().start(),
            Err(CameraError::NotAvailable)
        );
    }
}
