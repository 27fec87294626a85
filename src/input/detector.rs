//! Scan burst detector
//!
//! Distinguishes hardware scanner input from human typing. A scanner emits a
//! full code plus Enter within milliseconds; a human rarely produces a 6+ key
//! burst that ends in Enter inside the 100ms quiet window.
//!
//! The detector is an explicit state machine: `Idle` until the first
//! keystroke, then `Buffering` with a deadline that every further keystroke
//! pushes out by one debounce window. When the deadline expires the buffered
//! burst is classified exactly once and the detector returns to `Idle`.
//! Invariant: at most one pending deadline per detector.

use std::time::{Duration, Instant};

use crate::input::{format, Key};

/// Default quiet period after the last keystroke that ends a burst
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Default minimum buffered keys for a burst to qualify as a scan
/// (the burst must be strictly longer than this)
pub const DEFAULT_MIN_SCAN_KEYS: usize = 5;

/// Outcome of classifying a finished burst
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Burst came from a scanner; carries the normalized captured code
    Scan(String),
    /// Ordinary typing, buffer dropped
    Discarded,
}

enum DetectorState {
    Idle,
    Buffering { keys: Vec<Key>, deadline: Instant },
}

/// Per-field scan detector
pub struct ScanDetector {
    window: Duration,
    min_keys: usize,
    state: DetectorState,
}

impl ScanDetector {
    pub fn new(window: Duration, min_keys: usize) -> Self {
        Self {
            window,
            min_keys,
            state: DetectorState::Idle,
        }
    }

    /// Record a key-down on the watched field.
    ///
    /// First keystroke moves Idle → Buffering; every keystroke (including the
    /// first) resets the deadline to `now + window`.
    pub fn record_key(&mut self, key: Key, now: Instant) {
        let deadline = now + self.window;
        match &mut self.state {
            DetectorState::Idle => {
                self.state = DetectorState::Buffering {
                    keys: vec![key],
                    deadline,
                };
            }
            DetectorState::Buffering { keys, deadline: d } => {
                keys.push(key);
                *d = deadline;
            }
        }
    }

    /// The pending deadline, if a burst is in flight
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DetectorState::Idle => None,
            DetectorState::Buffering { deadline, .. } => Some(*deadline),
        }
    }

    pub fn is_buffering(&self) -> bool {
        matches!(self.state, DetectorState::Buffering { .. })
    }

    /// Classify the burst if its deadline has passed.
    ///
    /// Returns `None` while Idle or while the deadline is still in the
    /// future. A burst qualifies as a scan when it holds more than
    /// `min_keys` keys and the key that armed the firing deadline (the last
    /// one buffered) is Enter; the captured code is the printable keys minus
    /// that trailing Enter, normalized.
    pub fn expire(&mut self, now: Instant) -> Option<Classification> {
        let due = matches!(
            &self.state,
            DetectorState::Buffering { deadline, .. } if now >= *deadline
        );
        if !due {
            return None;
        }

        let keys = match std::mem::replace(&mut self.state, DetectorState::Idle) {
            DetectorState::Buffering { keys, .. } => keys,
            DetectorState::Idle => Vec::new(),
        };

        if keys.len() > self.min_keys && keys.last() == Some(&Key::Enter) {
            let code: String = keys[..keys.len() - 1]
                .iter()
                .filter_map(Key::as_char)
                .collect();
            Some(Classification::Scan(format::normalize(&code)))
        } else {
            Some(Classification::Discarded)
        }
    }
}

impl Default for ScanDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, DEFAULT_MIN_SCAN_KEYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut ScanDetector, text: &str, start: Instant, gap: Duration) -> Instant {
        let mut t = start;
        for c in text.chars() {
            detector.record_key(Key::Char(c), t);
            t += gap;
        }
        t
    }

    #[test]
    fn test_rapid_burst_with_enter_is_scan() {
        let mut detector = ScanDetector::default();
        let t0 = Instant::now();

        let t = feed(&mut detector, "ABC123", t0, Duration::from_millis(5));
        detector.record_key(Key::Enter, t);

        // Still quiet before the deadline
        assert_eq!(detector.expire(t + Duration::from_millis(50)), None);

        let result = detector.expire(t + DEFAULT_DEBOUNCE);
        assert_eq!(result, Some(Classification::Scan("ABC123".to_string())));
        assert!(!detector.is_buffering());
    }

    #[test]
    fn test_short_burst_with_enter_is_not_scan() {
        let mut detector = ScanDetector::default();
        let t0 = Instant::now();

        let t = feed(&mut detector, "ABC", t0, Duration::from_millis(5));
        detector.record_key(Key::Enter, t);

        let result = detector.expire(t + DEFAULT_DEBOUNCE);
        assert_eq!(result, Some(Classification::Discarded));
    }

    #[test]
    fn test_long_burst_without_enter_is_discarded() {
        let mut detector = ScanDetector::default();
        let t0 = Instant::now();

        let t = feed(&mut detector, "ABCDEFGH", t0, Duration::from_millis(5));

        let result = detector.expire(t + DEFAULT_DEBOUNCE);
        assert_eq!(result, Some(Classification::Discarded));
    }

    #[test]
    fn test_each_keystroke_resets_deadline() {
        let mut detector = ScanDetector::default();
        let t0 = Instant::now();

        detector.record_key(Key::Char('A'), t0);
        let first_deadline = detector.deadline().unwrap();

        detector.record_key(Key::Char('B'), t0 + Duration::from_millis(60));
        let second_deadline = detector.deadline().unwrap();

        assert!(second_deadline > first_deadline);
        // The original deadline passing must not classify anything
        assert_eq!(detector.expire(first_deadline), None);
        assert!(detector.is_buffering());
    }

    #[test]
    fn test_captured_code_is_normalized() {
        let mut detector = ScanDetector::default();
        let t0 = Instant::now();

        let t = feed(&mut detector, "abc 12!", t0, Duration::from_millis(5));
        detector.record_key(Key::Enter, t);

        let result = detector.expire(t + DEFAULT_DEBOUNCE);
        assert_eq!(result, Some(Classification::Scan("ABC12".to_string())));
    }

    #[test]
    fn test_non_printable_keys_count_toward_length_not_code() {
        let mut detector = ScanDetector::default();
        let t0 = Instant::now();

        detector.record_key(Key::Backspace, t0);
        let t = feed(
            &mut detector,
            "AB12",
            t0 + Duration::from_millis(5),
            Duration::from_millis(5),
        );
        detector.record_key(Key::Enter, t);

        // 6 keys total, Enter-terminated: scan, but only printables captured
        let result = detector.expire(t + DEFAULT_DEBOUNCE);
        assert_eq!(result, Some(Classification::Scan("AB12".to_string())));
    }

    #[test]
    fn test_idle_expire_is_noop() {
        let mut detector = ScanDetector::default();
        assert_eq!(detector.expire(Instant::now()), None);
    }
}
