//! Sampling rate negotiation
//!
//! The observer adjusts the sampling interval by writing to the control
//! channel. Requests arrive either as a plain decimal (`b"250"`) or as a
//! tiny JSON object (`{"rate":250}`, with `{"dbg_int":250}` kept as a legacy
//! alias for older observer apps). Whatever arrives is clamped into the
//! configured bounds; malformed input is ignored without error, since nobody
//! is attending the device to see one.
//!
//! The effective interval lives in a single atomic shared with the sampling
//! driver, so a concurrent reader always observes either the old or the new
//! value.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Current JSON key for the requested interval
pub const RATE_KEY: &str = "rate";

/// Legacy JSON key accepted for backwards compatibility
pub const RATE_KEY_LEGACY: &str = "dbg_int";

/// Owns the shared sampling interval and applies rate requests.
///
/// Cloning is cheap and yields a handle onto the same interval.
#[derive(Debug, Clone)]
pub struct RateController {
    interval_ms: Arc<AtomicU32>,
    min_ms: u32,
    max_ms: u32,
}

impl RateController {
    /// Create a controller with the given bounds and initial interval.
    ///
    /// The initial interval is clamped into the bounds like any other write.
    pub fn new(min_ms: u32, max_ms: u32, initial_ms: u32) -> Self {
        let controller = Self {
            interval_ms: Arc::new(AtomicU32::new(min_ms)),
            min_ms,
            max_ms,
        };
        controller.set_clamped(initial_ms);
        controller
    }

    /// The effective sampling interval in milliseconds
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms.load(Ordering::Acquire)
    }

    /// Lower bound of the accepted interval range
    pub fn min_ms(&self) -> u32 {
        self.min_ms
    }

    /// Upper bound of the accepted interval range
    pub fn max_ms(&self) -> u32 {
        self.max_ms
    }

    /// Clamp `ms` into the accepted range and make it effective.
    ///
    /// Returns the clamped value.
    pub fn set_clamped(&self, ms: u32) -> u32 {
        let clamped = ms.clamp(self.min_ms, self.max_ms);
        self.interval_ms.store(clamped, Ordering::Release);
        tracing::info!("sampling interval set to {} ms", clamped);
        clamped
    }

    /// Apply a raw rate request from the control channel.
    ///
    /// Plain-decimal requests of zero are treated as "no change" so stray
    /// null writes cannot drag the device to its minimum interval. A JSON
    /// zero, in contrast, is clamped like any other value; both behaviors
    /// are kept from the original wire contract.
    pub fn handle_request(&self, raw: &[u8]) {
        if raw.is_empty() {
            return;
        }

        // Fast path: plain decimal, possibly padded with whitespace
        if let Ok(text) = std::str::from_utf8(raw) {
            if text
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_whitespace())
            {
                let digits: &str = {
                    let trimmed = text.trim_start();
                    let end = trimmed
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(trimmed.len());
                    &trimmed[..end]
                };
                let ms = if digits.is_empty() {
                    0
                } else {
                    digits.parse::<u64>().unwrap_or(u64::from(u32::MAX))
                };
                if ms != 0 {
                    self.set_clamped(ms.min(u64::from(u32::MAX)) as u32);
                }
                return;
            }
        }

        // Fallback: tiny JSON body
        match serde_json::from_slice::<serde_json::Value>(raw) {
            Ok(doc) => {
                let mut handled = false;
                if let Some(v) = doc.get(RATE_KEY) {
                    self.set_clamped(v.as_u64().unwrap_or(0).min(u64::from(u32::MAX)) as u32);
                    handled = true;
                }
                if let Some(v) = doc.get(RATE_KEY_LEGACY) {
                    self.set_clamped(v.as_u64().unwrap_or(0).min(u64::from(u32::MAX)) as u32);
                    handled = true;
                }
                if !handled {
                    tracing::debug!("control request without a rate key ignored");
                }
            }
            Err(err) => {
                tracing::debug!("unparseable control request ignored: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> RateController {
        RateController::new(50, 60_000, 500)
    }

    #[test]
    fn test_initial_interval_clamped() {
        let rate = RateController::new(50, 60_000, 10);
        assert_eq!(rate.interval_ms(), 50);
        let rate = RateController::new(50, 60_000, 90_000);
        assert_eq!(rate.interval_ms(), 60_000);
    }

    #[test]
    fn test_plain_decimal_applied() {
        let rate = controller();
        rate.handle_request(b"1000");
        assert_eq!(rate.interval_ms(), 1000);
    }

    #[test]
    fn test_plain_decimal_with_whitespace() {
        let rate = controller();
        rate.handle_request(b"  250 \n");
        assert_eq!(rate.interval_ms(), 250);
    }

    #[test]
    fn test_plain_zero_is_no_change() {
        let rate = controller();
        rate.handle_request(b"0");
        assert_eq!(rate.interval_ms(), 500);
        rate.handle_request(b"   ");
        assert_eq!(rate.interval_ms(), 500);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let rate = controller();
        rate.handle_request(b"5");
        assert_eq!(rate.interval_ms(), 50);
        rate.handle_request(b"999999999");
        assert_eq!(rate.interval_ms(), 60_000);
    }

    #[test]
    fn test_json_rate_key() {
        let rate = controller();
        rate.handle_request(b"{\"rate\":200}");
        assert_eq!(rate.interval_ms(), 200);
    }

    #[test]
    fn test_json_legacy_key() {
        let rate = controller();
        rate.handle_request(b"{\"dbg_int\":300}");
        assert_eq!(rate.interval_ms(), 300);
    }

    #[test]
    fn test_json_legacy_key_wins_when_both_present() {
        let rate = controller();
        rate.handle_request(b"{\"rate\":200,\"dbg_int\":300}");
        assert_eq!(rate.interval_ms(), 300);
    }

    #[test]
    fn test_json_below_minimum_clamps_up() {
        let rate = controller();
        rate.handle_request(b"{\"rate\":25}");
        assert_eq!(rate.interval_ms(), 50);
    }

    #[test]
    fn test_json_zero_clamps_to_minimum() {
        // Unlike the plain-decimal path, a JSON zero goes through the clamp
        let rate = controller();
        rate.handle_request(b"{\"rate\":0}");
        assert_eq!(rate.interval_ms(), 50);
    }

    #[test]
    fn test_malformed_input_ignored() {
        let rate = controller();
        rate.handle_request(b"");
        rate.handle_request(b"fast please");
        rate.handle_request(b"{\"rate\":");
        rate.handle_request(b"{\"speed\":100}");
        rate.handle_request(&[0xff, 0xfe, 0x00]);
        assert_eq!(rate.interval_ms(), 500);
    }

    #[test]
    fn test_clone_shares_interval() {
        let rate = controller();
        let other = rate.clone();
        other.handle_request(b"750");
        assert_eq!(rate.interval_ms(), 750);
    }
}
