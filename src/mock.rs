//! Mock pin and transport implementations for testing
//!
//! These doubles let the whole sampling pipeline run on a host machine with
//! no hardware attached: [`MockPins`] serves scripted digital/analog levels
//! and [`MockTransport`] captures every published packet for inspection.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pinwatch::mock::{MockPins, MockTransport};
//! use pinwatch::{PinWatch, WatchConfig};
//!
//! let pins = Arc::new(MockPins::new().with_digital(2, true));
//! let transport = Arc::new(MockTransport::new());
//! let watch = PinWatch::new(WatchConfig::default(), pins, transport.clone());
//!
//! watch.register_pin(2, Some(pinwatch::ProbeKind::Digital), Some("IN"), None);
//! watch.send_round();
//! assert_eq!(transport.published().len(), 1);
//! ```

use crate::error::{PinWatchError, Result};
use crate::hal::PinReader;
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Scripted pin levels for tests and demos.
///
/// Unset pins read as low / zero. Levels can be changed at any time from any
/// thread, including while a sampling thread is running.
#[derive(Debug, Default)]
pub struct MockPins {
    digital: Mutex<HashMap<u16, bool>>,
    analog: Mutex<HashMap<u16, u16>>,
    temperature: Mutex<Option<f32>>,
}

impl MockPins {
    /// Create a mock with all pins low
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: preset a digital level
    pub fn with_digital(self, pin: u16, level: bool) -> Self {
        self.set_digital(pin, level);
        self
    }

    /// Builder: preset an analog value
    pub fn with_analog(self, pin: u16, value: u16) -> Self {
        self.set_analog(pin, value);
        self
    }

    /// Builder: preset the raw temperature reading
    pub fn with_temperature(self, raw: f32) -> Self {
        self.set_temperature(Some(raw));
        self
    }

    /// Set a digital level
    pub fn set_digital(&self, pin: u16, level: bool) {
        self.digital
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pin, level);
    }

    /// Set an analog value
    pub fn set_analog(&self, pin: u16, value: u16) {
        self.analog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pin, value);
    }

    /// Set or clear the raw temperature reading
    pub fn set_temperature(&self, raw: Option<f32>) {
        *self
            .temperature
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = raw;
    }
}

impl PinReader for MockPins {
    fn digital_read(&self, pin: u16) -> bool {
        self.digital
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pin)
            .copied()
            .unwrap_or(false)
    }

    fn analog_read(&self, pin: u16) -> u16 {
        self.analog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pin)
            .copied()
            .unwrap_or(0)
    }

    fn raw_temperature(&self) -> Option<f32> {
        *self
            .temperature
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Capturing transport double.
///
/// Records every published packet; can be told to fail publishes to exercise
/// the fire-and-forget path.
#[derive(Debug, Default)]
pub struct MockTransport {
    started: AtomicBool,
    fail_publish: AtomicBool,
    published: Mutex<Vec<Vec<u8>>>,
}

impl MockTransport {
    /// Create a new capturing transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `start` has been called
    pub fn was_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Make subsequent publishes fail (or succeed again)
    pub fn set_fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    /// All packets published so far, oldest first
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget captured packets
    pub fn clear(&self) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Transport for MockTransport {
    fn start(&self) -> Result<()> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn publish(&self, payload: &[u8]) -> Result<()> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(PinWatchError::transport("mock publish failure"));
        }
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.to_vec());
        Ok(())
    }
}
