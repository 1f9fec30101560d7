//! Transport abstraction for the wireless link
//!
//! Pairing, advertising and connection lifecycle belong to the embedding
//! application. The core needs exactly two primitives: bring the service up
//! once, and publish a bounded-size buffer to whoever is subscribed.
//! Incoming control writes are pushed into the core by the application via
//! [`crate::PinWatch::handle_control`].
//!
//! The UUID constants below describe the GATT layout expected by existing
//! observer apps; a BLE-backed implementation should reuse them.

use crate::error::Result;

/// GATT service UUID for the telemetry service
pub const SERVICE_UUID: &str = "6e400001-b5a3-f393-e0a9-e50e24dcca9e";

/// Notify characteristic UUID (telemetry out)
pub const NOTIFY_CHAR_UUID: &str = "0000DEB1-0000-1000-8000-00805F9B34FB";

/// Write characteristic UUID (control in)
pub const CONTROL_CHAR_UUID: &str = "0000DEB2-0000-1000-8000-00805F9B34FB";

/// Default advertised device name
pub const DEFAULT_DEVICE_NAME: &str = "ESP32-device";

/// Outbound side of the wireless link.
///
/// Publish failures are the transport's concern: the sampling flow logs them
/// and moves on, it never retries or surfaces them to the application.
pub trait Transport: Send + Sync {
    /// Bring the service up (register characteristics, start advertising)
    fn start(&self) -> Result<()>;

    /// Publish one telemetry packet to all subscribers
    fn publish(&self, payload: &[u8]) -> Result<()>;
}
