//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use pinwatch::mock::{MockPins, MockTransport};
use pinwatch::{PinWatch, TelemetryPacket, WatchConfig};
use std::sync::Arc;

/// A sampling context wired to mocks, with handles onto both
pub struct TestRig {
    pub watch: PinWatch,
    pub pins: Arc<MockPins>,
    pub transport: Arc<MockTransport>,
}

impl TestRig {
    /// Build a rig with the default configuration
    pub fn new() -> Self {
        Self::with_config(WatchConfig::default())
    }

    /// Build a rig with a custom configuration
    pub fn with_config(config: WatchConfig) -> Self {
        let pins = Arc::new(MockPins::new());
        let transport = Arc::new(MockTransport::new());
        let watch = PinWatch::new(
            config,
            Arc::clone(&pins) as Arc<dyn pinwatch::PinReader>,
            Arc::clone(&transport) as Arc<dyn pinwatch::Transport>,
        );
        Self {
            watch,
            pins,
            transport,
        }
    }

    /// Decode every packet published so far, oldest first
    pub fn published_packets(&self) -> Vec<TelemetryPacket> {
        self.transport
            .published()
            .iter()
            .map(|bytes| serde_json::from_slice(bytes).expect("published packet is valid JSON"))
            .collect()
    }
}

impl Default for TestRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
