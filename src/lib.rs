//! # pinwatch: chunked live pin telemetry
//!
//! Streams the current values of registered signals (GPIO pins and
//! software-computed "virtual" probes) from an ESP32-class target to a
//! remote observer over a wireless link, at a remotely negotiated sampling
//! rate. One sampling round serializes the whole probe registry into one
//! or more size-bounded JSON packets with sequence numbers and a
//! completion flag, so observers can reassemble a full snapshot from
//! notification-sized pieces.
//!
//! ## Architecture
//!
//! - **Registry**: ordered, identifier-keyed probe descriptors with
//!   insert-or-update registration
//! - **Encoder**: per-kind value resolution plus the greedy packet chunker
//! - **Rate controller**: parses control-channel rate requests and keeps
//!   the shared interval inside its bounds
//! - **Sampling driver**: a background thread (autonomous mode) or a
//!   caller-invoked step function (polled mode)
//! - **Traits**: [`PinReader`] and [`Transport`] are the only two things
//!   the embedding application must implement; mock implementations ship
//!   in [`mock`] for host-side testing
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pinwatch::mock::{MockPins, MockTransport};
//! use pinwatch::{PinWatch, ProbeKind, SharedValue, WatchConfig};
//!
//! let transport = Arc::new(MockTransport::new());
//! let watch = PinWatch::new(
//!     WatchConfig::default(),
//!     Arc::new(MockPins::new()),
//!     transport.clone(),
//! );
//!
//! // A hardware pin and a virtual probe bound to an application variable
//! watch.register_pin(2, Some(ProbeKind::Digital), Some("IN"), None);
//! let speed = Arc::new(SharedValue::new(0.0));
//! watch.probe_value(110, Arc::clone(&speed), "speed");
//!
//! // The observer turns the sampling rate up via the control channel
//! watch.handle_control(b"{\"rate\":100}");
//!
//! speed.set(12.5);
//! watch.send_round();
//! assert_eq!(watch.interval_ms(), 100);
//! assert!(!transport.published().is_empty());
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod hal;
pub mod mock;
pub mod rate;
pub mod registry;
pub mod sampler;
pub mod target;
pub mod transport;
pub mod types;
pub mod watch;
pub mod wire;

// Re-export commonly used types
pub use config::{SamplingMode, WatchConfig};
pub use error::{PinWatchError, Result};
pub use hal::PinReader;
pub use rate::RateController;
pub use registry::ProbeRegistry;
pub use sampler::SamplerHandle;
pub use target::Target;
pub use transport::Transport;
pub use types::{Probe, ProbeKind, SharedValue, ValueFn, ValueSource};
pub use watch::PinWatch;
pub use wire::{ProbeEntry, TelemetryPacket, PROTOCOL_VERSION};
