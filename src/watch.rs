//! Sampling context
//!
//! [`PinWatch`] owns everything the sampling flow shares: the probe
//! registry, the rate controller and the handles onto the pin reader and
//! the transport. It is a cheap clone over an inner `Arc`, so the
//! application, the control channel and the sampling thread can each hold
//! their own handle onto the same state.
//!
//! Registration calls take the registry's write lock, the per-round
//! traversal takes the read lock, and the interval is a single atomic, so
//! none of the three flows can observe the others mid-mutation.

use crate::config::{SamplingMode, WatchConfig};
use crate::encoder::{encode_round, RoundHeader};
use crate::error::Result;
use crate::hal::PinReader;
use crate::rate::RateController;
use crate::registry::ProbeRegistry;
use crate::sampler::{self, SamplerHandle};
use crate::transport::Transport;
use crate::types::{ProbeKind, SharedValue, ValueFn};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

struct Inner {
    config: WatchConfig,
    registry: RwLock<ProbeRegistry>,
    rate: RateController,
    pins: Arc<dyn PinReader>,
    transport: Arc<dyn Transport>,
    started_at: Instant,
    /// Completion time of the previous polled round, `None` before the first
    last_poll: Mutex<Option<Instant>>,
}

/// Handle onto one sampling context.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pinwatch::mock::{MockPins, MockTransport};
/// use pinwatch::{PinWatch, ProbeKind, SharedValue, WatchConfig};
///
/// let transport = Arc::new(MockTransport::new());
/// let watch = PinWatch::new(
///     WatchConfig::default(),
///     Arc::new(MockPins::new()),
///     transport.clone(),
/// );
///
/// watch.register_pin(2, Some(ProbeKind::Digital), Some("OUT"), None);
///
/// let rpm = Arc::new(SharedValue::new(0.0));
/// watch.probe_value(110, Arc::clone(&rpm), "rpm");
///
/// rpm.set(1450.0);
/// watch.send_round();
/// assert!(!transport.published().is_empty());
/// ```
#[derive(Clone)]
pub struct PinWatch {
    inner: Arc<Inner>,
}

impl PinWatch {
    /// Create a sampling context over the given pin reader and transport.
    ///
    /// The registry starts empty; nothing is sampled until [`begin`] is
    /// called (autonomous mode) or the application starts calling
    /// [`poll`] (polled mode).
    ///
    /// [`begin`]: PinWatch::begin
    /// [`poll`]: PinWatch::poll
    pub fn new(config: WatchConfig, pins: Arc<dyn PinReader>, transport: Arc<dyn Transport>) -> Self {
        let rate = RateController::new(config.rate_min_ms, config.rate_max_ms, config.interval_ms);
        Self {
            inner: Arc::new(Inner {
                config,
                registry: RwLock::new(ProbeRegistry::new()),
                rate,
                pins,
                transport,
                started_at: Instant::now(),
                last_poll: Mutex::new(None),
            }),
        }
    }

    /// The configuration this context was built with
    pub fn config(&self) -> &WatchConfig {
        &self.inner.config
    }

    /// The effective sampling interval in milliseconds
    pub fn interval_ms(&self) -> u32 {
        self.inner.rate.interval_ms()
    }

    /// Number of registered probes
    pub fn probe_count(&self) -> usize {
        self.read_registry().len()
    }

    fn read_registry(&self) -> std::sync::RwLockReadGuard<'_, ProbeRegistry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, ProbeRegistry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a hardware probe, or amend an existing entry in place.
    ///
    /// See [`ProbeRegistry::upsert`] for the partial-update rules. Safe to
    /// call at any time, including while the sampling thread is running.
    pub fn register_pin(
        &self,
        id: u16,
        kind: Option<ProbeKind>,
        direction: Option<&str>,
        getter: Option<ValueFn>,
    ) {
        self.write_registry().upsert(id, kind, direction, getter);
    }

    /// Attach a virtual probe to a shared value cell.
    ///
    /// Identifiers below 100 are coerced up to 100; the effective
    /// identifier is returned. The cell stays owned by the application,
    /// which updates it with [`SharedValue::set`] whenever the observed
    /// variable changes.
    pub fn probe_value(&self, id: u16, value: Arc<SharedValue>, name: &str) -> u16 {
        self.write_registry().attach_shared(id, value, name)
    }

    /// Seed the cached-scalar source of an existing probe.
    ///
    /// Returns `false` when no probe with `id` is registered.
    pub fn set_cached(&self, id: u16, value: f32) -> bool {
        self.write_registry().set_cached(id, value)
    }

    /// Pre-register every safe pin of the configured target as a
    /// placeholder. Additive and idempotent; never called implicitly.
    pub fn register_safe_pins(&self) {
        let pins = self.inner.config.target.safe_pins();
        self.write_registry().add_placeholders(pins);
        tracing::info!("registered {} safe pins as placeholders", pins.len());
    }

    /// Apply a raw rate request from the control channel.
    ///
    /// The application calls this from its transport's write callback.
    /// Malformed input is ignored; see [`RateController::handle_request`].
    pub fn handle_control(&self, raw: &[u8]) {
        self.inner.rate.handle_request(raw);
    }

    /// Encode and publish one full sampling round.
    ///
    /// Every failure path degrades: serialization errors abort the round
    /// with a log line, publish failures are logged per packet and the
    /// remaining packets are still attempted.
    pub fn send_round(&self) {
        let header = RoundHeader {
            timestamp: self.inner.started_at.elapsed().as_millis() as u64,
            rate: self.inner.rate.interval_ms(),
            temp: self.temperature_celsius(),
        };

        let registry = self.read_registry();
        let packets = match encode_round(
            &registry,
            &header,
            self.inner.config.target,
            self.inner.pins.as_ref(),
            self.inner.config.chunk_limit,
        ) {
            Ok(packets) => packets,
            Err(err) => {
                tracing::warn!("sampling round dropped: {}", err);
                return;
            }
        };
        drop(registry);

        tracing::trace!("publishing round of {} packet(s)", packets.len());
        for packet in &packets {
            if let Err(err) = self.inner.transport.publish(packet) {
                tracing::debug!("publish failed, packet dropped: {}", err);
            }
        }
    }

    /// The chip temperature in Celsius, if the target reports one.
    ///
    /// The sensor delivers raw Fahrenheit units.
    fn temperature_celsius(&self) -> Option<f64> {
        if !self.inner.config.report_temperature {
            return None;
        }
        self.inner
            .pins
            .raw_temperature()
            .map(|raw| (f64::from(raw) - 32.0) / 1.8)
    }

    /// Polled-mode step function.
    ///
    /// Sends a round when at least one interval has elapsed since the
    /// previous one (the very first call sends immediately) and returns
    /// whether a round went out. Expected from a single execution context;
    /// a no-op when the context is configured for autonomous mode.
    pub fn poll(&self) -> bool {
        if self.inner.config.mode != SamplingMode::Polled {
            return false;
        }

        let mut last = self
            .inner
            .last_poll
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let due = match *last {
            None => true,
            Some(at) => at.elapsed().as_millis() as u64 >= u64::from(self.interval_ms()),
        };
        if !due {
            return false;
        }
        *last = Some(Instant::now());
        drop(last);

        self.send_round();
        true
    }

    /// Start the context: clamp and apply the optional initial interval,
    /// bring the transport up, and in autonomous mode spawn the sampling
    /// thread.
    ///
    /// Returns the thread's handle in autonomous mode, `None` in polled
    /// mode. Safe-pin pre-population is not performed here; call
    /// [`register_safe_pins`](PinWatch::register_safe_pins) separately to
    /// opt in.
    pub fn begin(&self, initial_interval_ms: Option<u32>) -> Result<Option<SamplerHandle>> {
        if let Some(ms) = initial_interval_ms {
            self.inner.rate.set_clamped(ms);
        }

        self.inner.transport.start()?;
        tracing::info!(
            "pinwatch started as {:?}, {:?} mode, {} ms interval",
            self.inner.config.device_name,
            self.inner.config.mode,
            self.interval_ms()
        );

        match self.inner.config.mode {
            SamplingMode::Autonomous => Ok(Some(sampler::spawn(self.clone())?)),
            SamplingMode::Polled => Ok(None),
        }
    }
}
