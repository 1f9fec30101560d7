//! Core data types for the probe registry
//!
//! This module contains the fundamental data structures used to describe a
//! monitored signal and where its current value comes from.
//!
//! # Main Types
//!
//! - [`ProbeKind`] - Category of a probe (digital, analog, virtual, placeholder)
//! - [`ValueSource`] - Tagged variant describing where a probe's value comes from
//! - [`SharedValue`] - Thread-safe f32 cell backing virtual probes
//! - [`Probe`] - One registered signal (hardware pin or virtual index)
//!
//! # Probe identifiers
//!
//! Identifiers below [`VIRTUAL_ID_FLOOR`] denote hardware pin numbers;
//! identifiers at or above it are reserved for virtual probes. Attachment of
//! a virtual probe coerces smaller identifiers up to the floor so a virtual
//! probe can never shadow a physical pin.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// First identifier reserved for virtual probes
pub const VIRTUAL_ID_FLOOR: u16 = 100;

/// Category of a registered probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeKind {
    /// Digital hardware pin, exported as a 0/1 level
    Digital,
    /// Analog hardware pin, exported as a 12-bit ADC code
    Analog,
    /// Software-computed value attached to a [`SharedValue`] or getter
    Virtual,
    /// Placeholder entry awaiting explicit registration
    #[default]
    Unconfigured,
}

impl ProbeKind {
    /// Wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Digital => "DIGITAL",
            ProbeKind::Analog => "ANALOG",
            ProbeKind::Virtual => "VIRTUAL",
            ProbeKind::Unconfigured => "-",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A thread-safe f32 cell shared between the application and the registry.
///
/// Virtual probes hold an `Arc<SharedValue>` instead of a raw reference to a
/// caller-owned float, so the referent cannot be destroyed while the sampling
/// flow still reads it. Writes and reads go through an atomic bit store; no
/// locking is involved.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pinwatch::SharedValue;
///
/// let rpm = Arc::new(SharedValue::new(0.0));
/// rpm.set(1450.0);
/// assert_eq!(rpm.get(), 1450.0);
/// ```
#[derive(Debug, Default)]
pub struct SharedValue {
    bits: AtomicU32,
}

impl SharedValue {
    /// Create a new cell holding `value`
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Store a new value
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    /// Load the current value
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Callback producing a probe's current value.
///
/// Called from the sampling flow while the registry is read-locked; keep it
/// fast and non-blocking.
pub type ValueFn = Box<dyn Fn() -> f32 + Send + Sync>;

/// Where a probe's current value comes from.
///
/// Exactly one variant is stored per probe, so resolution never has to
/// arbitrate between simultaneously configured sources. The update rules in
/// the registry preserve the historical priority: installing a getter
/// supersedes everything, attaching a shared cell supersedes a cached scalar,
/// and clearing a getter falls back to `None` rather than disturbing a
/// shared-cell attachment made elsewhere.
pub enum ValueSource {
    /// No injected source; hardware probes fall through to a live read
    None,
    /// Callback invoked at resolution time
    Getter(ValueFn),
    /// Live value read from a shared cell owned by the application
    Shared(Arc<SharedValue>),
    /// Last explicitly injected scalar
    Cached(f32),
}

impl ValueSource {
    /// Resolve the injected value, if any.
    ///
    /// Returns `None` only for [`ValueSource::None`]; every other variant
    /// produces a value.
    pub fn injected(&self) -> Option<f32> {
        match self {
            ValueSource::None => None,
            ValueSource::Getter(f) => Some(f()),
            ValueSource::Shared(cell) => Some(cell.get()),
            ValueSource::Cached(v) => Some(*v),
        }
    }

    /// Whether an injected source is configured
    pub fn is_some(&self) -> bool {
        !matches!(self, ValueSource::None)
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::None => write!(f, "None"),
            ValueSource::Getter(_) => write!(f, "Getter(..)"),
            ValueSource::Shared(cell) => write!(f, "Shared({})", cell.get()),
            ValueSource::Cached(v) => write!(f, "Cached({})", v),
        }
    }
}

/// One registered signal: a hardware pin or a virtual probe.
#[derive(Debug)]
pub struct Probe {
    /// Pin number, or virtual index at or above [`VIRTUAL_ID_FLOOR`]
    pub id: u16,
    /// Probe category
    pub kind: ProbeKind,
    /// Direction string (`"IN"`/`"OUT"`/`"-"`) for hardware probes, variable
    /// name for virtual probes
    pub label: String,
    /// Where the current value comes from
    pub source: ValueSource,
}

impl Probe {
    /// Create a placeholder entry for a not-yet-configured pin
    pub fn placeholder(id: u16) -> Self {
        Self {
            id,
            kind: ProbeKind::Unconfigured,
            label: "-".to_string(),
            source: ValueSource::None,
        }
    }

    /// Whether this probe is virtual
    pub fn is_virtual(&self) -> bool {
        self.kind == ProbeKind::Virtual
    }

    /// Resolve the injected value for this probe, if any
    pub fn injected_value(&self) -> Option<f32> {
        self.source.injected()
    }
}
