//! Wire format for telemetry packets
//!
//! One sampling round serializes the whole registry into one or more JSON
//! packets. Every packet is self-describing: it repeats the header fields,
//! carries a 0-based sequence number, and flags the final packet of the
//! round with `last = true` so the observer knows when a snapshot is
//! complete.
//!
//! Entry fields depend on the probe kind:
//!
//! - virtual probes export a float `value` (3 decimals) and the literal
//!   `"-"` as `voltage`;
//! - digital probes export `value`/`digital` as 0 or 1 and a derived
//!   `voltage` of 3.3 or 0.0;
//! - analog probes export `value`/`analog` as a 12-bit code and `voltage`
//!   scaled from it.

use serde::{Deserialize, Serialize};

/// Schema version tag sent in every packet header
pub const PROTOCOL_VERSION: &str = "1.6";

/// Classification of where an entry's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceClass {
    /// Software-computed value
    Virtual,
    /// Analog output probe on a DAC-capable pin
    Dac,
    /// Plain hardware read
    Hw,
}

/// An entry's exported value: integer level/code or rounded float
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    /// Digital level or ADC code
    Int(i64),
    /// Virtual probe value, rounded to 3 decimals
    Float(f64),
}

/// Derived voltage field: a number for hardware probes, `"-"` for virtual
/// probes that have no electrical interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Voltage {
    /// Volts derived from the exported level or code
    Volts(f64),
    /// Placeholder for virtual probes
    Placeholder(String),
}

impl Voltage {
    /// The placeholder sent for virtual probes
    pub fn dash() -> Self {
        Voltage::Placeholder("-".to_string())
    }
}

/// One serialized probe within a packet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeEntry {
    /// Probe identifier (pin number or virtual index)
    pub num: u16,
    /// Kind tag: `"DIGITAL"`, `"ANALOG"`, `"VIRTUAL"` or `"-"`
    pub config: String,
    /// Direction string or virtual variable name
    pub direction: String,
    /// Value classification
    pub src: SourceClass,
    /// Exported value; meaning depends on `config`
    pub value: EntryValue,
    /// Digital level, present for digital probes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital: Option<u8>,
    /// ADC code, present for analog probes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analog: Option<u16>,
    /// Derived voltage, or `"-"` for virtual probes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<Voltage>,
}

/// One size-bounded telemetry packet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryPacket {
    /// Schema version, see [`PROTOCOL_VERSION`]
    pub ver: String,
    /// Milliseconds since the sampling context was created
    pub timestamp: u64,
    /// Current sampling interval in milliseconds
    pub rate: u32,
    /// Device temperature in Celsius, when the target reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    /// 0-based sequence number within the sampling round
    pub seq: u16,
    /// True only on the final packet of the round
    pub last: bool,
    /// Serialized probe entries that fit this packet's budget
    pub pins: Vec<ProbeEntry>,
}
