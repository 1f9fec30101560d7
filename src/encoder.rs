//! Value resolution and packet chunking
//!
//! This module turns the registry into wire bytes. [`build_entry`] resolves
//! one probe's current value through its source (falling back to a live
//! hardware read for hardware probes) and applies the per-kind export
//! policy. [`encode_round`] walks the registry in order and packs entries
//! greedily into packets that target the configured byte budget.
//!
//! # Chunking
//!
//! The byte budget is a target, not a hard ceiling: a single entry that is
//! larger than the whole budget is still emitted, alone in its own packet,
//! so the round always makes forward progress. An empty registry produces
//! exactly one packet with an empty entry array so observers still see a
//! heartbeat with `last = true`.

use crate::error::Result;
use crate::hal::PinReader;
use crate::registry::ProbeRegistry;
use crate::target::Target;
use crate::types::{Probe, ProbeKind};
use crate::wire::{EntryValue, ProbeEntry, SourceClass, TelemetryPacket, Voltage, PROTOCOL_VERSION};

/// Reference voltage used to derive the `voltage` field
const VCC: f64 = 3.3;

/// Full scale of the 12-bit ADC / DAC range
const ADC_MAX: i32 = 4095;

/// Header fields shared by every packet of one sampling round
#[derive(Debug, Clone, Copy)]
pub struct RoundHeader {
    /// Milliseconds since the sampling context was created
    pub timestamp: u64,
    /// Current sampling interval in milliseconds
    pub rate: u32,
    /// Device temperature in Celsius, if available
    pub temp: Option<f64>,
}

/// Serialize one probe into its wire entry.
///
/// Resolution order: the probe's configured source first, then a live
/// hardware read for hardware probes. Virtual probes with no source export
/// 0.000. This never fails; unavailable sources always degrade to a
/// substitute value.
pub fn build_entry(probe: &Probe, target: Target, pins: &dyn PinReader) -> ProbeEntry {
    let injected = probe.injected_value();

    let mut entry = ProbeEntry {
        num: probe.id,
        config: probe.kind.as_str().to_string(),
        direction: probe.label.clone(),
        src: SourceClass::Hw,
        value: EntryValue::Int(0),
        digital: None,
        analog: None,
        voltage: None,
    };

    match probe.kind {
        ProbeKind::Virtual => {
            let v = f64::from(injected.unwrap_or(0.0));
            let rounded = (v * 1000.0).round() / 1000.0;
            entry.src = SourceClass::Virtual;
            entry.value = EntryValue::Float(rounded);
            entry.voltage = Some(Voltage::dash());
        }
        ProbeKind::Analog => {
            let dac_out = probe.label == "OUT" && target.is_dac_pin(probe.id);
            let code = match injected {
                Some(v) => {
                    let mut code = v as i32;
                    if dac_out && (0..=255).contains(&code) {
                        // 8-bit DAC duty expressed on the 12-bit scale
                        code *= 16;
                    }
                    code.clamp(0, ADC_MAX)
                }
                None => i32::from(pins.analog_read(probe.id)),
            };
            entry.src = if dac_out { SourceClass::Dac } else { SourceClass::Hw };
            entry.value = EntryValue::Int(i64::from(code));
            entry.analog = Some(code as u16);
            entry.voltage = Some(Voltage::Volts(VCC * f64::from(code) / f64::from(ADC_MAX)));
        }
        // Placeholder probes read like digital pins until configured
        ProbeKind::Digital | ProbeKind::Unconfigured => {
            let level = match injected {
                Some(v) => u8::from(v != 0.0),
                None => u8::from(pins.digital_read(probe.id)),
            };
            entry.value = EntryValue::Int(i64::from(level));
            entry.digital = Some(level);
            entry.voltage = Some(Voltage::Volts(if level != 0 { VCC } else { 0.0 }));
        }
    }

    entry
}

/// Encode one full sampling round into size-bounded packets.
///
/// Entries appear in registration order, never split across packets.
/// Sequence numbers start at 0 with no gaps; exactly one packet (the final
/// one) carries `last = true`.
pub fn encode_round(
    registry: &ProbeRegistry,
    header: &RoundHeader,
    target: Target,
    pins: &dyn PinReader,
    budget: usize,
) -> Result<Vec<Vec<u8>>> {
    let probes = registry.probes();
    let mut packets = Vec::new();
    let mut cursor = 0usize;
    let mut seq: u16 = 0;

    loop {
        let mut packet = TelemetryPacket {
            ver: PROTOCOL_VERSION.to_string(),
            timestamp: header.timestamp,
            rate: header.rate,
            temp: header.temp,
            seq,
            last: false,
            pins: Vec::new(),
        };

        while cursor < probes.len() {
            packet.pins.push(build_entry(&probes[cursor], target, pins));
            cursor += 1;
            let encoded = serde_json::to_vec(&packet)?.len();
            if encoded >= budget {
                if packet.pins.len() > 1 {
                    packet.pins.pop();
                    cursor -= 1;
                } else {
                    tracing::debug!(
                        "probe {} entry alone exceeds the {} byte budget ({} bytes), sending oversized",
                        probes[cursor - 1].id,
                        budget,
                        encoded
                    );
                }
                break;
            }
        }

        if cursor >= probes.len() {
            packet.last = true;
        }
        packets.push(serde_json::to_vec(&packet)?);
        seq += 1;

        if cursor >= probes.len() {
            break;
        }
    }

    Ok(packets)
}
