//! Host-side demo: a few pins plus two virtual probes, sampled in polled
//! mode against mock hardware.
//!
//! Run with `cargo run --example virtual_probes`.

use pinwatch::mock::{MockPins, MockTransport};
use pinwatch::{
    PinReader, PinWatch, ProbeKind, SamplingMode, SharedValue, TelemetryPacket, Transport,
    WatchConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,pinwatch=trace")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pins = Arc::new(
        MockPins::new()
            .with_digital(2, true)
            .with_analog(34, 1776)
            .with_temperature(98.6),
    );
    let transport = Arc::new(MockTransport::new());

    let config = WatchConfig {
        mode: SamplingMode::Polled,
        interval_ms: 100,
        ..WatchConfig::default()
    };
    let watch = PinWatch::new(
        config,
        Arc::clone(&pins) as Arc<dyn PinReader>,
        Arc::clone(&transport) as Arc<dyn Transport>,
    );

    // A digital input, an analog input, and the DAC pin driven at half duty
    watch.register_pin(2, Some(ProbeKind::Digital), Some("IN"), None);
    watch.register_pin(34, Some(ProbeKind::Analog), Some("IN"), None);
    watch.register_pin(25, Some(ProbeKind::Analog), Some("OUT"), None);
    watch.set_cached(25, 128.0);

    // Virtual probes observe plain application variables
    let speed = Arc::new(SharedValue::new(0.0));
    let ticks = Arc::new(SharedValue::new(0.0));
    watch.probe_value(110, Arc::clone(&speed), "speed");
    watch.probe_value(111, Arc::clone(&ticks), "loop_ticks");

    watch.begin(None)?;

    for tick in 0..20u32 {
        speed.set((tick as f32 * 0.4).sin() * 30.0);
        ticks.set(tick as f32);
        watch.poll();
        std::thread::sleep(Duration::from_millis(25));
    }

    let published = transport.published();
    println!("published {} packets:", published.len());
    for bytes in &published {
        let packet: TelemetryPacket = serde_json::from_slice(bytes)?;
        println!(
            "  seq {} last {} ({} entries, {} bytes)",
            packet.seq,
            packet.last,
            packet.pins.len(),
            bytes.len()
        );
        for entry in &packet.pins {
            println!("    #{:<3} {:<8} {:?}", entry.num, entry.config, entry.value);
        }
    }

    Ok(())
}
