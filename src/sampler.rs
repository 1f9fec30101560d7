//! Autonomous sampling thread
//!
//! In autonomous mode a dedicated thread publishes one sampling round, waits
//! for the current interval, and repeats. The wait doubles as the stop
//! check: it blocks on a channel whose only traffic is the stop signal, so
//! the loop wakes up early the moment [`SamplerHandle::stop`] is called (or
//! the handle is dropped) and otherwise times out into the next round.
//!
//! Interval changes apply on the next iteration: every wait re-reads the
//! shared interval, so a rate request never needs to poke the thread.

use crate::error::Result;
use crate::watch::PinWatch;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle onto the autonomous sampling thread.
///
/// Dropping the handle signals the loop to exit after its current wait;
/// [`stop`](SamplerHandle::stop) additionally joins the thread.
#[derive(Debug)]
pub struct SamplerHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl SamplerHandle {
    /// Signal the sampling loop to exit and wait for it to finish
    pub fn stop(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Spawn the autonomous sampling loop for `watch`.
pub(crate) fn spawn(watch: PinWatch) -> Result<SamplerHandle> {
    let (stop_tx, stop_rx) = bounded::<()>(1);

    let thread = std::thread::Builder::new()
        .name("pinwatch-sampler".to_string())
        .spawn(move || {
            tracing::info!("sampling thread started");
            loop {
                watch.send_round();
                let wait = Duration::from_millis(u64::from(watch.interval_ms()));
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Stop requested, or every handle was dropped
                    _ => break,
                }
            }
            tracing::info!("sampling thread stopped");
        })?;

    Ok(SamplerHandle {
        stop_tx,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SamplingMode, WatchConfig};
    use crate::mock::{MockPins, MockTransport};
    use crate::types::ProbeKind;
    use std::sync::Arc;

    fn fast_watch(transport: Arc<MockTransport>) -> PinWatch {
        let config = WatchConfig {
            mode: SamplingMode::Autonomous,
            interval_ms: 10,
            rate_min_ms: 10,
            ..WatchConfig::default()
        };
        PinWatch::new(config, Arc::new(MockPins::new()), transport)
    }

    #[test]
    fn test_autonomous_publishes_until_stopped() {
        let transport = Arc::new(MockTransport::new());
        let watch = fast_watch(Arc::clone(&transport));
        watch.register_pin(2, Some(ProbeKind::Digital), Some("IN"), None);

        let handle = watch.begin(None).unwrap().expect("autonomous handle");
        std::thread::sleep(Duration::from_millis(100));
        handle.stop();

        let published = transport.published().len();
        assert!(published >= 2, "expected several rounds, got {}", published);

        // No further rounds after stop
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(transport.published().len(), published);
    }

    #[test]
    fn test_dropping_handle_stops_thread() {
        let transport = Arc::new(MockTransport::new());
        let watch = fast_watch(Arc::clone(&transport));

        let handle = watch.begin(None).unwrap().expect("autonomous handle");
        std::thread::sleep(Duration::from_millis(40));
        drop(handle);

        // Give the loop one wait to notice the disconnect, then verify quiet
        std::thread::sleep(Duration::from_millis(50));
        let published = transport.published().len();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(transport.published().len(), published);
    }
}
