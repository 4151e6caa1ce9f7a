//! The single-threaded cooperative I/O loop tying capture, dispatch and
//! periodic beaconing together.

use crate::capture::CaptureSource;
use crate::dispatch::Dispatcher;
use crate::frame::build_beacon;
use crate::inject::InjectTransport;
use anyhow::Result;
use log::{debug, error, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BEACON_INTERVAL: Duration = Duration::from_millis(500);

pub struct Engine<T> {
    io: T,
    dispatcher: Dispatcher,
    beacon_enabled: bool,
    last_beacon_at: Option<Instant>,
}

impl<T: CaptureSource + InjectTransport> Engine<T> {
    pub fn new(io: T, dispatcher: Dispatcher, beacon_enabled: bool) -> Self {
        Engine {
            io,
            dispatcher,
            beacon_enabled,
            last_beacon_at: None,
        }
    }

    /// Run until `running` is cleared (normally by a signal handler).
    pub fn run(&mut self, running: Arc<AtomicBool>) -> Result<()> {
        while running.load(Ordering::SeqCst) {
            self.tick()?;
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        match self.io.poll() {
            Ok(Some(captured)) => {
                if captured.truncated() {
                    warn!(
                        "captured frame truncated: {} of {} bytes",
                        captured.captured_len, captured.wire_len
                    );
                }
                let now = Instant::now();
                if let Err(e) = self.dispatcher.handle_frame(&captured.data, now, &mut self.io) {
                    warn!("injection failed while handling frame: {e}");
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!("capture error: {e}");
            }
        }

        self.run_beacon();
        Ok(())
    }

    fn run_beacon(&mut self) {
        if !self.beacon_enabled {
            return;
        }
        let now = Instant::now();
        let due = match self.last_beacon_at {
            None => true,
            Some(last) => now.duration_since(last) >= BEACON_INTERVAL,
        };
        if !due {
            return;
        }
        let seq = self.dispatcher.next_seq();
        let frame = build_beacon(
            &self.dispatcher.bssid,
            &self.dispatcher.ssid,
            self.dispatcher.channel,
            seq,
        );
        match self.io.send(&frame) {
            Ok(()) => debug!("beacon sent"),
            Err(e) => warn!("beacon send failed: {e}"),
        }
        self.last_beacon_at = Some(now);
    }
}
