//! # Event Emission Module
//!
//! Delivers analysis events to the single registered listener. Delivery is
//! synchronous and best-effort: a panicking listener is caught and logged at
//! the emission boundary so it can never interrupt the sample-processing
//! path.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use crate::{AnalysisEvent, EventKind};

/// Emits [`AnalysisEvent`]s to at most one listener.
///
/// Registering a new listener replaces the prior one. Timestamps are
/// monotonic milliseconds measured from the emitter's construction.
pub struct EventEmitter {
    listener: Option<Box<dyn FnMut(AnalysisEvent)>>,
    epoch: Instant,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            listener: None,
            epoch: Instant::now(),
        }
    }

    /// Registers the listener, replacing any prior one.
    pub fn set_listener(&mut self, listener: impl FnMut(AnalysisEvent) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Stamps and delivers one event.
    ///
    /// A panic from the listener is swallowed here; the event is dropped and
    /// processing continues.
    pub fn emit(&mut self, kind: EventKind) {
        let event = AnalysisEvent {
            kind,
            timestamp_ms: self.epoch.elapsed().as_secs_f64() * 1000.0,
        };

        if let Some(listener) = self.listener.as_mut() {
            let delivery = catch_unwind(AssertUnwindSafe(|| listener(event)));
            if delivery.is_err() {
                log::warn!("event listener panicked, dropping {:?}", event.kind);
            }
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
