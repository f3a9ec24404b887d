// tracker-core/src/lib.rs

//! The core logic for the real-time pitch tracker.
//! This crate is responsible for silence detection, fundamental-frequency
//! estimation, and the event stream driven by both. It is completely
//! headless and contains no audio I/O or GUI code; the hosting application
//! owns the capture source and feeds sample blocks in.

use serde::{Deserialize, Serialize};

pub mod analyzer;
pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod pitch;

/// A state-change event produced while analyzing the sample stream.
// The serde derives are necessary so hosts can forward events through
// their own dispatch layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEvent {
    /// What changed.
    pub kind: EventKind,
    /// Milliseconds since the analyzer was constructed (monotonic).
    pub timestamp_ms: f64,
}

/// The kinds of state change the analyzer reports.
///
/// Events fire on transition edges only, never once per block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// The first block of the stream was processed.
    Start,
    /// The stream committed to silence after the sustained low-volume window.
    SilenceStart {
        /// Mean absolute amplitude of the block that committed the silence.
        volume: f64,
    },
    /// Sound returned after a committed silence.
    SilenceStop {
        /// Mean absolute amplitude of the block that ended the silence.
        volume: f64,
    },
    /// A new fundamental-frequency estimate beyond the debounce threshold.
    FrequencyChange {
        /// The estimate, in Hz.
        frequency: f64,
    },
}
