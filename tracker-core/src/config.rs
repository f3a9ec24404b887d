use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::pitch;

/// Tunables for the analyzer.
///
/// The defaults are the compiled-in values the engine ships with; hosts may
/// override any of them at construction time. `validate` runs once during
/// analyzer setup so a bad combination fails fast instead of mid-stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Lower edge of the tracked band in Hz (C4).
    pub min_frequency: f64,
    /// Upper edge of the tracked band in Hz.
    pub max_frequency: f64,
    /// Mean absolute amplitude below which a block counts as silent.
    pub min_volume: f64,
    /// Smallest frequency step, in Hz, worth reporting to the listener.
    pub min_freq_delta: f64,
    /// Low-volume duration required before silence commits, in milliseconds.
    pub min_silence_duration_ms: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_frequency: 261.626,
            max_frequency: 2000.0,
            min_volume: 0.03,
            min_freq_delta: 20.0,
            min_silence_duration_ms: 300.0,
        }
    }
}

impl AnalyzerConfig {
    /// Checks the configuration for values the engine cannot run with.
    ///
    /// The comparisons are written so that NaN fields also fail.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if !(self.min_frequency > 0.0) {
            return Err(AnalyzerError::Config(format!(
                "min_frequency must be positive, got {}",
                self.min_frequency
            )));
        }
        if !(self.max_frequency > self.min_frequency) {
            return Err(AnalyzerError::Config(format!(
                "max_frequency ({}) must exceed min_frequency ({})",
                self.max_frequency, self.min_frequency
            )));
        }
        if !(self.min_volume > 0.0) {
            return Err(AnalyzerError::Config(format!(
                "min_volume must be positive, got {}",
                self.min_volume
            )));
        }
        if !(self.min_freq_delta >= 0.0) {
            return Err(AnalyzerError::Config(format!(
                "min_freq_delta must not be negative, got {}",
                self.min_freq_delta
            )));
        }
        if !(self.min_silence_duration_ms >= 0.0) {
            return Err(AnalyzerError::Config(format!(
                "min_silence_duration_ms must not be negative, got {}",
                self.min_silence_duration_ms
            )));
        }
        Ok(())
    }

    /// Suggests a capture block length for the given sample rate.
    ///
    /// Returns the smallest power of two that holds one full period at the
    /// low edge of the tracked band, so every block the host delivers can
    /// contain at least one cycle of the lowest trackable tone.
    pub fn recommended_block_len(&self, sample_rate: f64) -> usize {
        pitch::frequency_to_period(self.min_frequency, sample_rate).next_power_of_two()
    }
}
