//! # Stream Analysis Module
//!
//! The analyzer ties the per-block pipeline together: input validation,
//! silence classification with its sustained-duration hysteresis, period
//! estimation, and edge-triggered event emission. One call to
//! [`Analyzer::process_block`] runs the whole pipeline synchronously to
//! completion; the host invokes it once per capture buffer and owns the
//! audio source itself.
//!
//! ## Per-block pipeline
//! 1. Reject malformed input (empty block, non-positive rate)
//! 2. Emit `Start` on the first block of the stream
//! 3. Classify the block volume against the silence threshold
//! 4. Accumulate or reset the silence duration; skip blocks still inside
//!    the grace period
//! 5. Emit `SilenceStart`/`SilenceStop` on committed transitions
//! 6. For sound blocks, estimate the frequency and emit `FrequencyChange`
//!    when the estimate moves beyond the debounce threshold

use crate::classify;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::event::EventEmitter;
use crate::pitch::{AutocorrelationEstimator, PitchEstimator};
use crate::{AnalysisEvent, EventKind};

/// Rolling analysis state, updated once per processed block.
#[derive(Debug, Default)]
struct AnalyzerState {
    /// Sample rate reported by the most recent block.
    sample_rate: Option<f64>,
    /// Last frequency reported to the listener; `None` until the first
    /// confident estimate and again after every committed silence.
    current_frequency: Option<f64>,
    /// Committed silence flag. The stream starts in the sound state and
    /// only leaves it through the sustained-duration hysteresis.
    is_silence: bool,
    /// Low-volume duration accumulated toward the silence commitment, ms.
    silence_duration_ms: f64,
    /// Whether the first block has been processed.
    started: bool,
}

/// Real-time monophonic pitch tracker.
///
/// Feed it successive sample blocks via [`process_block`]; it reports
/// stream start, silence transitions, and debounced frequency changes to
/// the registered listener. The analyzer holds no device handles and does
/// no I/O; tearing down the capture source is the host's job, after which
/// the analyzer can simply be dropped.
///
/// All processing is single-threaded. A host that delivers blocks from
/// more than one thread must add its own mutual exclusion around the
/// analyzer.
///
/// [`process_block`]: Analyzer::process_block
pub struct Analyzer {
    config: AnalyzerConfig,
    state: AnalyzerState,
    estimator: Box<dyn PitchEstimator>,
    emitter: EventEmitter,
}

impl Analyzer {
    /// Creates an analyzer with the default lag-search estimation strategy.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::Config`] if the configuration is not usable.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let estimator =
            AutocorrelationEstimator::new(config.min_frequency, config.max_frequency);
        Self::with_estimator(config, Box::new(estimator))
    }

    /// Creates an analyzer with a caller-chosen estimation strategy.
    ///
    /// The strategy only affects how frequencies are estimated; silence
    /// handling, debounce, and event emission behave identically for every
    /// strategy.
    pub fn with_estimator(
        config: AnalyzerConfig,
        estimator: Box<dyn PitchEstimator>,
    ) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AnalyzerState::default(),
            estimator,
            emitter: EventEmitter::new(),
        })
    }

    /// Registers the event listener, replacing any prior one.
    pub fn set_listener(&mut self, listener: impl FnMut(AnalysisEvent) + 'static) {
        self.emitter.set_listener(listener);
    }

    /// Processes one sample block.
    ///
    /// Runs the full pipeline described in the module docs and delivers any
    /// resulting events to the listener before returning.
    ///
    /// # Arguments
    /// * `samples` - Single-channel amplitudes, nominally in [-1, 1]
    /// * `sample_rate` - Rate the block was captured at, in Hz
    ///
    /// # Errors
    /// * [`AnalyzerError::EmptyBlock`] if `samples` is empty
    /// * [`AnalyzerError::InvalidSampleRate`] if `sample_rate` is not positive
    ///
    /// Both are rejected before any state is touched.
    pub fn process_block(
        &mut self,
        samples: &[f64],
        sample_rate: f64,
    ) -> Result<(), AnalyzerError> {
        if samples.is_empty() {
            return Err(AnalyzerError::EmptyBlock);
        }
        if !(sample_rate > 0.0) {
            return Err(AnalyzerError::InvalidSampleRate(sample_rate));
        }

        self.state.sample_rate = Some(sample_rate);

        if !self.state.started {
            self.state.started = true;
            self.emitter.emit(EventKind::Start);
        }

        let classification = classify::classify(samples, self.config.min_volume);
        if classification.is_silence {
            self.state.silence_duration_ms +=
                classify::block_duration_ms(samples.len(), sample_rate);
            if self.state.silence_duration_ms < self.config.min_silence_duration_ms {
                // Grace period: not yet committed to silence, and too quiet
                // to be worth estimating. The previous frequency stands.
                return Ok(());
            }
        } else {
            self.state.silence_duration_ms = 0.0;
        }

        if classification.is_silence != self.state.is_silence {
            self.state.is_silence = classification.is_silence;
            self.emitter.emit(if classification.is_silence {
                EventKind::SilenceStart {
                    volume: classification.volume,
                }
            } else {
                EventKind::SilenceStop {
                    volume: classification.volume,
                }
            });
        }

        if classification.is_silence {
            // Committed silence clears the estimate outright, no debounce.
            self.state.current_frequency = None;
            return Ok(());
        }

        let Some(frequency) = self.estimator.estimate(samples, sample_rate) else {
            // No confident estimate for this block; withhold the event.
            return Ok(());
        };

        let beyond_delta = self
            .state
            .current_frequency
            .is_none_or(|previous| (previous - frequency).abs() > self.config.min_freq_delta);
        if beyond_delta {
            self.state.current_frequency = Some(frequency);
            self.emitter.emit(EventKind::FrequencyChange { frequency });
        }

        Ok(())
    }

    /// Whether the stream is currently committed to silence.
    pub fn is_silence(&self) -> bool {
        self.state.is_silence
    }

    /// The last frequency reported to the listener, if any.
    pub fn current_frequency(&self) -> Option<f64> {
        self.state.current_frequency
    }

    /// Sample rate reported by the most recent block, if any.
    pub fn sample_rate(&self) -> Option<f64> {
        self.state.sample_rate
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}
