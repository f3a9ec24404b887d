//! # Period Estimation Module
//!
//! This module estimates the fundamental frequency of a sample block by
//! searching for the period length whose shifted copy of the signal best
//! matches the original. It provides robust tracking for band-limited,
//! monophonic input without leaving the time domain.
//!
//! ## Features
//! - Difference-based autocorrelation over a bounded lag window
//! - Lag bounds derived from the tracked band and cached per sample rate
//! - Swappable estimation strategies behind a single trait
//! - McLeod-backed strategy for hosts that prefer a specialized detector

use pitch_detection::detector::PitchDetector;
use pitch_detection::detector::mcleod::McLeodDetector;

/// Given the frequency of a periodic signal, calculates the length in
/// samples of the signal's period.
///
/// # Arguments
/// * `frequency` - The signal's frequency, in Hz (must be positive)
/// * `sample_rate` - The sample rate, in Hz
///
/// # Returns
/// * The number of samples in one period, rounded up
pub fn frequency_to_period(frequency: f64, sample_rate: f64) -> usize {
    let period_ms = 1000.0 / frequency; // Calculate the period from the frequency
    (period_ms * sample_rate / 1000.0).ceil() as usize
}

/// Given the number of samples in a signal's period, calculates the
/// frequency of the signal.
///
/// # Arguments
/// * `period` - Duration of the signal's period in number of samples
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// * The frequency of the signal, in Hz
pub fn period_to_frequency(period: usize, sample_rate: f64) -> f64 {
    let period_ms = period as f64 * 1000.0 / sample_rate;
    1000.0 / period_ms
}

/// Lag window for the period search, in samples.
///
/// Derived from the tracked frequency band and the current sample rate:
/// the shortest lag corresponds to the highest trackable frequency and the
/// longest lag to the lowest. Invariant for any usable configuration:
/// `min_lag < max_lag`, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyBounds {
    /// Shortest candidate period, in samples (inclusive).
    pub min_lag: usize,
    /// Longest candidate period, in samples (exclusive).
    pub max_lag: usize,
}

impl FrequencyBounds {
    /// Derives the lag window for a frequency band at a sample rate.
    pub fn for_rate(min_frequency: f64, max_frequency: f64, sample_rate: f64) -> Self {
        Self {
            min_lag: frequency_to_period(max_frequency, sample_rate),
            max_lag: frequency_to_period(min_frequency, sample_rate),
        }
    }
}

/// Caches the lag window across blocks, recomputing it only when the
/// reported sample rate changes (including on the very first block).
///
/// Runs at the top of every estimate so the period search never consumes
/// bounds derived from a stale rate.
#[derive(Debug, Clone)]
pub struct RateAdapter {
    min_frequency: f64,
    max_frequency: f64,
    cached: Option<(f64, FrequencyBounds)>,
}

impl RateAdapter {
    pub fn new(min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            min_frequency,
            max_frequency,
            cached: None,
        }
    }

    /// Returns the lag window for this block's sample rate.
    pub fn on_block(&mut self, sample_rate: f64) -> FrequencyBounds {
        match self.cached {
            Some((rate, bounds)) if rate == sample_rate => bounds,
            _ => {
                let bounds = FrequencyBounds::for_rate(
                    self.min_frequency,
                    self.max_frequency,
                    sample_rate,
                );
                log::debug!("lag bounds recomputed for {sample_rate} Hz: {bounds:?}");
                self.cached = Some((sample_rate, bounds));
                bounds
            }
        }
    }
}

/// Finds the dominant period of a block by difference-based autocorrelation.
///
/// For each candidate lag in `[min_lag, max_lag)` the block is compared
/// against itself shifted by that lag, summing absolute sample differences
/// over the first `min(len / 2, max_lag)` indices. The lag with the lowest
/// cumulative difference wins; ties keep the smallest lag because the scan
/// runs in increasing order and only a strictly lower sum replaces the
/// current best.
///
/// The search runs entirely in the time domain; the lag window is capped by
/// the tracked band, which keeps the quadratic cost bounded.
///
/// # Arguments
/// * `samples` - Input audio block
/// * `bounds` - Lag window to search
///
/// # Returns
/// * `Some(period)` - The winning period length in samples
/// * `None` - The lag window is empty, or the block is too short for any
///   candidate lag to be compared without reading past its end
pub fn find_period(samples: &[f64], bounds: FrequencyBounds) -> Option<usize> {
    let window = (samples.len() / 2).min(bounds.max_lag);

    let mut closest_period = None;
    let mut lowest_delta = f64::INFINITY;
    for lag in bounds.min_lag..bounds.max_lag {
        // Every later lag reaches even further past the end of the block.
        if lag + window > samples.len() {
            break;
        }

        let mut delta = 0.0;
        for i in 0..window {
            delta += (samples[i] - samples[i + lag]).abs();
        }

        if delta < lowest_delta {
            lowest_delta = delta;
            closest_period = Some(lag);
        }
    }

    closest_period
}

/// A pitch-estimation strategy.
///
/// This defines the common interface for the estimation strategies the
/// analyzer can be constructed with, allowing them to be swapped without
/// touching classification or event emission. The receiver is mutable so a
/// strategy can keep per-rate derived state (cached lag bounds, a seeded
/// detector) current across blocks.
pub trait PitchEstimator {
    /// Estimates the fundamental frequency of one block, in Hz.
    ///
    /// Returning `None` is a normal outcome (no confident estimate), not an
    /// error; the analyzer withholds the frequency event for that block.
    fn estimate(&mut self, samples: &[f64], sample_rate: f64) -> Option<f64>;
}

/// The default strategy: difference-based autocorrelation over the lag
/// window derived from the tracked band.
#[derive(Debug, Clone)]
pub struct AutocorrelationEstimator {
    adapter: RateAdapter,
}

impl AutocorrelationEstimator {
    pub fn new(min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            adapter: RateAdapter::new(min_frequency, max_frequency),
        }
    }
}

impl PitchEstimator for AutocorrelationEstimator {
    fn estimate(&mut self, samples: &[f64], sample_rate: f64) -> Option<f64> {
        let bounds = self.adapter.on_block(sample_rate);
        let period = find_period(samples, bounds)?;
        Some(period_to_frequency(period, sample_rate))
    }
}

/// Alternative strategy delegating to the McLeod pitch method.
///
/// The detector is seeded once per block-length/sample-rate pair and reused
/// until either changes. Results outside the tracked band are discarded so
/// both strategies honor the same bounds.
pub struct McleodEstimator {
    min_frequency: f64,
    max_frequency: f64,
    power_threshold: f64,
    clarity_threshold: f64,
    seeded: Option<(usize, f64)>,
    detector: Option<McLeodDetector<f64>>,
}

impl McleodEstimator {
    /// Minimum signal power for the detector to report a pitch.
    pub const POWER_THRESHOLD: f64 = 5.0;
    /// Minimum clarity for the detector to report a pitch.
    pub const CLARITY_THRESHOLD: f64 = 0.7;

    pub fn new(min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            min_frequency,
            max_frequency,
            power_threshold: Self::POWER_THRESHOLD,
            clarity_threshold: Self::CLARITY_THRESHOLD,
            seeded: None,
            detector: None,
        }
    }
}

impl PitchEstimator for McleodEstimator {
    fn estimate(&mut self, samples: &[f64], sample_rate: f64) -> Option<f64> {
        if samples.len() < 2 {
            return None;
        }

        if self.seeded != Some((samples.len(), sample_rate)) {
            log::debug!(
                "seeding McLeod detector for {} samples at {sample_rate} Hz",
                samples.len()
            );
            self.detector = Some(McLeodDetector::new(samples.len(), samples.len() / 2));
            self.seeded = Some((samples.len(), sample_rate));
        }

        let detector = self.detector.as_mut()?;
        let pitch = detector.get_pitch(
            samples,
            sample_rate.round() as usize,
            self.power_threshold,
            self.clarity_threshold,
        )?;

        // Final guard: only frequencies inside the tracked band are usable.
        let frequency = pitch.frequency;
        if frequency.is_finite()
            && frequency >= self.min_frequency
            && frequency <= self.max_frequency
        {
            Some(frequency)
        } else {
            None
        }
    }
}
