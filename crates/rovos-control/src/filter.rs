//! Per-channel exponential (low-pass) smoothing of raw sensor samples.
//!
//! Distance sensors on a moving chassis are noisy; feeding raw readings to
//! the network makes its outputs jump around the 0.5 decision boundary.  The
//! filter trades a little lag for a much smoother stream:
//!
//! ```text
//! smoothed = factor * smoothed + (1 - factor) * (raw * coefficient)
//! ```
//!
//! The very first sample on a channel seeds the state directly (scaled, not
//! blended), so the filter never starts from an artificial zero.
//!
//! # Example
//!
//! ```rust
//! use rovos_control::filter::InputFilter;
//!
//! let mut filter = InputFilter::new(0.7, 1.0);
//! assert_eq!(filter.apply(0, 10.0), 10.0);           // first sample seeds
//! assert_eq!(filter.apply(0, 0.0), 7.0);             // 0.7*10 + 0.3*0
//! ```

/// Exponential smoother with one persistent state per input channel.
///
/// Channel states live for the process lifetime; there is no reset.  A
/// channel index doubles as the evaluator's input-neuron index, so callers
/// must apply channels in that fixed order.
#[derive(Debug, Clone)]
pub struct InputFilter {
    /// Blend weight for the previous smoothed value, in `[0, 1)`.  Larger is
    /// heavier smoothing (more lag, less noise).
    factor: f64,
    /// Fixed scale applied to every raw sample before blending.
    coefficient: f64,
    /// `None` until the channel has seen its first sample.
    channels: Vec<Option<f64>>,
}

impl InputFilter {
    /// Create a filter.  `factor` is clamped into `[0, 1)`; `coefficient`
    /// is an identity scale when `1.0`.
    pub fn new(factor: f64, coefficient: f64) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0 - f64::EPSILON),
            coefficient,
            channels: Vec::new(),
        }
    }

    /// Smoothing factor actually in use (after clamping).
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Feed one raw sample for `channel` and return the new smoothed value.
    ///
    /// Channels are allocated on first use; samples are never reordered or
    /// dropped.
    pub fn apply(&mut self, channel: usize, raw: f64) -> f64 {
        if channel >= self.channels.len() {
            self.channels.resize(channel + 1, None);
        }

        let scaled = raw * self.coefficient;
        let smoothed = match self.channels[channel] {
            None => scaled,
            Some(prev) => self.factor * prev + (1.0 - self.factor) * scaled,
        };
        self.channels[channel] = Some(smoothed);
        smoothed
    }

    /// Apply every channel of a frame in index order and return the smoothed
    /// vector, matching the evaluator's expected input order.
    pub fn apply_all(&mut self, raw: &[f64]) -> Vec<f64> {
        raw.iter()
            .enumerate()
            .map(|(channel, &sample)| self.apply(channel, sample))
            .collect()
    }
}
