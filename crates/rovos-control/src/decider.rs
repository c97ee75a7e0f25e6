//! [`MotionDecider`] – direction-hysteresis debouncer.
//!
//! A network output hovering near 0.5 flips its drive direction on nearly
//! every tick, which reverses the motors hard enough to shake the chassis.
//! The decider damps the *speed magnitude* during uncertain transitions
//! instead of filtering the network output itself, so no extra lag is added
//! to the steering signal.
//!
//! # Algorithm
//!
//! Per tick, with two output channels:
//!
//! 1. Take the sign of each output relative to the 0.5 midpoint.
//! 2. If the sign pair matches the previous tick, count one more stable
//!    tick.  Otherwise the direction changed: if fewer than
//!    `change_tolerance` stable ticks had accumulated, or both channels
//!    inverted simultaneously (a symmetric flip, the strongest oscillation
//!    signal), multiply this tick's speed by `slow_down_factor`; the stable
//!    counter resets either way.
//! 3. Each channel's command is `round((output - 0.5) * effective_speed)`.
//!
//! This is a pure state machine over `(last_sign, stable_count)`: no
//! terminal state, one transition per tick, no external reset.

use tracing::debug;

/// Number of stable ticks the decider starts with.  A tolerant start: the
/// first real direction change is not damped unless it conflicts with
/// itself.
const INITIAL_STABLE_COUNT: u32 = 2;

/// Direction-hysteresis state machine mapping two network outputs to two
/// signed motor speeds.
///
/// Owned exclusively by the tick loop; never shared or externally reset.
#[derive(Debug, Clone)]
pub struct MotionDecider {
    /// Ticks the decider waits before trusting a direction change at full
    /// speed.
    change_tolerance: u32,
    /// Speed multiplier applied during an untrusted change (e.g. `0.5`).
    slow_down_factor: f64,
    /// Sign pair seen on the previous tick, one of `-1`/`+1` per channel.
    last_sign: [i8; 2],
    /// Consecutive ticks the sign pair has been unchanged.
    stable_count: u32,
}

impl MotionDecider {
    /// Create a decider with an arbitrary `[+1, +1]` starting sign pair and
    /// a tolerant initial stable count.
    pub fn new(change_tolerance: u32, slow_down_factor: f64) -> Self {
        Self {
            change_tolerance,
            slow_down_factor,
            last_sign: [1, 1],
            stable_count: INITIAL_STABLE_COUNT,
        }
    }

    /// Sign pair recorded on the previous tick.
    pub fn last_sign(&self) -> [i8; 2] {
        self.last_sign
    }

    /// Consecutive ticks the sign pair has held.
    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    /// Map one pair of network outputs to motor speeds for this tick.
    ///
    /// `outputs` are raw sigmoid values in `(0, 1)`, already mapped to
    /// motor-channel order; `base_speed` is the configured full speed.
    pub fn decide(&mut self, outputs: [f64; 2], base_speed: f64) -> [i32; 2] {
        let sign_now = [sign_of(outputs[0]), sign_of(outputs[1])];

        let speed = if sign_now == self.last_sign {
            self.stable_count += 1;
            base_speed
        } else {
            let flipped = [sign_now[1], sign_now[0]] == self.last_sign;
            let damped = self.stable_count < self.change_tolerance || flipped;
            self.stable_count = 0;
            if damped {
                debug!(
                    ?sign_now,
                    flipped, "direction change not yet trusted; damping speed"
                );
                base_speed * self.slow_down_factor
            } else {
                base_speed
            }
        };
        self.last_sign = sign_now;

        [
            channel_speed(outputs[0], speed),
            channel_speed(outputs[1], speed),
        ]
    }
}

/// Sign of an output relative to the 0.5 sigmoid midpoint.
fn sign_of(output: f64) -> i8 {
    if output < 0.5 { -1 } else { 1 }
}

/// Recenter an output around zero and scale it to a signed integer speed.
fn channel_speed(output: f64, speed: f64) -> i32 {
    ((output - 0.5) * speed).round() as i32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
