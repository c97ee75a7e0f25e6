//! `rovos-control` – Command-Decision layer.
//!
//! Sits on both sides of the network evaluator in the tick pipeline:
//!
//! - [`filter`] – [`InputFilter`][filter::InputFilter]: per-channel
//!   exponential smoothing of raw sensor samples before they reach the
//!   network.
//! - [`decider`] – [`MotionDecider`][decider::MotionDecider]:
//!   direction-hysteresis state machine that maps network outputs to
//!   motor-speed commands without chattering when an output hovers near the
//!   decision boundary.

pub mod decider;
pub mod filter;

pub use decider::MotionDecider;
pub use filter::InputFilter;
