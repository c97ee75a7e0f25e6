//! `rovos-runtime` – The tick-loop engine.
//!
//! One tick is the whole pipeline, strictly sequential:
//!
//! ```text
//! sensor read → InputFilter → Evaluator → channel map → MotionDecider
//!             → command write → telemetry publish (blocking ack)
//! ```
//!
//! # Modules
//!
//! - [`config`] – [`DriveConfig`][config::DriveConfig]: the tunables of the
//!   decision layer plus the explicit output-to-motor channel wiring.
//! - [`tick_loop`] – [`TickLoop`][tick_loop::TickLoop]: the orchestrator.
//!   Sole owner of every piece of mutable per-tick state (evaluator outputs,
//!   filter state, decider state), so no locking exists anywhere in the
//!   core.

pub mod config;
pub mod tick_loop;

pub use config::DriveConfig;
pub use tick_loop::TickLoop;
