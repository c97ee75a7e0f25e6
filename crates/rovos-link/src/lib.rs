//! `rovos-link` – Transport seam between the core and the vehicle hardware.
//!
//! The tick loop only ever talks to three traits, so the physical transports
//! (a serial byte stream to the motor controller, a socket to the telemetry
//! peer) can be swapped for in-process stubs in headless tests and CI.
//!
//! # Modules
//!
//! - [`transport`] – the [`SensorSource`][transport::SensorSource],
//!   [`CommandSink`][transport::CommandSink] and
//!   [`TelemetryPublisher`][transport::TelemetryPublisher] traits.
//! - [`line`] – [`LineLink`][line::LineLink]: newline-delimited JSON frames
//!   over any byte stream (a serial device node, a socket, a test buffer).
//! - [`telemetry`] – [`TcpTelemetry`][telemetry::TcpTelemetry]:
//!   request/reply publisher that blocks until the monitoring peer
//!   acknowledges each record.
//! - [`sim`] – scripted/recording stub transports for tests.

pub mod line;
pub mod sim;
pub mod telemetry;
pub mod transport;

pub use line::LineLink;
pub use telemetry::TcpTelemetry;
pub use transport::{CommandSink, SensorSource, TelemetryPublisher};
