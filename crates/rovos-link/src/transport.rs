//! Transport traits consumed by the tick loop.
//!
//! Implementations are blocking by design: the tick loop is a single logical
//! thread, one read and one write per tick, with no overlap between ticks.

use rovos_types::{MotorCommand, RoverError, SensorFrame, TelemetryEvent};

/// Delivers one sensor frame per tick.
///
/// Blocking: a call parks the tick loop until a frame (or a fault) arrives.
pub trait SensorSource: Send {
    /// Read the next frame.
    ///
    /// # Errors
    ///
    /// - [`RoverError::InputFault`] for a malformed, short, or unreadable
    ///   frame — the tick loop skips the tick and retries.
    /// - [`RoverError::LinkFault`] when the link itself is gone (EOF,
    ///   disconnected device) — fatal to the loop.
    fn read_frame(&mut self) -> Result<SensorFrame, RoverError>;
}

/// Accepts one motor command per tick.
pub trait CommandSink: Send {
    /// Write `command` to the actuator link.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::LinkFault`] when the write cannot complete.
    fn write_command(&mut self, command: &MotorCommand) -> Result<(), RoverError>;
}

/// Publishes one telemetry record per tick to the monitoring peer.
///
/// This is the tick loop's back-pressure point: `publish` must block until
/// the peer acknowledges the record.
pub trait TelemetryPublisher: Send {
    /// Send `event` and wait for the peer's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::LinkFault`] when the record cannot be delivered
    /// or the acknowledgement never arrives.
    fn publish(&mut self, event: &TelemetryEvent) -> Result<(), RoverError>;
}
