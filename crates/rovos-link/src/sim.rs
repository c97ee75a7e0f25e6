//! In-process stub transports for headless tests and CI.
//!
//! [`ScriptedSource`] replays a fixed sequence of frames (and injected
//! faults), [`RecordingSink`] and [`RecordingTelemetry`] capture everything
//! the tick loop emits, so the full perception-to-actuation pipeline can run
//! without a vehicle attached.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rovos_types::{MotorCommand, RoverError, SensorFrame, TelemetryEvent};

use crate::transport::{CommandSink, SensorSource, TelemetryPublisher};

// ────────────────────────────────────────────────────────────────────────────
// Scripted source
// ────────────────────────────────────────────────────────────────────────────

/// Replays a scripted sequence of frames and faults, then reports a
/// [`RoverError::LinkFault`] so a driving loop terminates.
pub struct ScriptedSource {
    script: VecDeque<Result<SensorFrame, RoverError>>,
}

impl ScriptedSource {
    /// Script that yields each frame once, in order.
    pub fn new(frames: impl IntoIterator<Item = SensorFrame>) -> Self {
        Self {
            script: frames.into_iter().map(Ok).collect(),
        }
    }

    /// Append one well-formed frame to the script.
    pub fn push_frame(&mut self, sensors: Vec<f64>) {
        self.script.push_back(Ok(SensorFrame { sensors }));
    }

    /// Append one transient input fault to the script.
    pub fn push_fault(&mut self, details: impl Into<String>) {
        self.script
            .push_back(Err(RoverError::InputFault(details.into())));
    }
}

impl SensorSource for ScriptedSource {
    fn read_frame(&mut self) -> Result<SensorFrame, RoverError> {
        self.script.pop_front().unwrap_or_else(|| {
            Err(RoverError::LinkFault {
                endpoint: "scripted".to_string(),
                details: "script exhausted".to_string(),
            })
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording sink
// ────────────────────────────────────────────────────────────────────────────

/// Records every motor command.  Always succeeds.
///
/// The command log is shared: clone [`RecordingSink::log`] before handing
/// the sink to the loop, then inspect it afterwards.
#[derive(Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<MotorCommand>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded commands.
    pub fn log(&self) -> Arc<Mutex<Vec<MotorCommand>>> {
        Arc::clone(&self.log)
    }
}

impl CommandSink for RecordingSink {
    fn write_command(&mut self, command: &MotorCommand) -> Result<(), RoverError> {
        self.log
            .lock()
            .expect("recording sink lock poisoned")
            .push(*command);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording telemetry
// ────────────────────────────────────────────────────────────────────────────

/// Records every telemetry event and acknowledges immediately.
#[derive(Default)]
pub struct RecordingTelemetry {
    log: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded events.
    pub fn log(&self) -> Arc<Mutex<Vec<TelemetryEvent>>> {
        Arc::clone(&self.log)
    }
}

impl TelemetryPublisher for RecordingTelemetry {
    fn publish(&mut self, event: &TelemetryEvent) -> Result<(), RoverError> {
        self.log
            .lock()
            .expect("recording telemetry lock poisoned")
            .push(event.clone());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
