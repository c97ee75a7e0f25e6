//! [`LineLink`] – newline-delimited JSON frames over a byte stream.
//!
//! The motor controller speaks one JSON object per line in each direction:
//! `{"sensors": [...]}` inbound, `{"speeds": [l, r]}` outbound.  The link is
//! generic over [`BufRead`] + [`Write`], so the same codec serves a serial
//! device node opened as a [`File`][std::fs::File], a socket, or an
//! in-memory buffer in tests.
//!
//! Fault mapping follows the tick loop's recovery policy: a garbled or
//! truncated line is an [`InputFault`][RoverError::InputFault] (skip the
//! tick, retry), while EOF or a failed write is a
//! [`LinkFault`][RoverError::LinkFault] (the device is gone).

use std::io::{BufRead, Write};

use rovos_types::{MotorCommand, RoverError, SensorFrame};
use tracing::trace;

use crate::transport::{CommandSink, SensorSource};

/// Bidirectional line-framed JSON link.
///
/// `endpoint` is a human-readable name (e.g. `/dev/ttyACM0`) used in fault
/// reports.
#[derive(Debug)]
pub struct LineLink<R, W> {
    reader: R,
    writer: W,
    endpoint: String,
}

impl<R: BufRead, W: Write> LineLink<R, W> {
    /// Wrap an already-open reader/writer pair.
    pub fn new(reader: R, writer: W, endpoint: impl Into<String>) -> Self {
        Self {
            reader,
            writer,
            endpoint: endpoint.into(),
        }
    }

    fn link_fault(&self, details: impl Into<String>) -> RoverError {
        RoverError::LinkFault {
            endpoint: self.endpoint.clone(),
            details: details.into(),
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> SensorSource for LineLink<R, W> {
    fn read_frame(&mut self) -> Result<SensorFrame, RoverError> {
        let mut buffer = String::new();
        let read = self
            .reader
            .read_line(&mut buffer)
            .map_err(|e| RoverError::InputFault(format!("read failed: {e}")))?;
        if read == 0 {
            return Err(self.link_fault("EOF while waiting for a sensor frame"));
        }

        let frame: SensorFrame = serde_json::from_str(buffer.trim_end())
            .map_err(|e| RoverError::InputFault(format!("malformed sensor frame: {e}")))?;
        trace!(channels = frame.sensors.len(), "sensor frame received");
        Ok(frame)
    }
}

impl<R: BufRead + Send, W: Write + Send> CommandSink for LineLink<R, W> {
    fn write_command(&mut self, command: &MotorCommand) -> Result<(), RoverError> {
        let mut frame = serde_json::to_vec(command)
            .map_err(|e| self.link_fault(format!("command serialization: {e}")))?;
        frame.push(b'\n');
        self.writer
            .write_all(&frame)
            .and_then(|_| self.writer.flush())
            .map_err(|e| self.link_fault(format!("command write failed: {e}")))?;
        trace!(speeds = ?command.speeds, "motor command written");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
