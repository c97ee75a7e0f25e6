//! [`TcpTelemetry`] – blocking request/reply telemetry publisher.
//!
//! One JSON record per line to the monitoring peer, then block until the
//! peer answers with one acknowledgement line.  The acknowledgement is what
//! makes telemetry a back-pressure point: the tick loop cannot outrun a slow
//! monitor.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use rovos_types::{RoverError, TelemetryEvent};
use tracing::{info, trace};

use crate::transport::TelemetryPublisher;

/// Request/reply telemetry link over TCP.
#[derive(Debug)]
pub struct TcpTelemetry {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    endpoint: String,
}

impl TcpTelemetry {
    /// Connect to the monitoring peer at `addr` (e.g. `127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::LinkFault`] when the connection cannot be
    /// established.
    pub fn connect(addr: &str) -> Result<Self, RoverError> {
        let writer = TcpStream::connect(addr).map_err(|e| RoverError::LinkFault {
            endpoint: addr.to_string(),
            details: format!("connect failed: {e}"),
        })?;
        let reader = writer.try_clone().map_err(|e| RoverError::LinkFault {
            endpoint: addr.to_string(),
            details: format!("stream clone failed: {e}"),
        })?;
        info!(endpoint = addr, "telemetry peer connected");
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            endpoint: addr.to_string(),
        })
    }

    fn link_fault(&self, details: impl Into<String>) -> RoverError {
        RoverError::LinkFault {
            endpoint: self.endpoint.clone(),
            details: details.into(),
        }
    }
}

impl TelemetryPublisher for TcpTelemetry {
    fn publish(&mut self, event: &TelemetryEvent) -> Result<(), RoverError> {
        let mut record = serde_json::to_vec(event)
            .map_err(|e| self.link_fault(format!("record serialization: {e}")))?;
        record.push(b'\n');
        self.writer
            .write_all(&record)
            .and_then(|_| self.writer.flush())
            .map_err(|e| self.link_fault(format!("record write failed: {e}")))?;

        // Block until the peer acknowledges; any reply line counts.
        let mut ack = String::new();
        let read = self
            .reader
            .read_line(&mut ack)
            .map_err(|e| self.link_fault(format!("ack read failed: {e}")))?;
        if read == 0 {
            return Err(self.link_fault("peer closed before acknowledging"));
        }
        trace!(id = %event.id, "telemetry record acknowledged");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rovos_types::AnnSnapshot;
    use std::net::TcpListener;
    use std::thread;

    fn event() -> TelemetryEvent {
        TelemetryEvent::now(
            "rovos-link::tests",
            AnnSnapshot {
                inputs: vec![0.1, 0.2],
                outputs: vec![0.7, 0.3],
            },
        )
    }

    #[test]
    fn connect_failure_is_a_link_fault() {
        // Port 1 is never listening in the test environment.
        let err = TcpTelemetry::connect("127.0.0.1:1").unwrap_err();
        assert!(matches!(err, RoverError::LinkFault { .. }));
    }

    #[test]
    fn publish_blocks_for_ack_and_delivers_record() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let peer = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let mut stream = stream;
            stream.write_all(b"ok\n").unwrap();
            line
        });

        let mut telemetry = TcpTelemetry::connect(&addr).unwrap();
        telemetry.publish(&event()).unwrap();

        let received = peer.join().unwrap();
        assert!(received.contains("\"ann\""));
        assert!(received.contains("\"outputs\":[0.7,0.3]"));
    }

    #[test]
    fn peer_hangup_before_ack_is_a_link_fault() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let peer = thread::spawn(move || {
            // Accept and drop immediately: no acknowledgement ever comes.
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let mut telemetry = TcpTelemetry::connect(&addr).unwrap();
        let result = telemetry.publish(&event());
        peer.join().unwrap();
        assert!(matches!(result, Err(RoverError::LinkFault { .. })));
    }
}
