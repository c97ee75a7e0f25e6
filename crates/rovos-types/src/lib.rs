use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Role of a neuron inside the fixed drive network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronKind {
    /// Receives one smoothed sensor channel per tick.
    Input,
    Hidden,
    /// Exactly one per network; its output is pinned to `1.0` every tick.
    Bias,
    /// Contributes one value to the network output vector, in model order.
    Output,
}

/// Stable identifier of a neuron within one network.
///
/// Ids come from the external topology description and are only required to
/// be unique; they carry no ordering meaning (evaluation order is positional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeuronId(pub u32);

impl std::fmt::Display for NeuronId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raw sensor frame as delivered by the vehicle transport.
///
/// Wire shape: `{"sensors": [0.35, 0.61, ...]}`, one reading per configured
/// input neuron, in input-neuron order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    pub sensors: Vec<f64>,
}

/// Signed speed command for the two drive channels.
///
/// Wire shape: `{"speeds": [-180, 165]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub speeds: [i32; 2],
}

/// Per-tick snapshot of what the network saw and produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnSnapshot {
    /// Smoothed input vector handed to the evaluator this tick.
    pub inputs: Vec<f64>,
    /// Raw network outputs, in motor-channel order.
    pub outputs: Vec<f64>,
}

/// Telemetry envelope published once per tick to the monitoring peer.
///
/// The `ann` payload keeps the `{"ann": {...}}` nesting the monitoring side
/// expects for its live network view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g., "rovos-runtime::tick_loop"
    pub source: String,
    pub ann: AnnSnapshot,
}

impl TelemetryEvent {
    /// Wrap a snapshot with a fresh id and the current timestamp.
    pub fn now(source: impl Into<String>, ann: AnnSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            ann,
        }
    }
}

/// Global error type spanning topology validation, per-tick sensor faults,
/// and transport failures.
#[derive(Error, Debug)]
pub enum RoverError {
    /// Malformed or inconsistent network description. Fatal: raised during
    /// startup validation, never from the tick loop.
    #[error("Invalid Topology: {0}")]
    InvalidTopology(String),

    /// Malformed, short, or unreadable sensor frame. Recoverable: the tick
    /// loop skips the rest of the tick and retries on the next frame.
    #[error("Input Fault: {0}")]
    InputFault(String),

    /// The transport link itself failed (EOF, broken pipe, refused peer).
    #[error("Link Fault on {endpoint}: {details}")]
    LinkFault { endpoint: String, details: String },

    /// Configuration or model file could not be loaded.
    #[error("Config Error: {0}")]
    Config(String),
}
