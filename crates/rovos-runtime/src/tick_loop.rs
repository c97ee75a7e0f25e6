//! [`TickLoop`] – the perception-to-actuation orchestrator.
//!
//! Each [`tick`][TickLoop::tick]:
//!
//! 1. **Sense** – block on the [`SensorSource`] for the next frame and
//!    check its arity against the model's input count.
//! 2. **Filter** – smooth every channel through the [`InputFilter`], in
//!    input-neuron order.
//! 3. **Evaluate** – run one forward pass of the [`Evaluator`].
//! 4. **Map** – route network outputs to motor channels through the
//!    configured `motor_channel_map`.
//! 5. **Decide** – debounce the direction with the [`MotionDecider`] and
//!    scale to signed speeds.
//! 6. **Act** – write the [`MotorCommand`] to the [`CommandSink`].
//! 7. **Report** – publish the smoothed inputs and raw outputs to the
//!    [`TelemetryPublisher`] and block until the peer acknowledges.
//!
//! # Fault policy
//!
//! [`run`][TickLoop::run] treats [`RoverError::InputFault`] as transient:
//! the remainder of the tick is skipped (no evaluation, no command write, no
//! telemetry) and the next frame is awaited.  All carried state survives the
//! skip, so the following good tick resumes smoothing from its last valid
//! value; the motor coasts on whatever command the actuator last received.
//! Every other error is fatal and propagates out of `run`.
//!
//! The loop owns all mutable state exclusively.  Shutdown is cooperative: an
//! interrupt handler sets the shared flag, and the loop exits between ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rovos_control::{InputFilter, MotionDecider};
use rovos_link::{CommandSink, SensorSource, TelemetryPublisher};
use rovos_net::{Evaluator, NetworkModel};
use rovos_types::{AnnSnapshot, MotorCommand, RoverError, TelemetryEvent};
use tracing::{debug, info, warn};

use crate::config::DriveConfig;

/// Source tag carried by every telemetry record this loop publishes.
const TELEMETRY_SOURCE: &str = "rovos-runtime::tick_loop";

/// The tick orchestrator.  Sole owner of the evaluator, filter, and decider
/// state; see the module docs for the per-tick pipeline.
pub struct TickLoop {
    evaluator: Evaluator,
    filter: InputFilter,
    decider: MotionDecider,
    source: Box<dyn SensorSource>,
    sink: Box<dyn CommandSink>,
    telemetry: Box<dyn TelemetryPublisher>,
    base_speed: f64,
    motor_channel_map: [usize; 2],
    /// Ticks completed end-to-end (command written and telemetry acked).
    completed_ticks: u64,
}

impl std::fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickLoop")
            .field("base_speed", &self.base_speed)
            .field("motor_channel_map", &self.motor_channel_map)
            .field("completed_ticks", &self.completed_ticks)
            .finish_non_exhaustive()
    }
}

impl TickLoop {
    /// Wire a loop from a validated model, the drive tunables, and the three
    /// transport endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Config`] when `motor_channel_map` references an
    /// output the model does not have.
    pub fn new(
        model: Arc<NetworkModel>,
        config: &DriveConfig,
        source: Box<dyn SensorSource>,
        sink: Box<dyn CommandSink>,
        telemetry: Box<dyn TelemetryPublisher>,
    ) -> Result<Self, RoverError> {
        for &slot in &config.motor_channel_map {
            if slot >= model.output_count() {
                return Err(RoverError::Config(format!(
                    "motor_channel_map references output {slot}, but the model has only {} outputs",
                    model.output_count()
                )));
            }
        }

        Ok(Self {
            evaluator: Evaluator::new(model),
            filter: InputFilter::new(config.filter_factor, config.input_coefficient),
            decider: MotionDecider::new(config.change_tolerance, config.slow_down_factor),
            source,
            sink,
            telemetry,
            base_speed: config.base_speed,
            motor_channel_map: config.motor_channel_map,
            completed_ticks: 0,
        })
    }

    /// Ticks that ran the full pipeline to completion.
    pub fn completed_ticks(&self) -> u64 {
        self.completed_ticks
    }

    /// Execute one full tick and return the command that was written.
    ///
    /// # Errors
    ///
    /// - [`RoverError::InputFault`] – the frame was malformed or had the
    ///   wrong channel count.  No state has been mutated; the caller should
    ///   retry on the next tick.
    /// - [`RoverError::LinkFault`] – a transport failed; fatal.
    pub fn tick(&mut self) -> Result<MotorCommand, RoverError> {
        // ── 1. Sense ──────────────────────────────────────────────────────
        let frame = self.source.read_frame()?;
        let expected = self.evaluator.model().input_count();
        if frame.sensors.len() != expected {
            // Reject before filtering: a short frame must not shift channel
            // alignment inside the filter state.
            return Err(RoverError::InputFault(format!(
                "sensor frame has {} channels, expected {expected}",
                frame.sensors.len()
            )));
        }

        // ── 2. Filter ─────────────────────────────────────────────────────
        let smoothed = self.filter.apply_all(&frame.sensors);

        // ── 3. Evaluate ───────────────────────────────────────────────────
        let raw_outputs = self.evaluator.evaluate(&smoothed)?;

        // ── 4. Map outputs to motor channels ──────────────────────────────
        let mapped = [
            raw_outputs[self.motor_channel_map[0]],
            raw_outputs[self.motor_channel_map[1]],
        ];

        // ── 5. Decide ─────────────────────────────────────────────────────
        let speeds = self.decider.decide(mapped, self.base_speed);
        let command = MotorCommand { speeds };

        // ── 6. Act ────────────────────────────────────────────────────────
        self.sink.write_command(&command)?;

        // ── 7. Report (back-pressure point) ───────────────────────────────
        self.telemetry.publish(&TelemetryEvent::now(
            TELEMETRY_SOURCE,
            AnnSnapshot {
                inputs: smoothed,
                outputs: mapped.to_vec(),
            },
        ))?;

        self.completed_ticks += 1;
        debug!(?speeds, tick = self.completed_ticks, "tick complete");
        Ok(command)
    }

    /// Drive ticks until `shutdown` is set or a fatal error occurs.
    ///
    /// Transient [`RoverError::InputFault`]s are logged and skipped; the
    /// loop immediately waits for the next frame.
    ///
    /// # Errors
    ///
    /// Propagates the first non-transient error (typically a
    /// [`RoverError::LinkFault`] from a transport).
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<(), RoverError> {
        info!(
            inputs = self.evaluator.model().input_count(),
            outputs = self.evaluator.model().output_count(),
            "tick loop running"
        );
        while !shutdown.load(Ordering::SeqCst) {
            match self.tick() {
                Ok(_) => {}
                Err(RoverError::InputFault(details)) => {
                    // Transient: skip this tick, keep all carried state, and
                    // retry with the next frame.
                    warn!(details, "input fault; skipping tick");
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            ticks = self.completed_ticks,
            "shutdown requested; tick loop stopped"
        );
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
