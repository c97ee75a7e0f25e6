//! [`Evaluator`] – stateful forward pass over a [`NetworkModel`].
//!
//! The evaluator owns one `f64` output value per neuron slot.  That vector
//! is *deliberately* carried across calls: when a recurrent link reads a
//! source that has not been visited yet this tick, the value it sees is the
//! one left behind by the previous tick.  No separate "previous outputs"
//! buffer exists; persistence of the slot vector supplies the recurrence
//! semantics.
//!
//! One evaluator exists per physical network instance and is owned by a
//! single tick loop, so evaluation is never concurrent.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rovos_net::{Evaluator, NetworkModel, NetworkDescription};
//!
//! # let json = r#"{"neurons":[
//! #   {"id":0,"kind":"input"},{"id":1,"kind":"input"},{"id":2,"kind":"bias"},
//! #   {"id":3,"kind":"output","links_in":[
//! #     {"source":0,"target":3,"weight":0.5},
//! #     {"source":1,"target":3,"weight":-0.5},
//! #     {"source":2,"target":3,"weight":1.0}]}]}"#;
//! # let description: NetworkDescription = serde_json::from_str(json).unwrap();
//! let model = Arc::new(NetworkModel::new(description).unwrap());
//! let mut evaluator = Evaluator::new(model);
//!
//! let outputs = evaluator.evaluate(&[1.0, 1.0]).unwrap();
//! assert!((outputs[0] - 0.7311).abs() < 1e-4);
//! ```

use std::sync::Arc;

use rovos_types::{NeuronKind, RoverError};
use tracing::trace;

use crate::activation::sigmoid;
use crate::model::NetworkModel;

/// Bias neurons always emit exactly this value.
const BIAS_OUTPUT: f64 = 1.0;

/// Forward-pass engine.  Holds the per-neuron output state that implements
/// recurrence; see the module docs.
#[derive(Debug)]
pub struct Evaluator {
    model: Arc<NetworkModel>,
    /// One output per neuron slot, parallel to the model's arena.  Starts at
    /// zero: a recurrent link read before its source's first visit
    /// contributes nothing.
    outputs: Vec<f64>,
}

impl Evaluator {
    /// Create an evaluator with all neuron outputs initialised to zero.
    pub fn new(model: Arc<NetworkModel>) -> Self {
        let outputs = vec![0.0; model.len()];
        Self { model, outputs }
    }

    /// The model this evaluator runs.
    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    /// Current output value of the neuron at `slot`, as of the last pass.
    pub fn output(&self, slot: usize) -> f64 {
        self.outputs[slot]
    }

    /// Run one forward pass and return the output-neuron values in model
    /// order, each in the open interval `(0, 1)`.
    ///
    /// Input `i` is assigned to the `i`-th input neuron; the bias slot is
    /// pinned to `1.0`; every hidden/output neuron then sums
    /// `weight * current source output` over its incoming links and applies
    /// the response-scaled sigmoid.  Sources already visited this tick
    /// contribute their fresh value; sources not yet visited (reachable only
    /// through recurrent links in a valid order) contribute last tick's.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::InputFault`] when `inputs.len()` does not match
    /// the model's input-neuron count.  The carried state is left untouched
    /// in that case.
    pub fn evaluate(&mut self, inputs: &[f64]) -> Result<Vec<f64>, RoverError> {
        let model = &self.model;
        if inputs.len() != model.input_count() {
            return Err(RoverError::InputFault(format!(
                "expected {} input channels, got {}",
                model.input_count(),
                inputs.len()
            )));
        }

        self.outputs[..inputs.len()].copy_from_slice(inputs);
        self.outputs[model.bias_slot()] = BIAS_OUTPUT;

        let mut results = Vec::with_capacity(model.output_count());
        for (slot, neuron) in model
            .neurons()
            .iter()
            .enumerate()
            .skip(model.bias_slot() + 1)
        {
            let sum: f64 = neuron
                .incoming
                .iter()
                .map(|link| link.weight * self.outputs[link.source_slot])
                .sum();

            let value = sigmoid(sum, neuron.activation_response);
            self.outputs[slot] = value;

            if neuron.kind == NeuronKind::Output {
                results.push(value);
            }
        }

        trace!(?results, "forward pass complete");
        Ok(results)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkDescription, NetworkDescription, NeuronDescription};
    use rovos_types::NeuronId;

    fn neuron(id: u32, kind: NeuronKind) -> NeuronDescription {
        NeuronDescription {
            id: NeuronId(id),
            kind,
            activation_response: 1.0,
            links_in: Vec::new(),
        }
    }

    fn link(source: u32, target: u32, weight: f64, recurrent: bool) -> LinkDescription {
        LinkDescription {
            source: NeuronId(source),
            target: NeuronId(target),
            weight,
            recurrent,
        }
    }

    /// The reference network: 2 inputs, 1 bias, 1 output with weights
    /// [0.5, -0.5] from the inputs and 1.0 from the bias.
    fn reference_model() -> Arc<NetworkModel> {
        let mut out = neuron(3, NeuronKind::Output);
        out.links_in = vec![
            link(0, 3, 0.5, false),
            link(1, 3, -0.5, false),
            link(2, 3, 1.0, false),
        ];
        let description = NetworkDescription {
            neurons: vec![
                neuron(0, NeuronKind::Input),
                neuron(1, NeuronKind::Input),
                neuron(2, NeuronKind::Bias),
                out,
            ],
        };
        Arc::new(NetworkModel::new(description).unwrap())
    }

    /// Hidden neuron fed *recurrently* by an output neuron that is evaluated
    /// after it:  in(0) → out(3) → (recurrent) hidden(2)... with bias at 1.
    fn recurrent_model() -> Arc<NetworkModel> {
        let mut hidden = neuron(2, NeuronKind::Hidden);
        hidden.links_in = vec![link(3, 2, 1.0, true)];
        let mut out = neuron(3, NeuronKind::Output);
        out.links_in = vec![link(0, 3, 2.0, false)];
        let description = NetworkDescription {
            neurons: vec![
                neuron(0, NeuronKind::Input),
                neuron(1, NeuronKind::Bias),
                hidden,
                out,
            ],
        };
        Arc::new(NetworkModel::new(description).unwrap())
    }

    #[test]
    fn reference_network_matches_hand_computation() {
        let mut evaluator = Evaluator::new(reference_model());
        // sum = 0.5*1 + -0.5*1 + 1.0*1 = 1.0 → sigmoid(1, 1) ≈ 0.7311
        let outputs = evaluator.evaluate(&[1.0, 1.0]).unwrap();
        assert_eq!(outputs.len(), 1);
        assert!((outputs[0] - 0.731_058_578_630_0049).abs() < 1e-12);
    }

    #[test]
    fn input_arity_mismatch_is_an_input_fault() {
        let mut evaluator = Evaluator::new(reference_model());
        let err = evaluator.evaluate(&[1.0]).unwrap_err();
        assert!(matches!(err, RoverError::InputFault(_)));
        // State is untouched: the next well-formed call behaves like a first
        // call.
        let outputs = evaluator.evaluate(&[1.0, 1.0]).unwrap();
        assert!((outputs[0] - 0.731_058_578_630_0049).abs() < 1e-12);
    }

    #[test]
    fn bias_slot_holds_one_after_every_pass() {
        let mut evaluator = Evaluator::new(reference_model());
        for inputs in [[0.0, 0.0], [5.0, -3.0], [1.0, 1.0]] {
            evaluator.evaluate(&inputs).unwrap();
            assert_eq!(evaluator.output(evaluator.model().bias_slot()), 1.0);
        }
    }

    #[test]
    fn outputs_stay_in_open_unit_interval() {
        let mut evaluator = Evaluator::new(reference_model());
        for inputs in [[1e6, -1e6], [-1e6, 1e6], [0.0, 0.0]] {
            let outputs = evaluator.evaluate(&inputs).unwrap();
            assert!(outputs[0] > 0.0 && outputs[0] < 1.0);
        }
    }

    #[test]
    fn deterministic_across_identical_sequences() {
        let sequence = [[1.0, 0.0], [0.3, 0.7], [-2.0, 2.0], [0.5, 0.5]];

        let mut a = Evaluator::new(reference_model());
        let mut b = Evaluator::new(reference_model());
        for inputs in sequence {
            let outs_a = a.evaluate(&inputs).unwrap();
            let outs_b = b.evaluate(&inputs).unwrap();
            assert_eq!(outs_a, outs_b);
        }
    }

    #[test]
    fn recurrent_link_reads_previous_tick() {
        let mut evaluator = Evaluator::new(recurrent_model());
        let hidden_slot = evaluator.model().slot_of(NeuronId(2)).unwrap();

        // Tick 1: the output neuron has never fired, so the hidden neuron
        // sees 0.0 → sigmoid(0) = 0.5.
        let out_tick1 = evaluator.evaluate(&[1.0]).unwrap()[0];
        assert_eq!(evaluator.output(hidden_slot), 0.5);

        // Tick 2: the hidden neuron must see exactly tick 1's output value.
        evaluator.evaluate(&[1.0]).unwrap();
        assert_eq!(evaluator.output(hidden_slot), sigmoid(out_tick1, 1.0));
    }

    #[test]
    fn hidden_state_persists_across_changing_inputs() {
        let mut evaluator = Evaluator::new(recurrent_model());
        let hidden_slot = evaluator.model().slot_of(NeuronId(2)).unwrap();

        let out_tick1 = evaluator.evaluate(&[0.8]).unwrap()[0];
        evaluator.evaluate(&[-0.8]).unwrap();
        // The hidden value is a function of the *previous* output, not of
        // this tick's input.
        assert_eq!(evaluator.output(hidden_slot), sigmoid(out_tick1, 1.0));
    }
}
