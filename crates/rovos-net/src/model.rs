//! [`NetworkModel`] – immutable, validated network topology.
//!
//! The model is an arena: neurons live in one owned `Vec` whose order *is*
//! the evaluation order, and links refer to other neurons by
//! [`NeuronId`], resolved once at construction through an id-to-slot index.
//! Nothing is reference-counted per neuron, so the cyclic topology graph
//! (cycles exist via recurrent links) never creates an ownership cycle.
//!
//! A valid evaluation order is:
//!
//! 1. every `Input` neuron, as a contiguous prefix;
//! 2. exactly one `Bias` neuron;
//! 3. `Hidden`/`Output` neurons, arranged so that every *non-recurrent*
//!    link's source appears strictly earlier than its target.
//!
//! All of this is checked by [`NetworkModel::new`]; after construction the
//! topology is frozen.  Evaluation state (the per-neuron output values)
//! lives in [`Evaluator`][crate::evaluator::Evaluator], not here, so one
//! model can be held behind a shared reference.

use std::collections::HashMap;

use rovos_types::{NeuronId, NeuronKind, RoverError};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Description (load format)
// ────────────────────────────────────────────────────────────────────────────

/// One directed weighted link in the external topology description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkDescription {
    pub source: NeuronId,
    pub target: NeuronId,
    pub weight: f64,
    /// When `true` the link's contribution uses the source's output from the
    /// *previous* tick.
    #[serde(default)]
    pub recurrent: bool,
}

/// One neuron in the external topology description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronDescription {
    pub id: NeuronId,
    pub kind: NeuronKind,
    #[serde(default = "default_activation_response")]
    pub activation_response: f64,
    /// Every link whose `target` is this neuron.
    #[serde(default)]
    pub links_in: Vec<LinkDescription>,
}

fn default_activation_response() -> f64 {
    1.0
}

/// The full network description as loaded from an external source (typically
/// a JSON file exported by the trainer).  Neuron order is evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub neurons: Vec<NeuronDescription>,
}

// ────────────────────────────────────────────────────────────────────────────
// Arena types
// ────────────────────────────────────────────────────────────────────────────

/// A validated incoming link.  `source_slot` is the source neuron's index in
/// the arena, resolved once at construction so evaluation never touches the
/// id index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: NeuronId,
    pub source_slot: usize,
    pub weight: f64,
    pub recurrent: bool,
}

/// A validated neuron.  Immutable; per-tick output values are kept by the
/// [`Evaluator`][crate::evaluator::Evaluator].
///
/// Incoming links on `Input`/`Bias` neurons are inert: their slots are
/// overwritten directly at the start of every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub id: NeuronId,
    pub kind: NeuronKind,
    pub activation_response: f64,
    pub incoming: Vec<Link>,
}

// ────────────────────────────────────────────────────────────────────────────
// NetworkModel
// ────────────────────────────────────────────────────────────────────────────

/// Immutable, validated network topology in evaluation order.
///
/// Construct with [`NetworkModel::new`]; every invariant the forward pass
/// relies on is checked there, so evaluation itself has no failure modes
/// beyond input arity.
#[derive(Debug)]
pub struct NetworkModel {
    neurons: Vec<Neuron>,
    index: HashMap<NeuronId, usize>,
    input_count: usize,
    output_count: usize,
}

impl NetworkModel {
    /// Validate `description` and freeze it into a model.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::InvalidTopology`] if:
    /// - two neurons share an id;
    /// - a link references an id that is not in the network, or is listed
    ///   under a neuron that is not its target;
    /// - the input/bias prefix rule is violated (inputs first, then exactly
    ///   one bias, then only hidden/output neurons);
    /// - any `activation_response` is zero;
    /// - a non-recurrent link's source does not precede its target in the
    ///   evaluation order (a self-link must be marked recurrent).
    pub fn new(description: NetworkDescription) -> Result<Self, RoverError> {
        let mut index = HashMap::with_capacity(description.neurons.len());
        for (slot, neuron) in description.neurons.iter().enumerate() {
            if index.insert(neuron.id, slot).is_some() {
                return Err(RoverError::InvalidTopology(format!(
                    "duplicate neuron id {}",
                    neuron.id
                )));
            }
        }

        let (input_count, output_count) = check_prefix_rule(&description.neurons)?;

        let mut neurons = Vec::with_capacity(description.neurons.len());
        for (slot, desc) in description.neurons.iter().enumerate() {
            if desc.activation_response == 0.0 {
                return Err(RoverError::InvalidTopology(format!(
                    "neuron {}: activation response must be non-zero",
                    desc.id
                )));
            }

            let mut incoming = Vec::with_capacity(desc.links_in.len());
            for link in &desc.links_in {
                if link.target != desc.id {
                    return Err(RoverError::InvalidTopology(format!(
                        "neuron {}: listed link targets neuron {}",
                        desc.id, link.target
                    )));
                }
                let source_slot = *index.get(&link.source).ok_or_else(|| {
                    RoverError::InvalidTopology(format!(
                        "link {} -> {}: unknown source neuron",
                        link.source, link.target
                    ))
                })?;
                if !link.recurrent && source_slot >= slot {
                    return Err(RoverError::InvalidTopology(format!(
                        "link {} -> {}: non-recurrent source does not precede its target \
                         in evaluation order",
                        link.source, link.target
                    )));
                }
                incoming.push(Link {
                    source: link.source,
                    source_slot,
                    weight: link.weight,
                    recurrent: link.recurrent,
                });
            }

            neurons.push(Neuron {
                id: desc.id,
                kind: desc.kind,
                activation_response: desc.activation_response,
                incoming,
            });
        }

        debug!(
            neurons = neurons.len(),
            inputs = input_count,
            outputs = output_count,
            "network model validated"
        );

        Ok(Self {
            neurons,
            index,
            input_count,
            output_count,
        })
    }

    /// Number of `Input` neurons (and therefore expected sensor channels).
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Number of `Output` neurons.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Total neuron count.
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// `true` for the degenerate empty model (never passes validation, but
    /// keeps the `len`/`is_empty` pair conventional).
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Neurons in evaluation order.
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Arena slot of the bias neuron (always `input_count`).
    pub fn bias_slot(&self) -> usize {
        self.input_count
    }

    /// Resolve a neuron id to its arena slot.
    pub fn slot_of(&self, id: NeuronId) -> Option<usize> {
        self.index.get(&id).copied()
    }
}

/// Verify the input/bias prefix rule and return `(input_count, output_count)`.
fn check_prefix_rule(neurons: &[NeuronDescription]) -> Result<(usize, usize), RoverError> {
    let input_count = neurons
        .iter()
        .take_while(|n| n.kind == NeuronKind::Input)
        .count();

    match neurons.get(input_count) {
        Some(n) if n.kind == NeuronKind::Bias => {}
        Some(n) => {
            return Err(RoverError::InvalidTopology(format!(
                "expected the bias neuron after the input prefix, found {:?} (neuron {})",
                n.kind, n.id
            )));
        }
        None => {
            return Err(RoverError::InvalidTopology(
                "network has no bias neuron".to_string(),
            ));
        }
    }

    let mut output_count = 0;
    for neuron in &neurons[input_count + 1..] {
        match neuron.kind {
            NeuronKind::Input => {
                return Err(RoverError::InvalidTopology(format!(
                    "input neuron {} outside the input prefix",
                    neuron.id
                )));
            }
            NeuronKind::Bias => {
                return Err(RoverError::InvalidTopology(format!(
                    "second bias neuron {}",
                    neuron.id
                )));
            }
            NeuronKind::Output => output_count += 1,
            NeuronKind::Hidden => {}
        }
    }

    Ok((input_count, output_count))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron(id: u32, kind: NeuronKind) -> NeuronDescription {
        NeuronDescription {
            id: NeuronId(id),
            kind,
            activation_response: 1.0,
            links_in: Vec::new(),
        }
    }

    fn link(source: u32, target: u32, weight: f64) -> LinkDescription {
        LinkDescription {
            source: NeuronId(source),
            target: NeuronId(target),
            weight,
            recurrent: false,
        }
    }

    /// 2 inputs, 1 bias, 1 output fully connected to all three.
    fn minimal_description() -> NetworkDescription {
        let mut out = neuron(3, NeuronKind::Output);
        out.links_in = vec![link(0, 3, 0.5), link(1, 3, -0.5), link(2, 3, 1.0)];
        NetworkDescription {
            neurons: vec![
                neuron(0, NeuronKind::Input),
                neuron(1, NeuronKind::Input),
                neuron(2, NeuronKind::Bias),
                out,
            ],
        }
    }

    #[test]
    fn minimal_network_validates() {
        let model = NetworkModel::new(minimal_description()).unwrap();
        assert_eq!(model.input_count(), 2);
        assert_eq!(model.output_count(), 1);
        assert_eq!(model.len(), 4);
        assert_eq!(model.bias_slot(), 2);
        assert_eq!(model.slot_of(NeuronId(3)), Some(3));
    }

    #[test]
    fn link_slots_resolved_at_construction() {
        let model = NetworkModel::new(minimal_description()).unwrap();
        let incoming = &model.neurons()[3].incoming;
        assert_eq!(incoming[0].source_slot, 0);
        assert_eq!(incoming[1].source_slot, 1);
        assert_eq!(incoming[2].source_slot, 2);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let description = NetworkDescription {
            neurons: vec![
                neuron(0, NeuronKind::Input),
                neuron(0, NeuronKind::Bias),
            ],
        };
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_unknown_link_source() {
        let mut description = minimal_description();
        description.neurons[3].links_in.push(link(99, 3, 1.0));
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("unknown source"));
    }

    #[test]
    fn rejects_link_listed_under_wrong_target() {
        let mut description = minimal_description();
        description.neurons[3].links_in[0].target = NeuronId(2);
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("targets neuron"));
    }

    #[test]
    fn rejects_missing_bias() {
        let description = NetworkDescription {
            neurons: vec![neuron(0, NeuronKind::Input), neuron(1, NeuronKind::Output)],
        };
        let err = NetworkModel::new(description).unwrap_err();
        assert!(matches!(err, RoverError::InvalidTopology(_)));
    }

    #[test]
    fn rejects_second_bias() {
        let mut description = minimal_description();
        description.neurons.push(neuron(9, NeuronKind::Bias));
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("second bias"));
    }

    #[test]
    fn rejects_input_outside_prefix() {
        let mut description = minimal_description();
        description.neurons.push(neuron(9, NeuronKind::Input));
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("input prefix"));
    }

    #[test]
    fn rejects_zero_activation_response() {
        let mut description = minimal_description();
        description.neurons[3].activation_response = 0.0;
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn rejects_forward_reference_without_recurrent_flag() {
        // A hidden neuron fed by a later output neuron must mark the link
        // recurrent.
        let mut hidden = neuron(3, NeuronKind::Hidden);
        hidden.links_in = vec![link(4, 3, 1.0)];
        let mut out = neuron(4, NeuronKind::Output);
        out.links_in = vec![link(2, 4, 1.0)];
        let description = NetworkDescription {
            neurons: vec![
                neuron(0, NeuronKind::Input),
                neuron(1, NeuronKind::Input),
                neuron(2, NeuronKind::Bias),
                hidden,
                out,
            ],
        };
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("non-recurrent"));
    }

    #[test]
    fn accepts_forward_reference_when_recurrent() {
        let mut hidden = neuron(3, NeuronKind::Hidden);
        hidden.links_in = vec![LinkDescription {
            source: NeuronId(4),
            target: NeuronId(3),
            weight: 1.0,
            recurrent: true,
        }];
        let mut out = neuron(4, NeuronKind::Output);
        out.links_in = vec![link(2, 4, 1.0)];
        let description = NetworkDescription {
            neurons: vec![
                neuron(0, NeuronKind::Input),
                neuron(1, NeuronKind::Input),
                neuron(2, NeuronKind::Bias),
                hidden,
                out,
            ],
        };
        assert!(NetworkModel::new(description).is_ok());
    }

    #[test]
    fn rejects_non_recurrent_self_link() {
        let mut description = minimal_description();
        description.neurons[3].links_in.push(link(3, 3, 0.1));
        let err = NetworkModel::new(description).unwrap_err();
        assert!(err.to_string().contains("non-recurrent"));
    }

    #[test]
    fn accepts_recurrent_self_link() {
        let mut description = minimal_description();
        description.neurons[3].links_in.push(LinkDescription {
            source: NeuronId(3),
            target: NeuronId(3),
            weight: 0.1,
            recurrent: true,
        });
        assert!(NetworkModel::new(description).is_ok());
    }

    #[test]
    fn description_deserializes_with_defaults() {
        let json = r#"{
            "neurons": [
                {"id": 0, "kind": "input"},
                {"id": 5, "kind": "bias"},
                {"id": 6, "kind": "output",
                 "links_in": [{"source": 0, "target": 6, "weight": 0.4},
                              {"source": 5, "target": 6, "weight": 0.9}]}
            ]
        }"#;
        let description: NetworkDescription = serde_json::from_str(json).unwrap();
        // Omitted fields fall back: response 1.0, recurrent false, no links.
        assert_eq!(description.neurons[0].activation_response, 1.0);
        assert!(description.neurons[0].links_in.is_empty());
        assert!(!description.neurons[2].links_in[0].recurrent);
        assert!(NetworkModel::new(description).is_ok());
    }
}
