//! `rovos-net` – Network Evaluation Engine.
//!
//! Holds the fixed, pre-trained drive network and runs one forward pass per
//! tick.  The topology is supplied fully formed by an external description
//! and is never mutated here: there is no training, no backpropagation, and
//! no structural change at runtime.
//!
//! # Modules
//!
//! - [`model`] – [`NetworkModel`][model::NetworkModel]: immutable arena of
//!   neurons in evaluation order, validated once at construction.
//! - [`evaluator`] – [`Evaluator`][evaluator::Evaluator]: stateful forward
//!   pass.  Neuron outputs persist across calls, which is what gives
//!   recurrent links their prior-tick semantics.
//! - [`activation`] – [`sigmoid`][activation::sigmoid]: the response-scaled
//!   logistic function with an overflow-safe exponent clamp.

pub mod activation;
pub mod evaluator;
pub mod model;

pub use activation::sigmoid;
pub use evaluator::Evaluator;
pub use model::{LinkDescription, NetworkDescription, NetworkModel, NeuronDescription};
