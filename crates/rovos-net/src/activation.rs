//! Response-scaled logistic activation function.
//!
//! `sigmoid(x, r) = 1 / (1 + e^(-x/r))` where `r` is the neuron's activation
//! response.  Smaller responses steepen the curve; `r = 1.0` is the plain
//! logistic function.

/// Largest magnitude fed to `exp`.  `f64::exp` overflows to infinity just
/// above 709, so clamping the scaled activation to ±700 keeps every result
/// finite and inside (0, 1).
pub const EXP_CLAMP: f64 = 700.0;

/// Compute the response-scaled sigmoid of `activation`.
///
/// `response` must be non-zero; [`NetworkModel`][crate::model::NetworkModel]
/// validation guarantees this for every neuron before evaluation starts.
///
/// For all finite inputs the result lies in the open interval `(0, 1)`, and
/// `sigmoid(0.0, r) == 0.5` for every `r`.
pub fn sigmoid(activation: f64, response: f64) -> f64 {
    let x = (activation / response).clamp(-EXP_CLAMP, EXP_CLAMP);
    1.0 / (1.0 + (-x).exp())
}
