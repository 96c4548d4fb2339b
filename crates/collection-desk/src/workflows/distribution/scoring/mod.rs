//! Normalised sub-score primitives shared by the operator and credit scorers.

mod experience;
mod priority;

pub use experience::{score_operator, ExperienceScore};
pub use priority::{score_priority, PriorityScore};

/// Clamp a raw contribution into `[0, cap]`, mapping non-finite input to zero.
pub(crate) fn capped(value: f64, cap: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, cap)
    } else {
        0.0
    }
}

/// Linear share of `value` against `scale`, expressed in points out of `cap`.
pub(crate) fn proportional(value: f64, scale: f64, cap: f64) -> f64 {
    if scale <= 0.0 {
        return 0.0;
    }
    capped(value / scale * cap, cap)
}
