//! Traversal of the solved model: members first (forces), nodes second
//! (deflections). Both walk the model in its own order so output rows are
//! deterministic given deterministic responses.

pub mod member;
pub mod nodal;

pub use member::MemberTraversal;
pub use nodal::NodalTraversal;

/// Position ratios sampled along one span for a given step.
///
/// The sequence starts at 0.0 and advances by `step`, but the final element
/// is always exactly 1.0: a naive accumulating loop can overshoot and drop
/// the end of the span when the step does not divide 1.0 in binary floating
/// point (0.1 being the usual offender). `step` must be in (0, 1].
pub fn position_ratios(step: f64) -> Vec<f64> {
    let intermediate = (1.0 / step + 1e-9).floor() as usize;
    let mut ratios: Vec<f64> = (0..intermediate).map(|i| i as f64 * step).collect();
    ratios.push(1.0);
    ratios
}

/// A member/loadcase combination the result provider had no loading for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkippedCombination {
    pub member: String,
    pub loadcase: String,
}

/// Counters returned by a traversal run.
#[derive(Debug, Clone, Default)]
pub struct TraversalStats {
    pub rows: usize,
    pub members: usize,
    pub loadcases: usize,
    pub skipped: Vec<SkippedCombination>,
}
