use crate::fitness::Fitness;

/// Strict Pareto dominance (C3): `a` dominates `b` iff `a` is at least
/// as good as `b` in every dimension and strictly better in at least
/// one, per spec §4.3.
///
/// Comparisons are exact on the `f64` representation; there is no
/// tolerance band. Callers that need noise tolerance must pre-quantize
/// their fitness values before calling this.
pub fn dominates(a: &Fitness, b: &Fitness) -> bool {
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    let mut strictly_better = false;
    for d in 0..a.dimensionality() {
        if a[d] < b[d] {
            // early-exit: b has a coordinate a cannot match
            return false;
        }
        if a[d] > b[d] {
            strictly_better = true;
        }
    }
    strictly_better
}
