use crate::Pos2;
use std::collections::HashSet;

/// Collects every cell whose next state may differ from its current one
///
/// A cell can only change if something in its 3x3 block changed during the
/// last step, so the candidates are the union of the blocks around `changed`.
/// Every cell outside this set keeps its state.
pub(super) fn collect(changed: &HashSet<Pos2>) -> HashSet<Pos2> {
    let mut candidates = HashSet::with_capacity(changed.len() * 9);
    for &cell in changed {
        candidates.extend(cell.neighborhood());
    }
    candidates
}
