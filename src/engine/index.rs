use crate::Pos2;
use std::collections::HashSet;
use std::sync::OnceLock;

/// The number of permutations for a 3x3 grid of cells
const PERMUTATIONS: usize = 1 << 9;
/// Bit of the center cell in a neighborhood mask
const CENTER: usize = 0b000_010_000;

type RuleIndex = [bool; PERMUTATIONS];

/// Returns a Singleton lookup table for the B3/S23 rule
///
/// Equivalent to calling [`generate_rule_index`] once and storing the result
fn rule_index() -> &'static RuleIndex {
    static CELL: OnceLock<RuleIndex> = OnceLock::new();
    CELL.get_or_init(generate_rule_index)
}

/// Creates a lookup table for the B3/S23 rule
///
/// The table is indexed by a 9-bit number representing a cell and its neighbors,
/// as produced by [`sample`]. The center cell is the middle-most bit, `1 << 4`.
///
/// Returns whether the center cell is alive in the next generation
fn generate_rule_index() -> RuleIndex {
    let mut indices = [false; PERMUTATIONS];
    for (i, next) in indices.iter_mut().enumerate() {
        let neighbors = (i & !CENTER).count_ones();
        let alive = i & CENTER != 0;
        *next = matches!((alive, neighbors), (true, 2) | (_, 3));
    }
    indices
}

/// Reads the 3x3 block around `center` from `alive` into a 9-bit mask
///
/// Bit `i` is the `i`th cell of [`Pos2::neighborhood`], so the center lands on
/// bit 4.
pub(super) fn sample(alive: &HashSet<Pos2>, center: Pos2) -> usize {
    center
        .neighborhood()
        .enumerate()
        .filter(|(_, pos)| alive.contains(pos))
        .fold(0, |mask, (bit, _)| mask | 1 << bit)
}

/// Whether the center of `mask` is alive in the next generation
#[inline]
pub(super) fn next_state(mask: usize) -> bool {
    rule_index()[mask & (PERMUTATIONS - 1)]
}
