mod candidates;
mod index;
mod window;

pub use self::window::WorldWindow;
use crate::Pos2;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::trace;

/// An unbounded Game of Life world that only recomputes around recent changes
///
/// `alive` holds exactly the live cells of the current generation. `changed`
/// holds every cell whose state flipped during the last [`World::step`], plus
/// anything toggled or inserted since. The next step only evaluates the 3x3
/// blocks around `changed`, so its cost follows the activity of the pattern
/// rather than its extent.
#[derive(Debug, Default, Clone)]
pub struct World {
    alive: HashSet<Pos2>,
    changed: HashSet<Pos2>,
    generation: u64,
}

impl World {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world where every cell of `alive` is live and marked as changed
    pub fn from_alive<I: IntoIterator<Item = Pos2>>(alive: I) -> Self {
        let mut world = Self::new();
        for cell in alive {
            world.insert(cell);
        }
        world
    }

    #[inline]
    pub fn is_alive(&self, cell: Pos2) -> bool {
        self.alive.contains(&cell)
    }

    /// Flips `cell` and returns its new state
    ///
    /// The cell is always recorded as changed, so the next step reconsiders its
    /// block even if a second toggle restored it.
    pub fn toggle(&mut self, cell: Pos2) -> bool {
        let alive = if self.alive.remove(&cell) {
            false
        } else {
            self.alive.insert(cell)
        };
        self.changed.insert(cell);
        alive
    }

    /// Makes `cell` alive, returning whether it was dead before
    pub fn insert(&mut self, cell: Pos2) -> bool {
        self.changed.insert(cell);
        self.alive.insert(cell)
    }

    /// Advances the world by one generation
    pub fn step(&mut self) {
        let candidates = candidates::collect(&self.changed);
        self.changed.clear();

        let flips: Vec<Pos2> = candidates
            .iter()
            .copied()
            .filter(|&cell| self.flips(cell))
            .collect();
        self.apply(candidates.len(), flips);
    }

    /// Advances the world by one generation, evaluating candidates on the rayon
    /// thread pool
    ///
    /// Produces the same generation as [`World::step`].
    pub fn step_parallel(&mut self) {
        let candidates: Vec<Pos2> = candidates::collect(&self.changed).into_iter().collect();
        self.changed.clear();

        let flips: Vec<Pos2> = candidates
            .par_iter()
            .copied()
            .filter(|&cell| self.flips(cell))
            .collect();
        self.apply(candidates.len(), flips);
    }

    /// Whether `cell` has a different state in the next generation
    ///
    /// Only reads `alive`, so every decision of a step sees the same generation.
    #[inline]
    fn flips(&self, cell: Pos2) -> bool {
        index::next_state(index::sample(&self.alive, cell)) != self.is_alive(cell)
    }

    fn apply(&mut self, candidates: usize, flips: Vec<Pos2>) {
        trace!(
            generation = self.generation,
            candidates,
            flips = flips.len(),
            "step"
        );
        for cell in flips {
            if !self.alive.remove(&cell) {
                self.alive.insert(cell);
            }
            self.changed.insert(cell);
        }
        self.generation += 1;
    }

    /// Iterates over the live cells in no particular order
    ///
    /// The order is stable between calls as long as the world is not mutated.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Pos2> {
        self.alive.iter()
    }

    /// The live cells in row-major order
    pub fn sorted(&self) -> Vec<Pos2> {
        let mut cells: Vec<Pos2> = self.alive.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Cells whose state changed since the previous step
    #[inline]
    pub fn changed(&self) -> impl Iterator<Item = &Pos2> {
        self.changed.iter()
    }

    #[inline]
    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }

    /// True when the next step cannot change anything
    #[inline]
    pub fn is_stable(&self) -> bool {
        self.changed.is_empty()
    }

    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Number of steps taken so far, including steps that changed nothing
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Smallest `(top_left, bottom_right)` pair containing every live cell,
    /// both corners inclusive
    pub fn bounding_box(&self) -> Option<(Pos2, Pos2)> {
        let mut cells = self.alive.iter();
        let first = *cells.next()?;
        Some(cells.fold((first, first), |(tl, br), p| {
            (
                Pos2::new(tl.x.min(p.x), tl.y.min(p.y)),
                Pos2::new(br.x.max(p.x), br.y.max(p.y)),
            )
        }))
    }

    /// A view of the live cells inside `[top_left, bottom_right)`
    pub fn window(&self, top_left: Pos2, bottom_right: Pos2) -> WorldWindow<'_> {
        WorldWindow::new(self, top_left, bottom_right)
    }
}

impl<'a> IntoIterator for &'a World {
    type Item = &'a Pos2;
    type IntoIter = std::collections::hash_set::Iter<'a, Pos2>;

    fn into_iter(self) -> Self::IntoIter {
        self.alive.iter()
    }
}
