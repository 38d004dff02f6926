use super::World;
use crate::Pos2;

/// A rectangular view of a [`World`], `[top_left, bottom_right)`
///
/// Its `Display` impl draws the region as rows of `.` and `O`.
pub struct WorldWindow<'a> {
    tl: Pos2,
    br: Pos2,
    world: &'a World,
}
impl<'a> WorldWindow<'a> {
    pub fn new(world: &'a World, top_left: Pos2, bottom_right: Pos2) -> Self {
        Self {
            tl: top_left,
            br: bottom_right,
            world,
        }
    }

    #[inline]
    fn contains(&self, pos: &Pos2) -> bool {
        (self.tl.x..self.br.x).contains(&pos.x) && (self.tl.y..self.br.y).contains(&pos.y)
    }

    /// The live cells inside the window, row-major
    pub fn cells(&self) -> Vec<Pos2> {
        let mut cells: Vec<Pos2> = self
            .world
            .iter()
            .filter(|pos| self.contains(pos))
            .copied()
            .collect();
        cells.sort_unstable();
        cells
    }
}

impl std::fmt::Display for WorldWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in self.tl.y..self.br.y {
            for x in self.tl.x..self.br.x {
                let c = if self.world.is_alive(Pos2 { x, y }) { 'O' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_clipped_and_sorted() {
        let world = World::from_alive([
            Pos2::new(2, 1),
            Pos2::new(0, 0),
            Pos2::new(5, 0),
            Pos2::new(1, 1),
            Pos2::new(0, -1),
        ]);
        let window = world.window(Pos2::zero(), Pos2::new(3, 2));

        assert_eq!(
            window.cells(),
            vec![Pos2::new(0, 0), Pos2::new(1, 1), Pos2::new(2, 1)]
        );
    }

    #[test]
    fn draws_blinker_phases() {
        let mut world = World::from_alive([Pos2::new(0, 1), Pos2::new(1, 1), Pos2::new(2, 1)]);
        let tl = Pos2::zero();
        let br = Pos2::new(3, 3);

        assert_eq!(world.window(tl, br).to_string(), "...\nOOO\n...\n");
        world.step();
        assert_eq!(world.window(tl, br).to_string(), ".O.\n.O.\n.O.\n");
    }
}
