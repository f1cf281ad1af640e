//! Fixed `size × size` grid landscape, one agent per cell, no movement.

use super::{LandscapeError, Link};
use crate::AgentId;
use rand::Rng;
use rand_chacha::ChaCha12Rng;

/// Grid landscape with toroidal 4-neighborhood.
///
/// Ids are assigned row-major at construction (`id = y * size + x`) and
/// agents never change cell. Out-of-range coordinates wrap to the opposite
/// edge on both axes; the original system clamped them to the origin
/// instead, a policy deliberately replaced here so both landscape kinds
/// share the toroidal topology.
#[derive(Clone, Debug)]
pub struct GridLandscape {
    size: usize,
    // Dense row-major cell storage. Today cells[i] == AgentId(i) by
    // construction; all lookups still resolve through it.
    cells: Vec<AgentId>,
}

/// The four axis directions, in the order the original drew them.
const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl GridLandscape {
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size).map(|i| AgentId(i as u32)).collect();
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn agent_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell coordinates of an agent, or `None` for an unknown id.
    pub fn cell_of(&self, id: AgentId) -> Option<(usize, usize)> {
        if id.index() >= self.cells.len() {
            return None;
        }
        Some((id.index() % self.size, id.index() / self.size))
    }

    /// Agent occupying the cell at `(x, y)`, wrapping out-of-range
    /// coordinates toroidally.
    pub fn cell(&self, x: i64, y: i64) -> AgentId {
        let size = self.size as i64;
        let x = x.rem_euclid(size) as usize;
        let y = y.rem_euclid(size) as usize;
        self.cells[y * self.size + x]
    }

    /// The four axis-neighbors of an agent: up, right, down, left.
    pub fn neighbors4(&self, id: AgentId) -> Result<[AgentId; 4], LandscapeError> {
        let (x, y) = self.cell_of(id).ok_or(LandscapeError::UnknownAgent { id })?;
        let (x, y) = (x as i64, y as i64);
        Ok(DIRECTIONS.map(|(dx, dy)| self.cell(x + dx, y + dy)))
    }

    /// Uniform choice over exactly the four axis directions.
    ///
    /// Only a `size == 1` grid can resolve a direction back to the agent
    /// itself; that degenerate case reports no neighbor.
    pub fn random_neighbor(
        &self,
        id: AgentId,
        rng: &mut ChaCha12Rng,
    ) -> Result<Option<AgentId>, LandscapeError> {
        let neighbors = self.neighbors4(id)?;
        let chosen = neighbors[rng.random_range(0..4)];
        Ok((chosen != id).then_some(chosen))
    }

    /// One directed link per distinct axis-neighbor with a differing id.
    /// On degenerate small grids opposite directions can resolve to the
    /// same cell; duplicates are emitted once.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::with_capacity(self.cells.len() * 4);
        for &source in &self.cells {
            let neighbors = self
                .neighbors4(source)
                .expect("cell ids are always in range");
            for (i, &target) in neighbors.iter().enumerate() {
                if target == source || neighbors[..i].contains(&target) {
                    continue;
                }
                links.push(Link { source, target });
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn ids_are_row_major() {
        let grid = GridLandscape::new(3);
        assert_eq!(grid.cell_of(AgentId(0)), Some((0, 0)));
        assert_eq!(grid.cell_of(AgentId(2)), Some((2, 0)));
        assert_eq!(grid.cell_of(AgentId(3)), Some((0, 1)));
        assert_eq!(grid.cell_of(AgentId(8)), Some((2, 2)));
        assert_eq!(grid.cell_of(AgentId(9)), None);
    }

    #[test]
    fn out_of_range_coordinates_wrap() {
        let grid = GridLandscape::new(3);
        assert_eq!(grid.cell(-1, 0), AgentId(2));
        assert_eq!(grid.cell(3, 0), AgentId(0));
        assert_eq!(grid.cell(0, -1), AgentId(6));
        assert_eq!(grid.cell(1, 3), AgentId(1));
    }

    #[test]
    fn opposite_directions_compose_to_identity() {
        let grid = GridLandscape::new(4);
        for id in 0..16u32 {
            let (x, y) = grid.cell_of(AgentId(id)).unwrap();
            let (x, y) = (x as i64, y as i64);
            let up_then_down = {
                let up = grid.cell(x, y + 1);
                let (ux, uy) = grid.cell_of(up).unwrap();
                grid.cell(ux as i64, uy as i64 - 1)
            };
            assert_eq!(up_then_down, AgentId(id));
            let right_then_left = {
                let right = grid.cell(x + 1, y);
                let (rx, ry) = grid.cell_of(right).unwrap();
                grid.cell(rx as i64 - 1, ry as i64)
            };
            assert_eq!(right_then_left, AgentId(id));
        }
    }

    #[test]
    fn random_neighbor_is_an_axis_neighbor() {
        let grid = GridLandscape::new(5);
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let neighbors = grid.neighbors4(AgentId(12)).unwrap();
        for _ in 0..50 {
            let n = grid.random_neighbor(AgentId(12), &mut rng).unwrap();
            assert!(neighbors.contains(&n.unwrap()));
        }
    }

    #[test]
    fn random_neighbor_on_unknown_id_fails() {
        let grid = GridLandscape::new(2);
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert_eq!(
            grid.random_neighbor(AgentId(4), &mut rng),
            Err(LandscapeError::UnknownAgent { id: AgentId(4) })
        );
    }

    #[test]
    fn single_cell_grid_has_no_neighbor() {
        let grid = GridLandscape::new(1);
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert_eq!(grid.random_neighbor(AgentId(0), &mut rng), Ok(None));
        assert!(grid.links().is_empty());
    }

    #[test]
    fn two_by_two_links_pin_the_wrap_rule() {
        // On a 2x2 torus each cell's up/down neighbors coincide, as do
        // left/right: two distinct non-self neighbors per agent.
        let grid = GridLandscape::new(2);
        let links = grid.links();
        assert_eq!(links.len(), 8);
        for link in &links {
            assert_ne!(link.source, link.target);
        }
        let from_zero: Vec<AgentId> = links
            .iter()
            .filter(|l| l.source == AgentId(0))
            .map(|l| l.target)
            .collect();
        assert_eq!(from_zero, vec![AgentId(2), AgentId(1)]);
    }

    #[test]
    fn interior_links_are_the_full_four_neighborhood() {
        let grid = GridLandscape::new(3);
        let links = grid.links();
        assert_eq!(links.len(), 9 * 4);
        let from_center: Vec<AgentId> = links
            .iter()
            .filter(|l| l.source == AgentId(4))
            .map(|l| l.target)
            .collect();
        assert_eq!(
            from_center,
            vec![AgentId(7), AgentId(5), AgentId(1), AgentId(3)]
        );
    }
}
