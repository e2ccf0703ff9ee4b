use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Direction, Dungeon, Grid, Position, Size, Tile};

/// Result of one carving pass, including the order cells were pushed on the
/// work stack.
#[derive(Debug, Clone)]
pub struct Carving {
    pub dungeon: Dungeon,
    pub start: Position,
    pub pushed: Vec<Position>,
}

/// Recursive-backtracker maze carver.
///
/// Cells are popped depth-first. A popped cell becomes floor as soon as it
/// has an unvisited neighbour to expand into, so every floor cell is linked
/// to the cell that discovered it and the floor stays 4-connected. Cells that
/// turn out to be dead ends when popped stay walls.
#[derive(Debug, Clone, Copy)]
pub struct MazeGenerator {
    size: Size,
}

impl MazeGenerator {
    /// # Panics
    ///
    /// Panics if `size` has no cells. Sessions reject such sizes earlier
    /// through `SessionConfig::validate`.
    pub fn new(size: Size) -> Self {
        assert!(size.area() > 0, "Maze must have at least one cell");

        Self { size }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Dungeon {
        self.generate_traced(rng).dungeon
    }

    pub fn generate_traced<R: Rng + ?Sized>(&self, rng: &mut R) -> Carving {
        let Size { width, height } = self.size;
        let mut dungeon = Dungeon::walls(width, height);
        let mut visited = Grid::new(width, height, &mut |_, _| false);
        let mut pushed = Vec::with_capacity(self.size.area());

        let start = (rng.gen_range(0..width), rng.gen_range(0..height));
        let mut stack = vec![start];

        if let Some(cell) = visited.get_mut(start.0, start.1) {
            *cell = true;
        }
        pushed.push(start);

        debug!("Carving {} maze from ({}, {})", self.size, start.0, start.1);

        let mut directions = Direction::ALL;

        while let Some((x, y)) = stack.pop() {
            directions.shuffle(rng);

            for direction in directions {
                let Some((nx, ny)) = visited.neighbor_position(x, y, direction) else {
                    continue;
                };

                match visited.get_mut(nx, ny) {
                    Some(seen) if !*seen => *seen = true,
                    _ => continue,
                }

                if let Some(tile) = dungeon.get_mut(x, y) {
                    *tile = Tile::Floor;
                }

                trace!("({}, {}) -> ({}, {})", x, y, nx, ny);

                stack.push((nx, ny));
                pushed.push((nx, ny));
            }
        }

        debug!("Carved {} floor cells", dungeon.count(Tile::Floor));

        Carving {
            dungeon,
            start,
            pushed,
        }
    }
}
