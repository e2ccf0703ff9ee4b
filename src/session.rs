use log::{debug, info, trace};
use rand::rngs::OsRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::character::{reward, Character, CharacterState, Point};
use crate::config::{ConfigError, ExitPolicy, SessionConfig};
use crate::grid::{Direction, Dungeon, OutOfBounds, Position, Tile};
use crate::maze::MazeGenerator;

/// What a command did to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Dropped before touching any state: defeated, duplicate, out of reach.
    Ignored,
    /// Reached the character but the target tile was not walkable.
    Blocked,
    Moved,
    /// The exit was reached and a new maze has been generated.
    Won,
}

/// One run: owns the current dungeon, the character and the random source.
pub struct Session {
    config: SessionConfig,
    generator: MazeGenerator,
    rng: XorShiftRng,
    seed: u64,
    dungeon: Dungeon,
    character: Character,
    exit: Position,
    last_tile: Option<Position>,
    depth: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| OsRng.gen());
        info!("Using seed: {}", seed);

        let mut rng = XorShiftRng::seed_from_u64(seed);
        let generator = MazeGenerator::new(config.size);
        let (mut dungeon, spawn) = open_maze(&generator, &mut rng);

        let exit = dungeon.mirror(spawn);
        mark_exit(&mut dungeon, exit);

        let character = Character::new(
            Point::center_of(spawn, config.tile_size),
            config.base_stats.into(),
            config.tile_size,
            config.tile_size,
        );

        info!("Created {} dungeon, spawn {:?}, exit {:?}", config.size, spawn, exit);

        Ok(Self {
            config,
            generator,
            rng,
            seed,
            dungeon,
            character,
            exit,
            last_tile: None,
            depth: 0,
        })
    }

    /// Starts a run on a prepared dungeon. The first exit tile found is kept
    /// and any others become floor; without one the corner opposite `spawn`
    /// becomes the exit. The spawn must be a walkable tile.
    pub fn with_dungeon(
        mut config: SessionConfig,
        mut dungeon: Dungeon,
        spawn: Position,
    ) -> Result<Self, ConfigError> {
        config.size = dungeon.dimensions();
        config.validate()?;

        if !dungeon.contains(spawn.0, spawn.1) {
            return Err(ConfigError::Spawn(OutOfBounds {
                x: spawn.0,
                y: spawn.1,
                width: dungeon.width(),
                height: dungeon.height(),
            }));
        }

        if dungeon.classify(spawn.0, spawn.1) == Ok(Tile::Wall) {
            return Err(ConfigError::WallSpawn(spawn));
        }

        let seed = config.seed.unwrap_or_else(|| OsRng.gen());
        let exits = dungeon.positions_of(Tile::Exit);
        let exit = match exits.split_first() {
            Some((&exit, extra)) => {
                for &(x, y) in extra {
                    if let Some(tile) = dungeon.get_mut(x, y) {
                        debug!("Extra exit ({}, {}) demoted to floor", x, y);
                        *tile = Tile::Floor;
                    }
                }
                exit
            }
            None => {
                let exit = dungeon.mirror(spawn);
                mark_exit(&mut dungeon, exit);
                exit
            }
        };

        let character = Character::new(
            Point::center_of(spawn, config.tile_size),
            config.base_stats.into(),
            config.tile_size,
            config.tile_size,
        );

        Ok(Self {
            generator: MazeGenerator::new(config.size),
            rng: XorShiftRng::seed_from_u64(seed),
            config,
            seed,
            dungeon,
            character,
            exit,
            last_tile: None,
            depth: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Mazes cleared so far.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn last_tile(&self) -> Option<Position> {
        self.last_tile
    }

    pub fn tile_size(&self) -> f32 {
        self.config.tile_size
    }

    pub fn character_tile(&self) -> Option<Position> {
        self.character.occupied_tile(&self.dungeon, self.config.tile_size)
    }

    pub fn is_defeated(&self) -> bool {
        self.character.is_defeated()
    }

    /// Per-frame consistency pass.
    pub fn tick(&mut self) -> CharacterState {
        self.character.tick(&self.dungeon, self.config.tile_size)
    }

    /// Keyboard-style single step.
    pub fn request_move(&mut self, direction: Direction) -> Outcome {
        if self.is_defeated() {
            return Outcome::Ignored;
        }

        let outcome = if self.character.move_by(direction, &self.dungeon, self.config.tile_size) {
            self.last_tile = self.character_tile();
            self.arrive()
        } else {
            Outcome::Blocked
        };

        self.tick();
        outcome
    }

    /// Pointer-style request: the target must be the character's own tile or
    /// one orthogonal step away, and must differ from the last interacted
    /// tile.
    pub fn request_move_to(&mut self, x: usize, y: usize) -> Outcome {
        if self.is_defeated() || self.last_tile == Some((x, y)) || !self.dungeon.contains(x, y) {
            return Outcome::Ignored;
        }

        let Some((cx, cy)) = self.character_tile() else {
            return Outcome::Ignored;
        };

        let dx = x as i64 - cx as i64;
        let dy = y as i64 - cy as i64;

        if dx.abs() + dy.abs() > 1 {
            trace!("Ignoring request for ({}, {}): too far", x, y);
            return Outcome::Ignored;
        }

        let outcome = match Direction::from_delta(dx, dy) {
            None if (x, y) == self.exit => {
                self.win();
                Outcome::Won
            }
            None => return Outcome::Ignored,
            Some(direction) => {
                if self.character.move_by(direction, &self.dungeon, self.config.tile_size) {
                    self.arrive()
                } else {
                    Outcome::Blocked
                }
            }
        };

        // A win starts a fresh maze, so the old coordinate means nothing there.
        self.last_tile = (outcome != Outcome::Won).then_some((x, y));
        self.tick();
        outcome
    }

    /// Damage is dropped once the run is lost.
    pub fn apply_damage(&mut self, amount: i32) {
        if self.is_defeated() {
            return;
        }

        self.character.take_damage(amount);
        self.tick();
    }

    fn arrive(&mut self) -> Outcome {
        if self.character_tile() == Some(self.exit) {
            self.win();
            Outcome::Won
        } else {
            Outcome::Moved
        }
    }

    fn win(&mut self) {
        self.depth += 1;
        self.character.grant(&reward());

        let (mut dungeon, spawn) = open_maze(&self.generator, &mut self.rng);
        let exit = match self.config.exit_policy {
            ExitPolicy::Mirrored => dungeon.mirror(spawn),
            ExitPolicy::CornerThenInterior => interior_fallback(&dungeon, spawn, &mut self.rng),
        };

        mark_exit(&mut dungeon, exit);

        self.dungeon = dungeon;
        self.exit = exit;
        self.last_tile = None;
        self.character
            .set_position(Point::center_of(spawn, self.config.tile_size));

        info!(
            "Maze {} cleared, next spawn {:?}, exit {:?}",
            self.depth, spawn, exit
        );
    }
}

/// Uniform pick among the corners that are not walls.
pub fn open_corner<R: Rng + ?Sized>(dungeon: &Dungeon, rng: &mut R) -> Option<Position> {
    dungeon
        .corners()
        .into_iter()
        .filter(|&(x, y)| dungeon.get(x, y).is_some_and(|tile| tile.is_walkable()))
        .choose(rng)
}

/// Generates until the maze has at least one open corner to spawn in.
fn open_maze<R: Rng + ?Sized>(generator: &MazeGenerator, rng: &mut R) -> (Dungeon, Position) {
    loop {
        let dungeon = generator.generate(rng);

        match open_corner(&dungeon, rng) {
            Some(spawn) => return (dungeon, spawn),
            None => debug!("Every corner is a wall, regenerating"),
        }
    }
}

/// Opposite corner when it is open, otherwise a random open interior cell.
fn interior_fallback<R: Rng + ?Sized>(dungeon: &Dungeon, spawn: Position, rng: &mut R) -> Position {
    let corner = dungeon.mirror(spawn);

    if dungeon.get(corner.0, corner.1).is_some_and(|tile| tile.is_walkable()) {
        return corner;
    }

    let interior: Vec<Position> = dungeon
        .iter()
        .filter(|&(x, y, tile)| {
            tile.is_walkable()
                && x > 0
                && y > 0
                && x + 1 < dungeon.width()
                && y + 1 < dungeon.height()
        })
        .map(|(x, y, _)| (x, y))
        .collect();

    match interior.choose(rng) {
        Some(&cell) => {
            debug!("Opposite corner {:?} is a wall, exit moved to {:?}", corner, cell);
            cell
        }
        None => corner,
    }
}

fn mark_exit(dungeon: &mut Dungeon, (x, y): Position) {
    if let Some(tile) = dungeon.get_mut(x, y) {
        if *tile == Tile::Wall {
            debug!("Exit ({}, {}) overwrites a wall", x, y);
        }

        *tile = Tile::Exit;
    }
}
