use enum_map::{enum_map, Enum, EnumMap};
use log::{debug, trace};

use crate::grid::{Direction, Dungeon, Position, Tile};

pub const EXPERIENCE_PER_STEP: u32 = 5;
pub const BASE_EXPERIENCE_REQUIRED: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Stat {
    Strength,
    Intelligence,
    Dexterity,
    Life,
    Mana,
}

pub type Stats = EnumMap<Stat, i32>;

/// Bonus paid on every level-up and on every cleared maze.
pub fn reward() -> Stats {
    enum_map! {
        Stat::Strength => 2,
        Stat::Intelligence => 2,
        Stat::Dexterity => 2,
        Stat::Life => 15,
        Stat::Mana => 5,
    }
}

/// Tile index along one axis of a world coordinate.
pub fn tile_of(coord: f32, tile_size: f32) -> i64 {
    (coord / tile_size).floor() as i64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centre of a tile in world units.
    pub fn center_of((x, y): Position, tile_size: f32) -> Self {
        Self::new((x as f32 + 0.5) * tile_size, (y as f32 + 0.5) * tile_size)
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub experience: u32,
    pub level: u32,
    pub experience_required: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            experience: 0,
            level: 1,
            experience_required: BASE_EXPERIENCE_REQUIRED,
        }
    }
}

/// Outcome of one evaluation pass.
///
/// `Clamped` and `LeveledUp` are transient and fall back to walking on the
/// next pass. `Defeated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterState {
    Walking,
    Clamped,
    LeveledUp,
    Defeated,
}

#[derive(Debug, Clone)]
pub struct Character {
    position: Point,
    width: f32,
    height: f32,
    stats: Stats,
    progression: Progression,
    defeated: bool,
}

impl Character {
    pub fn new(position: Point, stats: Stats, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
            stats,
            progression: Progression::default(),
            defeated: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats[stat]
    }

    pub fn life(&self) -> i32 {
        self.stats[Stat::Life]
    }

    pub fn progression(&self) -> Progression {
        self.progression
    }

    pub fn experience(&self) -> u32 {
        self.progression.experience
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn experience_required(&self) -> u32 {
        self.progression.experience_required
    }

    /// Tile under the character centre, possibly outside the dungeon.
    pub fn tile(&self, tile_size: f32) -> (i64, i64) {
        (
            tile_of(self.position.x, tile_size),
            tile_of(self.position.y, tile_size),
        )
    }

    /// Tile under the character centre if it lies inside `dungeon`.
    pub fn occupied_tile(&self, dungeon: &Dungeon, tile_size: f32) -> Option<Position> {
        let (x, y) = self.tile(tile_size);
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;

        dungeon.contains(x, y).then_some((x, y))
    }

    /// Step one whole tile. Walls and the dungeon edge block the move and
    /// leave the character untouched.
    pub fn move_by(&mut self, direction: Direction, dungeon: &Dungeon, tile_size: f32) -> bool {
        let (dx, dy) = direction.delta();
        let next = Point::new(
            self.position.x + dx as f32 * tile_size,
            self.position.y + dy as f32 * tile_size,
        );

        let (Ok(tx), Ok(ty)) = (
            usize::try_from(tile_of(next.x, tile_size)),
            usize::try_from(tile_of(next.y, tile_size)),
        ) else {
            return false;
        };

        match dungeon.get(tx, ty) {
            Some(tile) if tile.is_walkable() => {
                trace!("Moved {:?} to ({}, {})", direction, tx, ty);

                self.position = next;
                self.progression.experience =
                    self.progression.experience.saturating_add(EXPERIENCE_PER_STEP);

                true
            }
            _ => false,
        }
    }

    pub fn grant(&mut self, bonus: &Stats) {
        for (stat, value) in bonus {
            self.stats[stat] += value;
        }
    }

    pub fn level_up(&mut self) {
        let required = self.progression.experience_required;

        self.progression.level += 1;
        self.progression.experience = 0;
        // ceil(required * 1.25)
        self.progression.experience_required = (required * 5).div_ceil(4);

        self.grant(&reward());

        debug!(
            "Reached level {} (next at {})",
            self.progression.level, self.progression.experience_required
        );
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.stats[Stat::Life] -= amount;
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated || self.life() <= 0
    }

    pub fn is_colliding(&self, other: &Character) -> bool {
        self.position.distance(&other.position) < self.width / 2.0 + other.width / 2.0
    }

    /// Per-evaluation consistency pass: defeat check, wall clamp, then at
    /// most one level-up.
    pub fn tick(&mut self, dungeon: &Dungeon, tile_size: f32) -> CharacterState {
        if self.is_defeated() {
            if !self.defeated {
                debug!("Character defeated with {} life", self.life());
            }

            self.defeated = true;
            return CharacterState::Defeated;
        }

        let mut state = CharacterState::Walking;

        if let Some((x, y)) = self.occupied_tile(dungeon, tile_size) {
            if dungeon.get(x, y) == Some(&Tile::Wall) {
                self.clamp_to_tile((x, y), tile_size);
                state = CharacterState::Clamped;
            }
        }

        if self.progression.experience >= self.progression.experience_required {
            self.level_up();
            state = CharacterState::LeveledUp;
        }

        state
    }

    fn clamp_to_tile(&mut self, (x, y): Position, tile_size: f32) {
        let left = x as f32 * tile_size;
        let top = y as f32 * tile_size;
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;

        self.position.x = (left + half_width).max(self.position.x.min(left + tile_size - half_width));
        self.position.y = (top + half_height).max(self.position.y.min(top + tile_size - half_height));

        trace!("Clamped into wall tile ({}, {})", x, y);
    }
}
