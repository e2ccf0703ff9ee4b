use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type Position = (usize, usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Only unit orthogonal steps map to a direction.
    pub fn from_delta(dx: i64, dy: i64) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (raw_width, raw_height) = s.split_once('x').ok_or(format!("invalid format: {}", s))?;

        let width = raw_width
            .parse::<usize>()
            .map_err(|_| format!("invalid width: {}", raw_width))?;
        let height = raw_height
            .parse::<usize>()
            .map_err(|_| format!("invalid height: {}", raw_height))?;

        Ok(Size { width, height })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A tile coordinate outside the grid was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell ({}, {}) is outside the {}x{} grid",
            self.x, self.y, self.width, self.height
        )
    }
}

impl std::error::Error for OutOfBounds {}

#[derive(Debug, Clone)]
pub struct Grid<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

pub struct GridIter<'a, T> {
    grid: &'a Grid<T>,
    pos: usize,
}

impl<T> Grid<T> {
    pub fn new<F: FnMut(usize, usize) -> T>(width: usize, height: usize, initializer: &mut F) -> Self {
        let mut data = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                data.push(initializer(x, y));
            }
        }

        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn iter(&self) -> GridIter<T> {
        GridIter { grid: self, pos: 0 }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if !self.contains(x, y) {
            return None;
        }

        self.data.get(x + (y * self.width))
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if !self.contains(x, y) {
            return None;
        }

        self.data.get_mut(x + (y * self.width))
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<(), OutOfBounds> {
        let (width, height) = (self.width, self.height);
        let cell = self.get_mut(x, y).ok_or(OutOfBounds {
            x,
            y,
            width,
            height,
        })?;

        *cell = value;

        Ok(())
    }

    /// The four extreme cells: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Position; 4] {
        let right = self.width.saturating_sub(1);
        let bottom = self.height.saturating_sub(1);

        [(0, 0), (right, 0), (0, bottom), (right, bottom)]
    }

    /// Corner reflected across both axes.
    pub fn mirror(&self, (x, y): Position) -> Position {
        (self.width - 1 - x, self.height - 1 - y)
    }

    pub fn neighbor_position(&self, x: usize, y: usize, direction: Direction) -> Option<Position> {
        let (x, y) = match direction {
            Direction::Up => {
                if y == 0 {
                    None
                } else {
                    Some((x, y - 1))
                }
            }
            Direction::Down => {
                if y + 1 >= self.height {
                    None
                } else {
                    Some((x, y + 1))
                }
            }
            Direction::Left => {
                if x == 0 {
                    None
                } else {
                    Some((x - 1, y))
                }
            }
            Direction::Right => {
                if x + 1 >= self.width {
                    None
                } else {
                    Some((x + 1, y))
                }
            }
        }?;

        self.contains(x, y).then_some((x, y))
    }

    pub fn get_neighbor(&self, x: usize, y: usize, direction: Direction) -> Option<&T> {
        let (x, y) = self.neighbor_position(x, y, direction)?;

        self.get(x, y)
    }

    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<(Direction, &T)> {
        let mut output = Vec::with_capacity(4);

        for direction in Direction::ALL {
            if let Some(value) = self.get_neighbor(x, y, direction) {
                output.push((direction, value));
            }
        }

        output
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = (usize, usize, &'a T);
    type IntoIter = GridIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for GridIter<'a, T> {
    type Item = (usize, usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.grid.data.len() {
            None
        } else {
            let x = self.pos % self.grid.width;
            let y = self.pos / self.grid.width;
            let value = &self.grid.data[self.pos];

            self.pos += 1;

            Some((x, y, value))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Floor,
    Exit,
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        self != Tile::Wall
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Exit => 'E',
        }
    }
}

pub type Dungeon = Grid<Tile>;

impl Grid<Tile> {
    pub fn walls(width: usize, height: usize) -> Self {
        Grid::new(width, height, &mut |_, _| Tile::Wall)
    }

    pub fn classify(&self, x: usize, y: usize) -> Result<Tile, OutOfBounds> {
        self.get(x, y).copied().ok_or(OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    pub fn set_classification(&mut self, x: usize, y: usize, tile: Tile) -> Result<(), OutOfBounds> {
        self.set(x, y, tile)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.data.iter().filter(|&&t| t == tile).count()
    }

    pub fn positions_of(&self, tile: Tile) -> Vec<Position> {
        self.iter()
            .filter(|&(_, _, &t)| t == tile)
            .map(|(x, y, _)| (x, y))
            .collect()
    }
}

impl fmt::Display for Grid<Tile> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (x, _, tile) in self {
            write!(f, "{}", tile.to_char())?;

            if x + 1 == self.width {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
