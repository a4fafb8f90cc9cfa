use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

impl GridCoordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    /// `None` when the step leaves the `i32` range.
    pub fn checked_step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    pub fn is_adjacent(&self, other: &GridCoordinate) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl Add<(i32, i32)> for GridCoordinate {
    type Output = GridCoordinate;

    fn add(self, (dx, dy): (i32, i32)) -> Self::Output {
        GridCoordinate::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// `Up` grows `y`, `Right` grows `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// One body cell of a snake together with the heading it will move along on the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub cell: GridCoordinate,
    pub heading: Direction,
}

impl Segment {
    pub fn new(cell: GridCoordinate, heading: Direction) -> Self {
        Self { cell, heading }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub cols: i32,
    pub rows: i32,
}

impl Bounds {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    pub fn contains(&self, cell: &GridCoordinate) -> bool {
        (0..self.cols).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }

    pub fn area(&self) -> usize {
        (self.cols.max(0) as usize) * (self.rows.max(0) as usize)
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| GridCoordinate::new(x, y)))
    }
}
