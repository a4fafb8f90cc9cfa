use std::collections::HashSet;

use crate::AgentId;
use super::free_cells::FreeCellSet;
use super::types::{Direction, GridCoordinate, Segment};

/// What one `advance` did to the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Advance {
    pub new_head: GridCoordinate,
    pub vacated_tail: GridCoordinate,
    /// Heading the tail moved along during this advance.
    pub tail_heading: Direction,
}

#[derive(Clone, Debug)]
pub struct SnakeAgent {
    pub id: AgentId,
    pub label: String,
    pub color: String,
    body: Vec<Segment>,
    body_set: HashSet<GridCoordinate>,
    apples_eaten: u32,
}

impl SnakeAgent {
    /// Cells a snake of `length` covers when its head sits on `head` facing `heading`:
    /// the head first, then one cell further back per segment. A length of zero still
    /// yields the head. Stops early if stepping back would leave the `i32` range.
    pub fn spawn_layout(head: GridCoordinate, length: usize, heading: Direction) -> Vec<GridCoordinate> {
        let back = heading.opposite();
        std::iter::successors(Some(head), |cell| cell.checked_step(back))
            .take(length.max(1))
            .collect()
    }

    /// Lays the body out per `spawn_layout`, all segments heading the same way, and
    /// takes their cells out of `free_cells`.
    pub fn initialize(
        id: AgentId,
        start_cell: GridCoordinate,
        length: usize,
        heading: Direction,
        label: String,
        color: String,
        free_cells: &mut FreeCellSet,
    ) -> Self {
        let body: Vec<Segment> = Self::spawn_layout(start_cell, length, heading)
            .into_iter()
            .map(|cell| Segment::new(cell, heading))
            .collect();
        for segment in &body {
            free_cells.remove(&segment.cell);
        }
        let body_set = body.iter().map(|s| s.cell).collect();

        Self {
            id,
            label,
            color,
            body,
            body_set,
            apples_eaten: 0,
        }
    }

    pub fn head(&self) -> Segment {
        self.body[0]
    }

    pub fn tail(&self) -> Segment {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.body
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        self.body.iter().map(|s| s.cell)
    }

    pub fn contains(&self, cell: &GridCoordinate) -> bool {
        self.body_set.contains(cell)
    }

    /// Index of the segment standing on `cell`; 0 is the head.
    pub fn segment_index(&self, cell: &GridCoordinate) -> Option<usize> {
        if !self.body_set.contains(cell) {
            return None;
        }
        self.body.iter().position(|s| s.cell == *cell)
    }

    pub fn apples_eaten(&self) -> u32 {
        self.apples_eaten
    }

    pub fn set_head_heading(&mut self, heading: Direction) {
        self.body[0].heading = heading;
    }

    /// Moves every segment one cell along its own heading, then hands each heading one
    /// segment further down the body. A turn therefore travels from head to tail at one
    /// segment per tick.
    pub fn advance(&mut self) -> Advance {
        let tail = self.tail();

        for segment in self.body.iter_mut() {
            segment.cell = segment.cell.step(segment.heading);
        }
        for i in (1..self.body.len()).rev() {
            self.body[i].heading = self.body[i - 1].heading;
        }

        self.body_set.clear();
        self.body_set.extend(self.body.iter().map(|s| s.cell));

        Advance {
            new_head: self.body[0].cell,
            vacated_tail: tail.cell,
            tail_heading: tail.heading,
        }
    }

    /// Appends a segment one cell behind the tail, against `from_tail_heading`.
    /// Returns the new cell; the caller marks it occupied.
    pub fn grow(&mut self, from_tail_heading: Direction) -> GridCoordinate {
        let cell = self.tail().cell.step(from_tail_heading.opposite());
        self.body.push(Segment::new(cell, from_tail_heading));
        self.body_set.insert(cell);
        self.apples_eaten += 1;
        cell
    }
}
