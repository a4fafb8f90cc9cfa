use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::AgentId;
use crate::config::Validate;
use super::snake::SnakeAgent;
use super::types::{Bounds, Direction, GridCoordinate};

const PALETTE: &[&str] = &["green", "blue", "red", "yellow", "magenta", "cyan", "orange", "purple"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    pub label: String,
    /// Passed through to the host untouched.
    pub color: String,
    pub heading: Direction,
    /// Head row relative to the middle row.
    pub row_offset: i32,
    /// Head column relative to the middle column.
    #[serde(default)]
    pub column_offset: i32,
}

impl AgentSettings {
    /// `None` when an offset pushes the head past the `i32` range.
    pub fn head_cell(&self, bounds: &Bounds) -> Option<GridCoordinate> {
        Some(GridCoordinate::new(
            (bounds.cols / 2).checked_add(self.column_offset)?,
            (bounds.rows / 2).checked_add(self.row_offset)?,
        ))
    }

    pub fn start_cells(&self, bounds: &Bounds, start_length: usize) -> Option<Vec<GridCoordinate>> {
        let head = self.head_cell(bounds)?;
        Some(SnakeAgent::spawn_layout(head, start_length, self.heading))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSettings {
    pub rows: i32,
    pub cols: i32,
    pub ticks_per_second: f64,
    pub start_length: usize,
    pub agents: Vec<AgentSettings>,
    #[serde(default)]
    pub walls: Vec<GridCoordinate>,
}

impl ArenaSettings {
    /// `count` snakes stacked on the middle column with one free row between them,
    /// all heading left.
    pub fn with_agent_count(rows: i32, cols: i32, start_length: usize, count: usize) -> Self {
        let agents = (0..count)
            .map(|i| AgentSettings {
                label: AgentId::from_index(i).to_string(),
                color: PALETTE[i % PALETTE.len()].to_string(),
                heading: Direction::Left,
                row_offset: count as i32 - 1 - 2 * i as i32,
                column_offset: 0,
            })
            .collect();

        Self {
            rows,
            cols,
            ticks_per_second: 3.0,
            start_length,
            agents,
            walls: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.cols, self.rows)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second)
    }
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self::with_agent_count(30, 40, 4, 4)
    }
}

impl Validate for ArenaSettings {
    fn validate(&self) -> Result<(), String> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(format!("Board must have positive size, got {}x{}", self.cols, self.rows));
        }
        if !(0.1..=100.0).contains(&self.ticks_per_second) {
            return Err("Ticks per second must be between 0.1 and 100".to_string());
        }
        if self.agents.is_empty() {
            return Err("At least one agent is required".to_string());
        }
        if self.agents.len() > self.rows as usize {
            return Err(format!(
                "{} agents do not fit on {} rows",
                self.agents.len(),
                self.rows
            ));
        }
        if self.start_length == 0 {
            return Err("Start length must be at least 1".to_string());
        }
        if self.start_length > self.cols as usize {
            return Err(format!(
                "Start length {} exceeds {} columns",
                self.start_length, self.cols
            ));
        }

        let bounds = self.bounds();
        let mut taken = HashSet::new();
        for wall in &self.walls {
            if !bounds.contains(wall) {
                return Err(format!("Wall {} lies outside the board", wall));
            }
            taken.insert(*wall);
        }

        for agent in &self.agents {
            let cells = agent
                .start_cells(&bounds, self.start_length)
                .ok_or_else(|| format!("{} has an offset outside the board", agent.label))?;
            if cells.len() < self.start_length {
                return Err(format!("{} does not fit on the board", agent.label));
            }
            for cell in cells {
                if !bounds.contains(&cell) {
                    return Err(format!("{} does not fit on the board at {}", agent.label, cell));
                }
                if !taken.insert(cell) {
                    return Err(format!("{} overlaps another spawn or wall at {}", agent.label, cell));
                }
            }
        }

        Ok(())
    }
}
