use std::collections::{HashMap, HashSet};

use crate::AgentId;
use super::snake::SnakeAgent;
use super::types::{Bounds, GridCoordinate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBody,
    OtherAgent,
    Apple,
    Free,
}

impl Collision {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Collision::Wall | Collision::SelfBody | Collision::OtherAgent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Occupant {
    agent: AgentId,
    segment: usize,
}

/// Board as it stood when the tick began, plus where every live head wants to go.
///
/// Cells that a tail leaves during the tick are not counted as occupied. A tail stays
/// put only when its owner is about to eat the apple.
pub struct OccupancySnapshot<'a> {
    bounds: Bounds,
    walls: &'a HashSet<GridCoordinate>,
    apple: Option<GridCoordinate>,
    occupants: HashMap<GridCoordinate, Occupant>,
    claims: HashMap<GridCoordinate, usize>,
}

impl<'a> OccupancySnapshot<'a> {
    pub fn capture<'s>(
        bounds: Bounds,
        walls: &'a HashSet<GridCoordinate>,
        apple: Option<GridCoordinate>,
        agents: impl IntoIterator<Item = &'s SnakeAgent>,
        targets: &HashMap<AgentId, GridCoordinate>,
    ) -> Self {
        let mut occupants = HashMap::new();
        for agent in agents {
            let keeps_tail = targets.get(&agent.id).is_some_and(|t| Some(*t) == apple);
            let last = agent.len() - 1;
            for (segment, cell) in agent.cells().enumerate() {
                if segment == last && !keeps_tail {
                    continue;
                }
                occupants.insert(cell, Occupant { agent: agent.id, segment });
            }
        }

        let mut claims = HashMap::new();
        for target in targets.values() {
            *claims.entry(*target).or_insert(0) += 1;
        }

        Self {
            bounds,
            walls,
            apple,
            occupants,
            claims,
        }
    }

    /// Agent and segment index standing on `cell` once vacating tails are discounted.
    pub fn occupant(&self, cell: &GridCoordinate) -> Option<(AgentId, usize)> {
        self.occupants.get(cell).map(|o| (o.agent, o.segment))
    }
}

/// Decides what happens to `agent` when its head enters `target`.
pub fn classify(agent: AgentId, target: GridCoordinate, snapshot: &OccupancySnapshot<'_>) -> Collision {
    if !snapshot.bounds.contains(&target) || snapshot.walls.contains(&target) {
        return Collision::Wall;
    }

    if snapshot.claims.get(&target).copied().unwrap_or(0) > 1 {
        return Collision::OtherAgent;
    }

    if let Some(occupant) = snapshot.occupants.get(&target) {
        return if occupant.agent == agent {
            Collision::SelfBody
        } else {
            Collision::OtherAgent
        };
    }

    if snapshot.apple == Some(target) {
        return Collision::Apple;
    }

    Collision::Free
}
