use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{log, AgentId};
use crate::config::Validate;
use crate::games::SessionRng;
use super::collision::{classify, Collision, OccupancySnapshot};
use super::direction::DirectionController;
use super::error::ArenaError;
use super::events::{ArenaEvent, DeathReason, DirectionRequest, RoundSummary, Standing};
use super::free_cells::FreeCellSet;
use super::settings::ArenaSettings;
use super::snake::{Advance, SnakeAgent};
use super::types::{Bounds, Direction, GridCoordinate};

#[derive(Clone, Debug)]
struct LiveAgent {
    snake: SnakeAgent,
    controller: DirectionController,
}

/// Owns the board and every snake on it, and resolves one tick at a time.
#[derive(Clone, Debug)]
pub struct Arena {
    bounds: Bounds,
    walls: HashSet<GridCoordinate>,
    agents: BTreeMap<AgentId, LiveAgent>,
    free_cells: FreeCellSet,
    apple: Option<GridCoordinate>,
    eliminations: Vec<Standing>,
    starting_agents: usize,
    board_full: bool,
    round_over: bool,
    tick_count: u64,
}

impl Arena {
    pub fn new(settings: &ArenaSettings) -> Result<Self, ArenaError> {
        settings.validate().map_err(ArenaError::InvalidSettings)?;

        let bounds = settings.bounds();
        let mut free_cells = FreeCellSet::from_bounds(&bounds);
        let walls: HashSet<GridCoordinate> = settings.walls.iter().copied().collect();
        for wall in &walls {
            free_cells.remove(wall);
        }

        let mut agents = BTreeMap::new();
        for (index, agent_settings) in settings.agents.iter().enumerate() {
            let id = AgentId::from_index(index);
            let head = agent_settings.head_cell(&bounds).ok_or_else(|| {
                ArenaError::InvalidSettings(format!("{} has an offset outside the board", agent_settings.label))
            })?;
            let snake = SnakeAgent::initialize(
                id,
                head,
                settings.start_length,
                agent_settings.heading,
                agent_settings.label.clone(),
                agent_settings.color.clone(),
                &mut free_cells,
            );
            let controller = DirectionController::new(agent_settings.heading);
            agents.insert(id, LiveAgent { snake, controller });
        }

        Ok(Self {
            bounds,
            walls,
            agents,
            free_cells,
            apple: None,
            eliminations: Vec::new(),
            starting_agents: settings.agents.len(),
            board_full: false,
            round_over: false,
            tick_count: 0,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn walls(&self) -> &HashSet<GridCoordinate> {
        &self.walls
    }

    pub fn free_cells(&self) -> &FreeCellSet {
        &self.free_cells
    }

    pub fn apple(&self) -> Option<GridCoordinate> {
        self.apple
    }

    pub fn agent(&self, id: AgentId) -> Option<&SnakeAgent> {
        self.agents.get(&id).map(|a| &a.snake)
    }

    pub fn heading(&self, id: AgentId) -> Option<Direction> {
        self.agents.get(&id).map(|a| a.controller.heading())
    }

    pub fn live_agents(&self) -> impl Iterator<Item = &SnakeAgent> {
        self.agents.values().map(|a| &a.snake)
    }

    pub fn live_count(&self) -> usize {
        self.agents.len()
    }

    pub fn eliminations(&self) -> &[Standing] {
        &self.eliminations
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_board_full(&self) -> bool {
        self.board_full
    }

    pub fn is_round_over(&self) -> bool {
        self.round_over
    }

    /// Unknown and eliminated agents are ignored, as are requests the controller refuses.
    pub fn request_direction(&mut self, agent: AgentId, heading: Direction) -> bool {
        match self.agents.get_mut(&agent) {
            Some(live) => live.controller.request_direction(heading),
            None => false,
        }
    }

    /// Puts the apple on a random free cell. Returns `None` while an apple is already
    /// down or once the board has filled up.
    pub fn spawn_apple(&mut self, rng: &mut SessionRng) -> Option<ArenaEvent> {
        if self.board_full || self.apple.is_some() {
            return None;
        }

        match self.free_cells.random_free(rng) {
            Ok(cell) => {
                self.free_cells.remove(&cell);
                self.apple = Some(cell);
                log!("Apple spawned at {}", cell);
                Some(ArenaEvent::ApplePlaced { cell })
            }
            Err(e) => {
                self.board_full = true;
                log!("Cannot spawn apple: {}", e);
                Some(ArenaEvent::BoardFull)
            }
        }
    }

    /// Moves the apple to a chosen free cell.
    pub fn place_apple(&mut self, cell: GridCoordinate) -> Result<(), ArenaError> {
        if !self.free_cells.contains(&cell) {
            return Err(ArenaError::CellUnavailable(cell));
        }
        if let Some(previous) = self.apple.take() {
            self.free_cells.add(previous);
        }
        self.free_cells.remove(&cell);
        self.apple = Some(cell);
        Ok(())
    }

    /// Resolves one tick. Every head target is judged against the board as it stood
    /// before anybody moved; all changes are applied afterwards in ascending agent order.
    pub fn tick(&mut self, inputs: &[DirectionRequest], rng: &mut SessionRng) -> Vec<ArenaEvent> {
        if self.round_over {
            return Vec::new();
        }
        self.tick_count += 1;

        for request in inputs {
            self.request_direction(request.agent, request.heading);
        }

        let mut targets = HashMap::new();
        for (id, live) in self.agents.iter_mut() {
            live.snake.set_head_heading(live.controller.heading());
            let head = live.snake.head();
            targets.insert(*id, head.cell.step(head.heading));
        }

        let outcomes: Vec<(AgentId, Collision)> = {
            let snapshot = OccupancySnapshot::capture(
                self.bounds,
                &self.walls,
                self.apple,
                self.agents.values().map(|a| &a.snake),
                &targets,
            );
            self.agents
                .keys()
                .map(|id| (*id, classify(*id, targets[id], &snapshot)))
                .collect()
        };

        let mut events = Vec::new();

        for (id, outcome) in &outcomes {
            if let Some(reason) = DeathReason::from_collision(*outcome) {
                events.push(self.eliminate(*id, reason));
            }
        }

        let mut advances: Vec<(AgentId, bool, Advance)> = Vec::new();
        for (id, outcome) in &outcomes {
            if outcome.is_fatal() {
                continue;
            }
            if let Some(live) = self.agents.get_mut(id) {
                advances.push((*id, *outcome == Collision::Apple, live.snake.advance()));
            }
        }

        for (_, _, advance) in &advances {
            self.free_cells.add(advance.vacated_tail);
        }
        for (_, _, advance) in &advances {
            self.free_cells.remove(&advance.new_head);
        }

        let mut apple_eaten = false;
        for (id, grew, advance) in &advances {
            if *grew && let Some(live) = self.agents.get_mut(id) {
                let cell = live.snake.grow(advance.tail_heading);
                self.free_cells.remove(&cell);
                apple_eaten = true;
                log!(
                    "[{}] ate apple at {}. Length: {}",
                    live.snake.label,
                    advance.new_head,
                    live.snake.len()
                );
            }
            events.push(ArenaEvent::Moved {
                agent: *id,
                new_head: advance.new_head,
                vacated_tail: advance.vacated_tail,
                grew: *grew,
            });
        }

        if apple_eaten {
            self.apple = None;
            if let Some(event) = self.spawn_apple(rng) {
                events.push(event);
            }
        }

        for live in self.agents.values_mut() {
            live.controller.advance();
        }

        if self.free_cells.is_empty() && !self.board_full {
            self.board_full = true;
            log!("Board is full after tick {}", self.tick_count);
            events.push(ArenaEvent::BoardFull);
        }

        if self.agents.is_empty() {
            self.round_over = true;
            let summary = self.summary();
            log!(
                "Round over after {} ticks, winner: {}",
                summary.ticks,
                summary.winner.map(|w| w.to_string()).unwrap_or_else(|| "none".to_string())
            );
            events.push(ArenaEvent::RoundOver(summary));
        }

        events
    }

    fn eliminate(&mut self, id: AgentId, reason: DeathReason) -> ArenaEvent {
        let ordinal = self.eliminations.len() as u32 + 1;
        if let Some(live) = self.agents.remove(&id) {
            for cell in live.snake.cells() {
                self.free_cells.add(cell);
            }
            log!("{} lost! ({:?})", live.snake.label, reason);
            self.eliminations.push(Standing {
                agent: id,
                label: live.snake.label.clone(),
                color: live.snake.color.clone(),
                ordinal,
                eliminated_at_tick: self.tick_count,
                reason,
                apples_eaten: live.snake.apples_eaten(),
                length: live.snake.len(),
            });
        }
        ArenaEvent::Eliminated {
            agent: id,
            ordinal,
            reason,
        }
    }

    /// Standings so far, best first. The winner is whoever went out alone in the
    /// final elimination tick of a round that started with several agents.
    pub fn summary(&self) -> RoundSummary {
        let standings: Vec<Standing> = self.eliminations.iter().rev().cloned().collect();

        let winner = match standings.first() {
            Some(last) if self.starting_agents > 1 && self.agents.is_empty() => {
                let shared = standings
                    .iter()
                    .filter(|s| s.eliminated_at_tick == last.eliminated_at_tick)
                    .count();
                (shared == 1).then_some(last.agent)
            }
            _ => None,
        };

        RoundSummary {
            standings,
            winner,
            ticks: self.tick_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::settings::AgentSettings;

    fn cell(x: i32, y: i32) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    fn agent_settings(heading: Direction, column_offset: i32, row_offset: i32) -> AgentSettings {
        AgentSettings {
            label: format!("{:?} snake", heading),
            color: "white".to_string(),
            heading,
            row_offset,
            column_offset,
        }
    }

    fn custom_arena(rows: i32, cols: i32, start_length: usize, agents: Vec<AgentSettings>) -> Arena {
        let settings = ArenaSettings {
            rows,
            cols,
            ticks_per_second: 10.0,
            start_length,
            agents,
            walls: Vec::new(),
        };
        Arena::new(&settings).unwrap()
    }

    fn assert_partition(arena: &Arena) {
        let mut occupied: HashSet<GridCoordinate> = HashSet::new();
        for snake in arena.live_agents() {
            for c in snake.cells() {
                assert!(occupied.insert(c), "cell {} held twice", c);
            }
        }
        if let Some(apple) = arena.apple() {
            assert!(occupied.insert(apple), "apple on a snake at {}", apple);
        }
        for wall in arena.walls() {
            assert!(occupied.insert(*wall));
        }
        for free in arena.free_cells().iter() {
            assert!(arena.bounds().contains(free));
            assert!(!occupied.contains(free), "cell {} both free and occupied", free);
        }
        for c in &occupied {
            assert!(arena.bounds().contains(c));
        }
        assert_eq!(occupied.len() + arena.free_cells().len(), arena.bounds().area());
    }

    #[test]
    fn test_new_consumes_spawn_cells() {
        let arena = Arena::new(&ArenaSettings::default()).unwrap();
        assert_eq!(arena.live_count(), 4);
        assert_eq!(arena.free_cells().len(), 30 * 40 - 16);
        assert_partition(&arena);
    }

    #[test]
    fn test_invalid_settings_fail_construction() {
        let settings = ArenaSettings::with_agent_count(0, 10, 3, 1);
        assert!(matches!(Arena::new(&settings), Err(ArenaError::InvalidSettings(_))));
    }

    #[test]
    fn test_eating_apple_grows_and_respawns() {
        let mut arena = custom_arena(10, 10, 3, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(5);
        let cells: Vec<_> = arena.agent(AgentId::new(1)).unwrap().cells().collect();
        assert_eq!(cells, vec![cell(5, 5), cell(6, 5), cell(7, 5)]);

        arena.place_apple(cell(4, 5)).unwrap();
        let events = arena.tick(&[], &mut rng);

        let snake = arena.agent(AgentId::new(1)).unwrap();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head().cell, cell(4, 5));
        assert!(!arena.free_cells().contains(&cell(4, 5)));
        assert!(events.contains(&ArenaEvent::Moved {
            agent: AgentId::new(1),
            new_head: cell(4, 5),
            vacated_tail: cell(7, 5),
            grew: true,
        }));

        let new_apple = arena.apple().unwrap();
        assert_ne!(new_apple, cell(4, 5));
        assert!(!snake.contains(&new_apple));
        assert!(events.contains(&ArenaEvent::ApplePlaced { cell: new_apple }));
        assert_partition(&arena);
    }

    #[test]
    fn test_plain_move_frees_tail() {
        let mut arena = custom_arena(10, 10, 3, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(5);
        arena.place_apple(cell(0, 0)).unwrap();

        let events = arena.tick(&[], &mut rng);
        assert_eq!(
            events,
            vec![ArenaEvent::Moved {
                agent: AgentId::new(1),
                new_head: cell(4, 5),
                vacated_tail: cell(7, 5),
                grew: false,
            }]
        );
        assert!(arena.free_cells().contains(&cell(7, 5)));
        assert!(!arena.free_cells().contains(&cell(4, 5)));
        assert_partition(&arena);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut arena = custom_arena(10, 10, 3, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(5);
        let id = AgentId::new(1);

        assert!(!arena.request_direction(id, Direction::Right));
        assert!(arena.request_direction(id, Direction::Up));
        assert!(!arena.request_direction(id, Direction::Down));
        arena.tick(&[], &mut rng);
        assert_eq!(arena.agent(id).unwrap().head().cell, cell(5, 6));

        let events = arena.tick(&[DirectionRequest::new(id, Direction::Right)], &mut rng);
        assert_eq!(arena.agent(id).unwrap().head().cell, cell(6, 6));
        assert_eq!(events.len(), 1);
        assert_partition(&arena);
    }

    #[test]
    fn test_repeated_heading_does_not_block_turn() {
        let mut arena = custom_arena(10, 10, 3, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(5);
        let id = AgentId::new(1);

        arena.tick(
            &[
                DirectionRequest::new(id, Direction::Left),
                DirectionRequest::new(id, Direction::Up),
            ],
            &mut rng,
        );
        assert_eq!(arena.agent(id).unwrap().head().cell, cell(5, 6));
        assert_partition(&arena);
    }

    #[test]
    fn test_wall_eliminates_and_ends_round() {
        let mut arena = custom_arena(5, 5, 2, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(1);
        arena.place_apple(cell(4, 4)).unwrap();

        arena.tick(&[], &mut rng);
        arena.tick(&[], &mut rng);
        let events = arena.tick(&[], &mut rng);

        assert_eq!(
            events[0],
            ArenaEvent::Eliminated {
                agent: AgentId::new(1),
                ordinal: 1,
                reason: DeathReason::WallCollision,
            }
        );
        let Some(ArenaEvent::RoundOver(summary)) = events.last() else {
            panic!("expected round over, got {:?}", events);
        };
        assert_eq!(summary.standings.len(), 1);
        assert_eq!(summary.winner, None);
        assert_eq!(summary.ticks, 3);
        assert!(arena.is_round_over());
        assert_eq!(arena.free_cells().len(), 24);
        assert_partition(&arena);
        assert!(arena.tick(&[], &mut rng).is_empty());
    }

    #[test]
    fn test_u_turn_into_own_body() {
        let mut arena = custom_arena(10, 10, 5, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(2);
        let id = AgentId::new(1);
        arena.place_apple(cell(0, 0)).unwrap();

        arena.tick(&[DirectionRequest::new(id, Direction::Up)], &mut rng);
        arena.tick(&[DirectionRequest::new(id, Direction::Right)], &mut rng);
        let events = arena.tick(&[DirectionRequest::new(id, Direction::Down)], &mut rng);

        assert_eq!(
            events[0],
            ArenaEvent::Eliminated {
                agent: id,
                ordinal: 1,
                reason: DeathReason::SelfCollision,
            }
        );
        assert_partition(&arena);
    }

    #[test]
    fn test_head_to_head_eliminates_both() {
        let mut arena = custom_arena(
            10,
            10,
            3,
            vec![
                agent_settings(Direction::Right, -1, 0),
                agent_settings(Direction::Left, 1, 0),
            ],
        );
        let mut rng = SessionRng::new(3);
        arena.place_apple(cell(0, 0)).unwrap();

        let events = arena.tick(&[], &mut rng);
        let reasons: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ArenaEvent::Eliminated { agent, reason, .. } => Some((*agent, *reason)),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                (AgentId::new(1), DeathReason::OtherSnakeCollision),
                (AgentId::new(2), DeathReason::OtherSnakeCollision),
            ]
        );

        let Some(ArenaEvent::RoundOver(summary)) = events.last() else {
            panic!("expected round over, got {:?}", events);
        };
        assert_eq!(summary.winner, None);
        assert_eq!(summary.standings[0].eliminated_at_tick, summary.standings[1].eliminated_at_tick);
        assert_partition(&arena);
    }

    #[test]
    fn test_head_swap_eliminates_both() {
        let mut arena = custom_arena(
            10,
            10,
            2,
            vec![
                agent_settings(Direction::Right, 0, 0),
                agent_settings(Direction::Left, 1, 0),
            ],
        );
        let mut rng = SessionRng::new(3);
        arena.place_apple(cell(0, 0)).unwrap();

        let events = arena.tick(&[], &mut rng);
        let eliminated = events
            .iter()
            .filter(|e| matches!(e, ArenaEvent::Eliminated { .. }))
            .count();
        assert_eq!(eliminated, 2);
    }

    #[test]
    fn test_head_swap_of_single_cell_snakes_survives() {
        let mut arena = custom_arena(
            10,
            10,
            1,
            vec![
                agent_settings(Direction::Right, 0, 0),
                agent_settings(Direction::Left, 1, 0),
            ],
        );
        let mut rng = SessionRng::new(3);
        arena.place_apple(cell(0, 0)).unwrap();

        let events = arena.tick(&[], &mut rng);
        assert!(events.iter().all(|e| matches!(e, ArenaEvent::Moved { .. })));
        assert_eq!(arena.live_count(), 2);
        assert_eq!(arena.agent(AgentId::new(1)).unwrap().head().cell, cell(6, 5));
        assert_eq!(arena.agent(AgentId::new(2)).unwrap().head().cell, cell(5, 5));
        assert_partition(&arena);
    }

    #[test]
    fn test_stepping_into_vacating_tail_of_other_agent() {
        let mut arena = custom_arena(
            10,
            10,
            3,
            vec![
                agent_settings(Direction::Left, 0, 0),
                agent_settings(Direction::Up, 2, -1),
            ],
        );
        let mut rng = SessionRng::new(4);
        arena.place_apple(cell(0, 0)).unwrap();
        assert_eq!(arena.agent(AgentId::new(1)).unwrap().tail().cell, cell(7, 5));
        assert_eq!(arena.agent(AgentId::new(2)).unwrap().head().cell, cell(7, 4));

        let events = arena.tick(&[], &mut rng);
        assert!(events.iter().all(|e| matches!(e, ArenaEvent::Moved { .. })));
        assert_eq!(arena.agent(AgentId::new(2)).unwrap().head().cell, cell(7, 5));
        assert_partition(&arena);
    }

    #[test]
    fn test_last_survivor_wins() {
        let mut settings = ArenaSettings::with_agent_count(10, 10, 2, 2);
        settings.agents[1].heading = Direction::Right;
        settings.agents[1].column_offset = 0;
        let mut arena = Arena::new(&settings).unwrap();
        let mut rng = SessionRng::new(8);
        arena.place_apple(cell(0, 0)).unwrap();

        let mut summary = None;
        for _ in 0..20 {
            for event in arena.tick(&[], &mut rng) {
                if let ArenaEvent::RoundOver(s) = event {
                    summary = Some(s);
                }
            }
        }

        let summary = summary.unwrap();
        assert_eq!(summary.standings.len(), 2);
        assert_eq!(summary.standings[0].ordinal, 2);
        assert_eq!(summary.standings[1].ordinal, 1);
        assert_eq!(summary.winner, Some(summary.standings[0].agent));
    }

    #[test]
    fn test_board_full_when_last_cell_is_consumed() {
        let mut arena = custom_arena(1, 3, 2, vec![agent_settings(Direction::Left, 0, 0)]);
        let mut rng = SessionRng::new(11);

        assert_eq!(arena.spawn_apple(&mut rng), Some(ArenaEvent::ApplePlaced { cell: cell(0, 0) }));
        assert!(arena.free_cells().is_empty());
        assert_partition(&arena);

        let events = arena.tick(&[], &mut rng);
        assert!(events.contains(&ArenaEvent::BoardFull));
        assert!(arena.is_board_full());
        assert_eq!(arena.apple(), None);
        assert_eq!(arena.agent(AgentId::new(1)).unwrap().len(), 3);
        assert_partition(&arena);

        assert_eq!(arena.spawn_apple(&mut rng), None);

        let events = arena.tick(&[], &mut rng);
        assert!(matches!(events.last(), Some(ArenaEvent::RoundOver(_))));
    }

    #[test]
    fn test_place_apple_on_occupied_cell_fails() {
        let mut arena = custom_arena(10, 10, 3, vec![agent_settings(Direction::Left, 0, 0)]);
        assert_eq!(arena.place_apple(cell(6, 5)), Err(ArenaError::CellUnavailable(cell(6, 5))));
        arena.place_apple(cell(1, 1)).unwrap();
        arena.place_apple(cell(2, 2)).unwrap();
        assert!(arena.free_cells().contains(&cell(1, 1)));
        assert_partition(&arena);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut arena = Arena::new(&ArenaSettings::with_agent_count(12, 12, 3, 4)).unwrap();
        let mut rng = SessionRng::new(2024);
        let mut input_rng = SessionRng::new(77);
        arena.spawn_apple(&mut rng);

        let mut lengths: HashMap<AgentId, usize> =
            arena.live_agents().map(|s| (s.id, s.len())).collect();

        for _ in 0..300 {
            let mut inputs = Vec::new();
            for snake in arena.live_agents() {
                if input_rng.random_range(0..3) == 0 {
                    let heading = Direction::ALL[input_rng.random_range(0..4usize)];
                    inputs.push(DirectionRequest::new(snake.id, heading));
                }
            }
            let events = arena.tick(&inputs, &mut rng);
            assert_partition(&arena);

            for event in &events {
                match event {
                    ArenaEvent::Moved { agent, grew, .. } => {
                        let expected = lengths[agent] + usize::from(*grew);
                        assert_eq!(arena.agent(*agent).unwrap().len(), expected);
                        lengths.insert(*agent, expected);
                    }
                    ArenaEvent::Eliminated { agent, .. } => {
                        assert!(arena.agent(*agent).is_none());
                        lengths.remove(agent);
                    }
                    _ => {}
                }
            }
            if arena.is_round_over() {
                break;
            }
        }
    }
}
