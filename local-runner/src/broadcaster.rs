use snake_arena::log;
use snake_arena::games::ArenaBroadcaster;
use snake_arena::games::snake::{ArenaEvent, RoundSummary};

/// Host for a terminal session: turns arena events into log lines.
#[derive(Clone)]
pub struct LogBroadcaster {
    round: u32,
}

impl LogBroadcaster {
    pub fn new(round: u32) -> Self {
        Self { round }
    }
}

impl ArenaBroadcaster for LogBroadcaster {
    async fn broadcast_events(&self, tick: u64, events: Vec<ArenaEvent>) {
        for event in events {
            match event {
                ArenaEvent::Moved { agent, new_head, grew: true, .. } => {
                    log!("[round {}][tick {}] {} ate the apple at {}", self.round, tick, agent, new_head);
                }
                ArenaEvent::Moved { .. } => {}
                ArenaEvent::Eliminated { agent, ordinal, reason } => {
                    log!("[round {}][tick {}] {} lost! (#{} out, {:?})", self.round, tick, agent, ordinal, reason);
                }
                ArenaEvent::ApplePlaced { cell } => {
                    log!("[round {}][tick {}] Apple at {}", self.round, tick, cell);
                }
                ArenaEvent::BoardFull => {
                    log!("[round {}][tick {}] Board is full. Game over!", self.round, tick);
                }
                ArenaEvent::RoundOver(_) => {}
            }
        }
    }

    async fn broadcast_round_over(&self, summary: RoundSummary) {
        log!("[round {}] Game over after {} ticks", self.round, summary.ticks);
        for (place, standing) in summary.standings.iter().enumerate() {
            log!(
                "[round {}]   {}. {} ({}) length {}, apples {}, out at tick {} ({:?})",
                self.round,
                place + 1,
                standing.label,
                standing.color,
                standing.length,
                standing.apples_eaten,
                standing.eliminated_at_tick,
                standing.reason
            );
        }
        match summary.winner {
            Some(winner) => log!("[round {}] Winner: {}", self.round, winner),
            None => log!("[round {}] No winner", self.round),
        }
    }
}
