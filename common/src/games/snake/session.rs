use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::log;
use crate::games::{ArenaBroadcaster, SessionRng};
use super::arena::Arena;
use super::events::{ArenaEvent, DirectionRequest, RoundSummary};

/// Fixed-period clock for one round.
pub struct ArenaSession;

impl ArenaSession {
    /// Places the first apple, then ticks `arena` every `tick_interval` until the round
    /// is over. Requests queued on `input_rx` between two ticks are handed to the next
    /// tick in arrival order.
    pub async fn run(
        mut arena: Arena,
        mut rng: SessionRng,
        tick_interval: Duration,
        input_rx: &mut mpsc::UnboundedReceiver<DirectionRequest>,
        broadcaster: impl ArenaBroadcaster,
    ) -> RoundSummary {
        log!(
            "Round starting: {} agents on {}x{}, seed {}, tick {:?}",
            arena.live_count(),
            arena.bounds().cols,
            arena.bounds().rows,
            rng.seed(),
            tick_interval
        );

        if let Some(event) = arena.spawn_apple(&mut rng) {
            broadcaster.broadcast_events(0, vec![event]).await;
        }

        let mut tick_interval_timer = interval(tick_interval);
        tick_interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tick_interval_timer.tick().await;

        loop {
            tick_interval_timer.tick().await;

            let mut inputs = Vec::new();
            while let Ok(request) = input_rx.try_recv() {
                inputs.push(request);
            }

            let events = arena.tick(&inputs, &mut rng);
            let summary = events.iter().find_map(|event| match event {
                ArenaEvent::RoundOver(summary) => Some(summary.clone()),
                _ => None,
            });

            broadcaster.broadcast_events(arena.tick_count(), events).await;

            if let Some(summary) = summary {
                broadcaster.broadcast_round_over(summary.clone()).await;
                return summary;
            }

            if arena.tick_count() % 100 == 0 {
                log!("Tick {}: {} agents alive", arena.tick_count(), arena.live_count());
            }
        }
    }
}
