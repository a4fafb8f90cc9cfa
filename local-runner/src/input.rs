use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use snake_arena::{log, AgentId};
use snake_arena::games::snake::{Direction, DirectionRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub up: char,
    pub down: char,
    pub left: char,
    pub right: char,
}

impl KeySet {
    pub fn new(up: char, down: char, left: char, right: char) -> Self {
        Self { up, down, left, right }
    }

    pub fn keys(&self) -> [char; 4] {
        [self.up, self.down, self.left, self.right]
    }

    pub fn direction_for(&self, key: char) -> Option<Direction> {
        let key = key.to_ascii_lowercase();
        if key == self.up {
            Some(Direction::Up)
        } else if key == self.down {
            Some(Direction::Down)
        } else if key == self.left {
            Some(Direction::Left)
        } else if key == self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

pub fn default_key_sets() -> Vec<KeySet> {
    vec![
        KeySet::new('w', 's', 'a', 'd'),
        KeySet::new('i', 'k', 'j', 'l'),
        KeySet::new('t', 'g', 'f', 'h'),
        KeySet::new('8', '5', '4', '6'),
    ]
}

/// Every character is one key press; the n-th key set steers agent n.
pub fn parse_line(key_sets: &[KeySet], line: &str) -> Vec<DirectionRequest> {
    line.chars()
        .filter_map(|key| {
            key_sets.iter().enumerate().find_map(|(index, key_set)| {
                key_set
                    .direction_for(key)
                    .map(|heading| DirectionRequest::new(AgentId::from_index(index), heading))
            })
        })
        .collect()
}

pub fn spawn_stdin_reader(
    key_sets: Vec<KeySet>,
    input_tx: mpsc::UnboundedSender<DirectionRequest>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    for request in parse_line(&key_sets, &line) {
                        if input_tx.send(request).is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => {
                    log!("Input closed, snakes keep their current heading");
                    return;
                }
                Err(e) => {
                    log!("Failed to read input: {}", e);
                    return;
                }
            }
        }
    })
}
