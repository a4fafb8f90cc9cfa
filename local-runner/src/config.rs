use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use snake_arena::config::Validate;
use snake_arena::games::snake::ArenaSettings;

use crate::input::{default_key_sets, KeySet};

pub const CONFIG_FILE_NAME: &str = "snake_arena.yaml";

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct LocalConfig {
    pub arena: ArenaSettings,
    pub controls: Vec<KeySet>,
}

impl Validate for LocalConfig {
    fn validate(&self) -> Result<(), String> {
        self.arena.validate()?;

        if self.controls.len() < self.arena.agents.len() {
            return Err(format!(
                "{} agents need key sets but only {} are configured",
                self.arena.agents.len(),
                self.controls.len()
            ));
        }

        let mut seen = HashSet::new();
        for key in self.controls.iter().flat_map(|k| k.keys()) {
            if !seen.insert(key.to_ascii_lowercase()) {
                return Err(format!("Key '{}' is bound more than once", key));
            }
        }

        Ok(())
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            arena: ArenaSettings::default(),
            controls: default_key_sets(),
        }
    }
}
