//! Session configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! game = "territory"
//! ai_follows_player = true
//! autoplay_delay_ms = 250
//! max_iterations = 2000
//! max_time_secs = 0      # disabled
//!
//! [territory]
//! rows = 9
//! cols = 9
//!
//! [abduction]
//! card_set = "base"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::{AbductionSetup, GameKind, GameSetup, TerritorySetup};
use crate::mcts::{MctsConfig, SearchBudget};

/// Everything a session needs to start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Game created when the session starts.
    pub game: GameKind,

    /// Ask the oracle for a reply after every player move.
    pub ai_follows_player: bool,

    /// Pause between autoplay steps (milliseconds).
    pub autoplay_delay_ms: u64,

    /// Seed for dealing initial states.
    pub seed: u64,

    /// Raw search settings; non-positive values disable the limit.
    pub exploration_bias: f64,
    pub max_iterations: i64,
    pub max_time_secs: f64,

    pub territory: TerritorySetup,
    pub abduction: AbductionSetup,

    /// Knobs for the bundled oracle.
    pub mcts: MctsConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameKind::Grid,
            ai_follows_player: true,
            autoplay_delay_ms: 100,
            seed: 0,
            exploration_bias: 1.414,
            max_iterations: 1000,
            max_time_secs: 1.0,
            territory: TerritorySetup::default(),
            abduction: AbductionSetup::default(),
            mcts: MctsConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_game(mut self, game: GameKind) -> Self {
        self.game = game;
        self
    }

    pub fn with_ai_follows_player(mut self, enabled: bool) -> Self {
        self.ai_follows_player = enabled;
        self
    }

    pub fn with_autoplay_delay_ms(mut self, delay: u64) -> Self {
        self.autoplay_delay_ms = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the raw search settings.
    pub fn with_search(
        mut self,
        exploration_bias: f64,
        max_iterations: i64,
        max_time_secs: f64,
    ) -> Self {
        self.exploration_bias = exploration_bias;
        self.max_iterations = max_iterations;
        self.max_time_secs = max_time_secs;
        self
    }

    pub fn with_territory(mut self, territory: TerritorySetup) -> Self {
        self.territory = territory;
        self
    }

    pub fn with_abduction(mut self, abduction: AbductionSetup) -> Self {
        self.abduction = abduction;
        self
    }

    pub fn with_mcts(mut self, mcts: MctsConfig) -> Self {
        self.mcts = mcts;
        self
    }

    /// Search budget derived from the raw settings.
    #[must_use]
    pub fn budget(&self) -> SearchBudget {
        SearchBudget::from_settings(self.exploration_bias, self.max_iterations, self.max_time_secs)
    }

    /// Per-variant setup for the registry.
    #[must_use]
    pub fn setup(&self) -> GameSetup {
        GameSetup {
            territory: self.territory,
            abduction: self.abduction,
        }
    }

    #[must_use]
    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }
}
