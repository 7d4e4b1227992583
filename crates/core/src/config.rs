use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("hand_size must be at least 1")]
    HandSize,
    #[error("session_rounds must be at least 1")]
    SessionRounds,
    #[error("time_limit must be positive, got {0}")]
    TimeLimit(f32),
    #[error("judgment_delay must not be negative, got {0}")]
    JudgmentDelay(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    pub hand_size: usize,
    pub session_rounds: u32,
    /// Seconds per round.
    pub time_limit: f32,
    /// Seconds the judgment stays on screen before the round ends.
    pub judgment_delay: f32,
    pub base_points: i64,
    pub combo_bonus: i64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            hand_size: 4,
            session_rounds: 10,
            time_limit: 10.0,
            judgment_delay: 2.0,
            base_points: 1000,
            combo_bonus: 500,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_size == 0 {
            return Err(ConfigError::HandSize);
        }
        if self.session_rounds == 0 {
            return Err(ConfigError::SessionRounds);
        }
        if !(self.time_limit.is_finite() && self.time_limit > 0.0) {
            return Err(ConfigError::TimeLimit(self.time_limit));
        }
        if !(self.judgment_delay.is_finite() && self.judgment_delay >= 0.0) {
            return Err(ConfigError::JudgmentDelay(self.judgment_delay));
        }
        Ok(())
    }
}
