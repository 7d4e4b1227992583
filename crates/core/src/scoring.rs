use crate::RoundConfig;
use serde::{Deserialize, Serialize};

/// Points for a correct answer given the combo count after the answer.
pub fn points_for(combo: u32, config: &RoundConfig) -> i64 {
    if combo > 1 {
        config.base_points + config.combo_bonus
    } else {
        config.base_points
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Judgment {
    pub correct: bool,
    pub timed_out: bool,
    pub awarded: i64,
    pub combo: u32,
}

impl Judgment {
    pub fn headline(&self) -> &'static str {
        match (self.correct, self.timed_out) {
            (true, _) => "Correct!",
            (false, true) => "Time up!",
            (false, false) => "Wrong!",
        }
    }
}
