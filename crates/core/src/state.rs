use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Setup,
    AwaitingInput,
    Paused,
    Judging,
    RoundEnd,
    SessionEnd,
    DebugBrowse,
    /// A data or configuration error stopped setup.
    Halted,
    Terminated,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::AwaitingInput => "playing",
            Phase::Paused => "paused",
            Phase::Judging => "judging",
            Phase::RoundEnd => "round end",
            Phase::SessionEnd => "session end",
            Phase::DebugBrowse => "debug",
            Phase::Halted => "halted",
            Phase::Terminated => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RoundState {
    pub correct_index: usize,
    pub remaining_time: f32,
    pub combo_count: u32,
    pub current_score: i64,
    pub rounds_played_in_session: u32,
}

impl RoundState {
    pub fn reset_session(&mut self) {
        self.current_score = 0;
        self.combo_count = 0;
        self.rounds_played_in_session = 0;
    }
}
