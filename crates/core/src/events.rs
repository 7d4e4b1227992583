use crate::{CardRecord, Judgment, ProblemPresentation};
use serde::{Deserialize, Serialize};

/// Player and host input consumed by the round engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputEvent {
    SelectSlot(usize),
    TogglePause,
    Resume,
    Continue,
    Quit,
    DebugToggle,
    DebugNext,
    DebugPrev,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub final_score: i64,
    pub high_score: i64,
    pub beaten: bool,
}

/// One-way output to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RenderCommand {
    ShowHand {
        slots: Vec<CardRecord>,
    },
    ShowProblem(ProblemPresentation),
    ShowTimer(String),
    HideTimer,
    ShowJudgment(Judgment),
    ClearRoundPanel,
    ShowRoundSummary {
        round: u32,
        rounds: u32,
        score: i64,
        combo: u32,
    },
    ShowSessionSummary(SessionSummary),
    ShowPauseOverlay,
    HidePauseOverlay,
    HideRoundUi,
    ShowDebugCard {
        index: usize,
        total: usize,
        problem: ProblemPresentation,
    },
    ShowError(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct RenderQueue {
    queue: Vec<RenderCommand>,
}

impl RenderQueue {
    pub fn push(&mut self, command: RenderCommand) {
        self.queue.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RenderCommand> + '_ {
        self.queue.drain(..)
    }
}
