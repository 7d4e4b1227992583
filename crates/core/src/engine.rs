use crate::{
    Catalog, CatalogError, ConfigError, Delay, Hand, InputEvent, Judgment, Phase,
    ProblemPresentation, RenderCommand, RenderQueue, ResolveError, RngState, RoundConfig,
    RoundState, RoundTimer, Session, SessionStore, SessionSummary, TimerSignal,
};
use thiserror::Error;

mod debug;
mod pause;
mod round;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid round config: {0}")]
    Config(#[from] ConfigError),
}

/// Pending transition scheduled by the judgment delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    RoundEnd,
}

/// Single-player round state machine. Fed by `handle` and `tick`, it emits
/// render commands the host drains after each call.
#[derive(Debug)]
pub struct RoundEngine<S> {
    config: RoundConfig,
    catalog: Catalog,
    rng: RngState,
    session: Session<S>,
    state: RoundState,
    phase: Phase,
    timer: RoundTimer,
    deferred: Option<Delay<Deferred>>,
    shown_seconds: Option<u32>,
    hand: Option<Hand>,
    problem: Option<ProblemPresentation>,
    last_judgment: Option<Judgment>,
    last_summary: Option<SessionSummary>,
    debug_index: usize,
    debug_entered_from: Phase,
    halted: Option<EngineError>,
    render: RenderQueue,
}

impl<S: SessionStore> RoundEngine<S> {
    pub fn new(config: RoundConfig, catalog: Catalog, session: Session<S>, seed: u64) -> Self {
        Self {
            config,
            catalog,
            rng: RngState::from_seed(seed),
            session,
            state: RoundState::default(),
            phase: Phase::Setup,
            timer: RoundTimer::new(),
            deferred: None,
            shown_seconds: None,
            hand: None,
            problem: None,
            last_judgment: None,
            last_summary: None,
            debug_index: 0,
            debug_entered_from: Phase::Setup,
            halted: None,
            render: RenderQueue::default(),
        }
    }

    /// Starts a fresh session and sets up its first round.
    pub fn start(&mut self) {
        self.state.reset_session();
        self.setup_round();
    }

    pub fn handle(&mut self, input: InputEvent) {
        match (self.phase, input) {
            (Phase::Terminated, _) => {}
            (Phase::AwaitingInput, InputEvent::SelectSlot(slot)) => self.select(slot),
            (Phase::AwaitingInput, InputEvent::TogglePause) => self.pause(),
            (Phase::Paused, InputEvent::TogglePause | InputEvent::Resume) => self.resume(),
            (Phase::SessionEnd, InputEvent::Continue) => self.continue_session(),
            (Phase::SessionEnd | Phase::Paused | Phase::Halted, InputEvent::Quit) => self.quit(),
            (Phase::DebugBrowse, InputEvent::DebugToggle) => self.exit_debug(),
            (Phase::DebugBrowse, InputEvent::DebugNext) => self.step_debug(true),
            (Phase::DebugBrowse, InputEvent::DebugPrev) => self.step_debug(false),
            (phase, InputEvent::DebugToggle) if phase != Phase::Judging => self.enter_debug(),
            (phase, input) => {
                tracing::trace!(?phase, ?input, "input ignored in current phase");
            }
        }
    }

    /// Advances the countdown and any deferred transition by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        match self.phase {
            Phase::AwaitingInput => {
                let signal = self.timer.tick(delta);
                self.state.remaining_time = self.timer.remaining();
                if signal == TimerSignal::TimeUp {
                    self.render.push(RenderCommand::HideTimer);
                    self.shown_seconds = None;
                    self.judge(false, true);
                } else {
                    self.refresh_timer_text();
                }
            }
            Phase::Judging => {
                let fired = self
                    .deferred
                    .as_mut()
                    .and_then(|delay| delay.tick(delta));
                if fired == Some(Deferred::RoundEnd) {
                    self.deferred = None;
                    self.finish_round();
                }
            }
            _ => {}
        }
    }

    pub fn drain_render(&mut self) -> Vec<RenderCommand> {
        self.render.drain().collect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn problem(&self) -> Option<&ProblemPresentation> {
        self.problem.as_ref()
    }

    pub fn last_judgment(&self) -> Option<&Judgment> {
        self.last_judgment.as_ref()
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn halted_reason(&self) -> Option<&EngineError> {
        self.halted.as_ref()
    }

    pub fn debug_index(&self) -> usize {
        self.debug_index
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn has_pending_round_end(&self) -> bool {
        self.deferred
            .as_ref()
            .map(|delay| delay.is_pending())
            .unwrap_or(false)
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    fn refresh_timer_text(&mut self) {
        let seconds = self.timer.display_seconds();
        if self.shown_seconds != Some(seconds) {
            self.shown_seconds = Some(seconds);
            self.render
                .push(RenderCommand::ShowTimer(self.timer.format_remaining()));
        }
    }

    fn cancel_pending(&mut self) {
        self.timer.cancel();
        if let Some(delay) = self.deferred.as_mut() {
            delay.cancel();
        }
        self.deferred = None;
        self.shown_seconds = None;
    }

    fn halt(&mut self, err: EngineError) {
        tracing::error!(error = %err, "round setup blocked");
        self.cancel_pending();
        self.hand = None;
        self.problem = None;
        self.render.push(RenderCommand::HideTimer);
        self.render.push(RenderCommand::ShowError(err.to_string()));
        self.halted = Some(err);
        self.phase = Phase::Halted;
    }
}
