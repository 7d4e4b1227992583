use super::*;

impl<S: SessionStore> RoundEngine<S> {
    pub(super) fn pause(&mut self) {
        if let Some(left) = self.timer.cancel() {
            self.state.remaining_time = left;
        }
        self.phase = Phase::Paused;
        self.render.push(RenderCommand::ShowPauseOverlay);
    }

    /// Restarts the countdown from where it stopped, not from the full limit.
    pub(super) fn resume(&mut self) {
        self.timer.start(self.state.remaining_time);
        self.shown_seconds = None;
        self.render.push(RenderCommand::HidePauseOverlay);
        self.refresh_timer_text();
        self.phase = Phase::AwaitingInput;
    }
}
