use super::*;
use crate::{build_hand, pick_problem, points_for};

impl<S: SessionStore> RoundEngine<S> {
    pub(super) fn setup_round(&mut self) {
        self.phase = Phase::Setup;
        self.cancel_pending();
        self.last_judgment = None;
        self.render.push(RenderCommand::ClearRoundPanel);
        if let Err(err) = self.config.validate() {
            self.halt(err.into());
            return;
        }

        let hand = match build_hand(&self.catalog, self.config.hand_size, &mut self.rng) {
            Ok(hand) => hand,
            Err(err) => {
                self.halt(err.into());
                return;
            }
        };
        let problem = pick_problem(hand.correct(), &self.catalog);
        tracing::debug!(
            round = self.state.rounds_played_in_session + 1,
            answer = %hand.correct().variant_id,
            problem = %problem.source.variant_id,
            "round set up"
        );

        self.state.correct_index = hand.correct_index();
        self.state.remaining_time = self.config.time_limit;
        self.render.push(RenderCommand::ShowHand {
            slots: hand.cards().to_vec(),
        });
        self.render.push(RenderCommand::ShowProblem(problem.clone()));
        self.hand = Some(hand);
        self.problem = Some(problem);
        self.halted = None;

        self.timer.start(self.config.time_limit);
        self.refresh_timer_text();
        self.phase = Phase::AwaitingInput;
    }

    pub(super) fn select(&mut self, slot: usize) {
        let in_range = self
            .hand
            .as_ref()
            .map(|hand| slot < hand.len())
            .unwrap_or(false);
        if !in_range {
            tracing::trace!(slot, "selection outside the hand ignored");
            return;
        }
        self.timer.cancel();
        self.state.remaining_time = self.timer.remaining();
        self.shown_seconds = None;
        self.render.push(RenderCommand::HideTimer);
        self.judge(slot == self.state.correct_index, false);
    }

    pub(super) fn judge(&mut self, correct: bool, timed_out: bool) {
        self.phase = Phase::Judging;
        let awarded = if correct {
            self.state.combo_count += 1;
            let points = points_for(self.state.combo_count, &self.config);
            self.state.current_score += points;
            if let Some(answer) = self.hand.as_ref().map(|hand| hand.correct().variant_id.clone())
            {
                self.session.mark_correct(&answer);
            }
            points
        } else {
            self.state.combo_count = 0;
            0
        };

        let judgment = Judgment {
            correct,
            timed_out,
            awarded,
            combo: self.state.combo_count,
        };
        tracing::debug!(
            correct,
            timed_out,
            awarded,
            score = self.state.current_score,
            "answer judged"
        );
        self.last_judgment = Some(judgment);
        self.render.push(RenderCommand::ShowJudgment(judgment));
        self.deferred = Some(Delay::new(self.config.judgment_delay, Deferred::RoundEnd));
    }

    pub(super) fn finish_round(&mut self) {
        self.phase = Phase::RoundEnd;
        self.state.rounds_played_in_session += 1;
        if self.state.rounds_played_in_session < self.config.session_rounds {
            self.render.push(RenderCommand::ShowRoundSummary {
                round: self.state.rounds_played_in_session,
                rounds: self.config.session_rounds,
                score: self.state.current_score,
                combo: self.state.combo_count,
            });
            self.setup_round();
            return;
        }

        let final_score = self.state.current_score;
        let high_score = self.session.high_score();
        let beaten = self.session.submit_final_score(final_score);
        let summary = SessionSummary {
            final_score,
            high_score,
            beaten,
        };
        tracing::info!(final_score, high_score, beaten, "session finished");
        self.state.rounds_played_in_session = 0;
        self.hand = None;
        self.problem = None;
        self.render
            .push(RenderCommand::ShowSessionSummary(summary.clone()));
        self.last_summary = Some(summary);
        self.phase = Phase::SessionEnd;
    }

    pub(super) fn continue_session(&mut self) {
        self.state.reset_session();
        self.last_summary = None;
        self.setup_round();
    }

    pub(super) fn quit(&mut self) {
        tracing::info!("quit requested");
        self.cancel_pending();
        self.render.push(RenderCommand::Quit);
        self.phase = Phase::Terminated;
    }
}
