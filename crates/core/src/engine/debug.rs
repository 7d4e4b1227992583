use super::*;
use crate::pick_problem;

impl<S: SessionStore> RoundEngine<S> {
    pub(super) fn enter_debug(&mut self) {
        if self.catalog.is_empty() {
            tracing::trace!("debug browse needs a non-empty catalog");
            return;
        }
        tracing::debug!(from = ?self.phase, "entering debug browse");
        self.cancel_pending();
        self.debug_entered_from = self.phase;
        self.debug_index = self.debug_index.min(self.catalog.len() - 1);
        self.render.push(RenderCommand::HideRoundUi);
        self.phase = Phase::DebugBrowse;
        self.show_debug_card();
    }

    pub(super) fn exit_debug(&mut self) {
        tracing::debug!("leaving debug browse");
        if self.debug_entered_from == Phase::SessionEnd {
            // A finished session restarts from zero.
            self.state.reset_session();
            self.last_summary = None;
        }
        self.setup_round();
    }

    pub(super) fn step_debug(&mut self, forward: bool) {
        let total = self.catalog.len();
        if total == 0 {
            return;
        }
        self.debug_index = if forward {
            (self.debug_index + 1) % total
        } else {
            (self.debug_index + total - 1) % total
        };
        self.show_debug_card();
    }

    fn show_debug_card(&mut self) {
        let Some(record) = self.catalog.get(self.debug_index) else {
            return;
        };
        let problem = pick_problem(record, &self.catalog);
        self.render.push(RenderCommand::ShowDebugCard {
            index: self.debug_index,
            total: self.catalog.len(),
            problem,
        });
    }
}
