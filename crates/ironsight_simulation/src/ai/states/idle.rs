//! Idle: стоим на месте idle_delay секунд, потом next (обычно Patrol).
//!
//! Idle сам сенсоры не опрашивает: выход в Chase делает агент по
//! TargetAcquired.

use crate::ai::fsm::State;
use crate::ai::{AgentContext, StateId};
use crate::logger;

use super::play_cue;

#[derive(Debug, Clone, Default)]
pub struct IdleState {
    next: Option<StateId>,
    elapsed: f32,
    /// Переход уже запрошен в этом entry (ровно один switch на вход)
    finished: bool,
}

impl IdleState {
    pub fn next_state(&self) -> Option<StateId> {
        self.next
    }

    pub fn set_next_state(&mut self, next: Option<StateId>) {
        self.next = next;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl<C: AgentContext + ?Sized> State<C> for IdleState {
    fn enter(&mut self, ctx: &mut C) {
        self.elapsed = 0.0;
        self.finished = false;

        let nav = ctx.navigation();
        nav.stop();
        nav.reset_path();

        let cue = ctx.config().animations.idle.clone();
        play_cue(ctx, &cue, 0.5);
    }

    fn tick(&mut self, ctx: &mut C) {
        if self.finished {
            return;
        }

        self.elapsed += ctx.delta_secs();
        if self.elapsed < ctx.config().idle_delay {
            return;
        }

        self.finished = true;
        match self.next {
            Some(next) => ctx.switch_state(next),
            None => logger::log_warning("⚠️ Idle: next state not wired, staying idle"),
        }
    }
}
