//! Patrol: идём к случайному waypoint'у, по прибытии → next (обычно Idle).

use crate::ai::fsm::State;
use crate::ai::{AgentContext, StateId};
use crate::logger;

use super::play_cue;

/// Сколько раз перевыбираем индекс, чтобы не повторить предыдущий waypoint
const REPICK_ATTEMPTS: usize = 5;

/// Допуск поверх stopping distance при проверке прибытия
const ARRIVAL_SLACK: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct PatrolState {
    next: Option<StateId>,
    /// Индекс последнего выбранного waypoint'а (переживает re-enter)
    last_index: Option<usize>,
}

impl PatrolState {
    pub fn next_state(&self) -> Option<StateId> {
        self.next
    }

    pub fn set_next_state(&mut self, next: Option<StateId>) {
        self.next = next;
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// Случайный waypoint, отличный от предыдущего (если waypoint'ов > 1)
    fn pick_waypoint<C: AgentContext + ?Sized>(&mut self, ctx: &mut C) {
        let count = ctx.waypoints().len();
        if count == 0 {
            return;
        }

        let mut index = ctx.random_index(count);
        if count > 1 {
            let mut attempts = 0;
            while Some(index) == self.last_index && attempts < REPICK_ATTEMPTS {
                index = ctx.random_index(count);
                attempts += 1;
            }
        }

        self.last_index = Some(index);
        let destination = ctx.waypoints()[index];
        ctx.navigation().set_destination(destination);
    }

    fn finish<C: AgentContext + ?Sized>(&self, ctx: &mut C) {
        match self.next {
            Some(next) => ctx.switch_state(next),
            None => logger::log_warning("⚠️ Patrol: next state not wired"),
        }
    }
}

impl<C: AgentContext + ?Sized> State<C> for PatrolState {
    fn enter(&mut self, ctx: &mut C) {
        let cue = ctx.config().animations.patrol.clone();
        play_cue(ctx, &cue, 0.5);

        let speed = ctx.config().patrol_speed;
        let stopping = ctx.config().patrol_stopping_distance;
        let nav = ctx.navigation();
        nav.resume();
        nav.set_speed(speed);
        nav.set_stopping_distance(stopping);

        self.pick_waypoint(ctx);
    }

    fn tick(&mut self, ctx: &mut C) {
        if ctx.waypoints().is_empty() {
            self.finish(ctx);
            return;
        }

        let nav = ctx.navigation();
        let arrived =
            !nav.is_path_pending() && nav.remaining_distance() <= nav.stopping_distance() + ARRIVAL_SLACK;
        let has_path = nav.has_path();

        if arrived {
            self.finish(ctx);
        } else if !has_path {
            self.pick_waypoint(ctx);
        }
    }

    fn exit(&mut self, ctx: &mut C) {
        ctx.navigation().stop();
    }
}
