//! Chase: преследование цели, дошли до дистанции атаки → next (Attack).
//!
//! Цель не найдена / убежала дальше lose distance → агенту уходит
//! notify_target_lost, и он сам решает куда переключиться (обычно Idle).
//! Chase при этом не переключается сам (notify-and-wait).

use bevy::prelude::*;

use crate::ai::fsm::State;
use crate::ai::{AgentContext, StateId};
use crate::logger;

use super::play_cue;

/// Допуск поверх stopping distance при проверке "дошли до цели"
const ARRIVAL_TOLERANCE: f32 = 0.28;

#[derive(Debug, Clone, Default)]
pub struct ChaseState {
    next: Option<StateId>,
    target: Option<Entity>,
}

impl ChaseState {
    pub fn next_state(&self) -> Option<StateId> {
        self.next
    }

    pub fn set_next_state(&mut self, next: Option<StateId>) {
        self.next = next;
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_target(&mut self, target: Entity) {
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }
}

impl<C: AgentContext + ?Sized> State<C> for ChaseState {
    fn enter(&mut self, ctx: &mut C) {
        let cue = ctx.config().animations.chase.clone();
        play_cue(ctx, &cue, 0.2);

        let speed = ctx.config().chase_speed;
        let stopping = ctx.config().chase_stopping_distance;
        let nav = ctx.navigation();
        nav.resume();
        nav.set_speed(speed);
        nav.set_stopping_distance(stopping);
    }

    fn tick(&mut self, ctx: &mut C) {
        let resolved = self
            .target
            .and_then(|target| ctx.resolve_target(target).map(|position| (target, position)));

        let Some((target, target_position)) = resolved else {
            // Цели нет или entity уже невалидна
            let lost = self.target.take();
            ctx.notify_target_lost(lost);
            return;
        };

        ctx.navigation().set_destination(target_position);
        let distance = ctx.position().distance(target_position);

        if distance > ctx.config().chase_lose_distance {
            logger::log(&format!(
                "🏃 Chase: target {:?} escaped ({:.1}m > {:.1}m)",
                target,
                distance,
                ctx.config().chase_lose_distance
            ));
            ctx.notify_target_lost(Some(target));
            self.target = None;
            return;
        }

        let nav = ctx.navigation();
        let in_range = !nav.is_path_pending() && distance <= nav.stopping_distance() + ARRIVAL_TOLERANCE;
        if in_range {
            match self.next {
                Some(next) => ctx.switch_state(next),
                None => logger::log_warning("⚠️ Chase: next state not wired"),
            }
        }
    }
}
