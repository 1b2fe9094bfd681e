//! Attack: стоим, разворачиваемся к цели, бьём раз в attack_cooldown.
//!
//! Выходы (все через next, обычно Chase):
//! - цели нет / невалидна
//! - цель дальше lose distance (цель сбрасывается)
//! - цель вышла из attack range (цель сохраняется, Chase догоняет)

use bevy::prelude::*;

use crate::ai::fsm::State;
use crate::ai::{AgentContext, StateId};
use crate::logger;

use super::play_cue;

#[derive(Debug, Clone, Default)]
pub struct AttackState {
    next: Option<StateId>,
    target: Option<Entity>,
    cooldown: f32,
}

impl AttackState {
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

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    fn fall_back<C: AgentContext + ?Sized>(&self, ctx: &mut C) {
        match self.next {
            Some(next) => ctx.switch_state(next),
            None => logger::log_warning("⚠️ Attack: next state not wired"),
        }
    }
}

impl<C: AgentContext + ?Sized> State<C> for AttackState {
    fn enter(&mut self, ctx: &mut C) {
        self.cooldown = 0.0;

        let cue = ctx.config().animations.attack.clone();
        play_cue(ctx, &cue, 0.1);
        ctx.navigation().stop();
    }

    fn tick(&mut self, ctx: &mut C) {
        let resolved = self
            .target
            .and_then(|target| ctx.resolve_target(target).map(|position| (target, position)));

        let Some((target, target_position)) = resolved else {
            self.target = None;
            self.fall_back(ctx);
            return;
        };

        let offset = target_position - ctx.position();
        let distance = offset.length();

        if distance > ctx.config().chase_lose_distance {
            self.target = None;
            self.fall_back(ctx);
            return;
        }

        if distance > ctx.config().attack_range() {
            // Цель отошла: Chase догонит (target остаётся)
            self.fall_back(ctx);
            return;
        }

        let dt = ctx.delta_secs();
        let turn = ctx.config().turn_speed * dt;
        ctx.face_towards(offset, turn);

        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            let damage = ctx.config().attack_damage;
            let cue = ctx.config().animations.attack.clone();
            play_cue(ctx, &cue, 0.0);
            ctx.apply_damage(target, damage);
            self.cooldown = ctx.config().attack_cooldown;

            logger::log(&format!("⚔️ Attack: {:?} hit for {:.1}", target, damage));
        }
    }
}
