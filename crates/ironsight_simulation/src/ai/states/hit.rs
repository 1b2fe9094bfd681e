//! Hit: короткий stagger после урона, потом revert в state до удара.

use crate::ai::fsm::State;
use crate::ai::{AgentContext, AgentHost};

use super::play_cue;

#[derive(Debug, Clone, Default)]
pub struct HitState {
    remaining: f32,
    /// Длительность для следующего входа (0 = hit_recovery из config)
    recovery_override: f32,
    /// Revert уже запрошен в этом entry
    reverted: bool,
}

impl HitState {
    /// Длительность stagger'а для следующего (или текущего, см. restart) входа
    pub fn set_recovery(&mut self, seconds: f32) {
        self.recovery_override = seconds.max(0.0);
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Повторный удар во время stagger'а: таймер заново, без re-enter
    pub fn restart<C: AgentHost + ?Sized>(&mut self, ctx: &C) {
        self.remaining = self.recovery_duration(&*ctx);
        self.reverted = false;
    }

    fn recovery_duration<C: AgentHost + ?Sized>(&mut self, ctx: &C) -> f32 {
        let override_secs = std::mem::take(&mut self.recovery_override);
        if override_secs > 0.0 {
            override_secs
        } else {
            ctx.config().hit_recovery
        }
    }
}

impl<C: AgentContext + ?Sized> State<C> for HitState {
    fn enter(&mut self, ctx: &mut C) {
        let nav = ctx.navigation();
        nav.stop();
        nav.reset_path();

        let cue = ctx.config().animations.hit.clone();
        play_cue(ctx, &cue, 0.1);

        self.remaining = self.recovery_duration(&*ctx);
        self.reverted = false;
    }

    fn tick(&mut self, ctx: &mut C) {
        if self.reverted {
            return;
        }

        self.remaining -= ctx.delta_secs();
        if self.remaining <= 0.0 {
            self.reverted = true;
            ctx.revert_to_previous_state();
        }
    }

    fn exit(&mut self, ctx: &mut C) {
        ctx.navigation().resume();
    }
}
