//! Die: terminal state. Стоп, анимация смерти, деактивация через delay.

use crate::ai::fsm::State;
use crate::ai::AgentContext;

use super::play_cue;

#[derive(Debug, Clone, Default)]
pub struct DieState;

impl<C: AgentContext + ?Sized> State<C> for DieState {
    fn enter(&mut self, ctx: &mut C) {
        let nav = ctx.navigation();
        nav.stop();
        nav.reset_path();

        let cue = ctx.config().animations.die.clone();
        play_cue(ctx, &cue, 0.1);

        let delay = ctx.config().deactivate_delay;
        ctx.schedule_deactivation(delay);
    }

    fn tick(&mut self, _ctx: &mut C) {}

    /// Только для reuse из пула (обычный агент из Die не выходит)
    fn exit(&mut self, ctx: &mut C) {
        ctx.navigation().resume();
    }
}
