//! Behavior states врага: Idle, Patrol, Chase, Attack, Hit, Die
//!
//! Переходы по "next" (wired один раз при создании агента):
//! - Idle → Patrol → Idle (цикл патруля)
//! - Chase → Attack → Chase (преследование / атака)
//!
//! Hit и Die никуда не wired: в них попадают только по внешним триггерам
//! (урон / смерть), Hit возвращается через revert.

use bevy::prelude::*;

use crate::ai::fsm::{State, StateSet};
use crate::ai::{AgentContext, WiringError};

pub mod attack;
pub mod chase;
pub mod die;
pub mod hit;
pub mod idle;
pub mod patrol;

pub use attack::AttackState;
pub use chase::ChaseState;
pub use die::DieState;
pub use hit::HitState;
pub use idle::IdleState;
pub use patrol::PatrolState;

/// Ключ state'а (enum-dispatch по фиксированному набору)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StateId {
    Idle,
    Patrol,
    Chase,
    Attack,
    Hit,
    Die,
}

impl StateId {
    /// States, в которые попадают только по внешнему триггеру
    pub fn is_externally_triggered(&self) -> bool {
        matches!(self, StateId::Hit | StateId::Die)
    }
}

/// Next-state цепочка агента
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    pub idle_next: Option<StateId>,
    pub patrol_next: Option<StateId>,
    pub chase_next: Option<StateId>,
    pub attack_next: Option<StateId>,
}

impl Default for Wiring {
    fn default() -> Self {
        Self {
            idle_next: Some(StateId::Patrol),
            patrol_next: Some(StateId::Idle),
            chase_next: Some(StateId::Attack),
            attack_next: Some(StateId::Chase),
        }
    }
}

impl Wiring {
    /// Дефект wiring'а = ошибка на старте (не тихий no-op в рантайме)
    pub fn validate(&self) -> Result<(), WiringError> {
        let links = [
            (StateId::Idle, self.idle_next),
            (StateId::Patrol, self.patrol_next),
            (StateId::Chase, self.chase_next),
            (StateId::Attack, self.attack_next),
        ];

        for (from, next) in links {
            let Some(to) = next else {
                return Err(WiringError::MissingNext(from));
            };
            if to == from {
                return Err(WiringError::SelfLoop(from));
            }
            if to.is_externally_triggered() {
                return Err(WiringError::ExternalTarget { from, to });
            }
        }

        Ok(())
    }
}

/// Все state instances одного агента (не shared между агентами)
#[derive(Debug, Clone, Default)]
pub struct Behaviors {
    pub idle: IdleState,
    pub patrol: PatrolState,
    pub chase: ChaseState,
    pub attack: AttackState,
    pub hit: HitState,
    pub die: DieState,
}

impl Behaviors {
    pub fn wired(wiring: &Wiring) -> Self {
        let mut behaviors = Self::default();
        behaviors.idle.set_next_state(wiring.idle_next);
        behaviors.patrol.set_next_state(wiring.patrol_next);
        behaviors.chase.set_next_state(wiring.chase_next);
        behaviors.attack.set_next_state(wiring.attack_next);
        behaviors
    }
}

impl<C: AgentContext + ?Sized> StateSet<StateId, C> for Behaviors {
    fn state_mut(&mut self, key: StateId) -> &mut dyn State<C> {
        match key {
            StateId::Idle => &mut self.idle,
            StateId::Patrol => &mut self.patrol,
            StateId::Chase => &mut self.chase,
            StateId::Attack => &mut self.attack,
            StateId::Hit => &mut self.hit,
            StateId::Die => &mut self.die,
        }
    }
}

/// Проиграть cue если имя задано (пустое имя = у модели нет такой анимации)
pub(crate) fn play_cue<C: AgentContext + ?Sized>(ctx: &mut C, name: &str, blend_time: f32) {
    if !name.is_empty() {
        ctx.animator().play_cue(name, blend_time);
    }
}
