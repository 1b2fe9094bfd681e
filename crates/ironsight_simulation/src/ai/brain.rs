//! EnemyBrain: AI агрегат одного врага
//!
//! Владеет StateMachine + instances всех states + очередью запросов.
//! Окружение (ECS или test double) передаётся в каждый вызов как `AgentHost`,
//! поэтому brain не держит ссылок на другие компоненты.
//!
//! Все переходы исполняются синхронно: запросы states (switch/lost/revert)
//! разбираются сразу после вызова, который их породил.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::ai::fsm::StateMachine;
use crate::ai::states::{Behaviors, StateId, Wiring};
use crate::ai::{AgentHost, AgentRequest, Dispatch, WiringError};
use crate::logger;

/// Сколько запросов разбираем за один вызов (защита от циклов в wiring)
pub const MAX_REQUESTS_PER_CALL: usize = 32;

/// Внешний триггер для агента
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentSignal {
    /// Sensor засёк цель
    TargetAcquired(Entity),
    /// Цель умерла/исчезла (игнорируется если это не наша цель)
    TargetGone(Entity),
    /// Агент получил урон и выжил (stagger: 0 = hit_recovery из config)
    Damaged { stagger: f32 },
    /// Здоровье агента дошло до нуля
    Died,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    machine: StateMachine<StateId>,
    behaviors: Behaviors,
    requests: VecDeque<AgentRequest>,
    started: bool,
}

impl Default for EnemyBrain {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyBrain {
    /// Brain со стандартным wiring'ом (Idle ⇄ Patrol, Chase ⇄ Attack)
    pub fn new() -> Self {
        Self::from_behaviors(Behaviors::wired(&Wiring::default()))
    }

    pub fn with_wiring(wiring: Wiring) -> Result<Self, WiringError> {
        wiring.validate()?;
        Ok(Self::from_behaviors(Behaviors::wired(&wiring)))
    }

    fn from_behaviors(behaviors: Behaviors) -> Self {
        Self {
            machine: StateMachine::new(),
            behaviors,
            requests: VecDeque::new(),
            started: false,
        }
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.machine.current()
    }

    pub fn previous_state(&self) -> Option<StateId> {
        self.machine.previous()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_dead(&self) -> bool {
        self.machine.current() == Some(StateId::Die)
    }

    /// Текущая цель (Chase и Attack держат одну и ту же)
    pub fn target(&self) -> Option<Entity> {
        self.behaviors.chase.target().or(self.behaviors.attack.target())
    }

    pub fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }

    /// Первый переход в Idle (повторный вызов: no-op)
    pub fn start<H: AgentHost + ?Sized>(&mut self, host: &mut H) {
        if self.started {
            return;
        }
        self.started = true;
        self.switch(host, StateId::Idle);
    }

    /// Один кадр: tick текущего state + разбор его запросов
    pub fn tick<H: AgentHost + ?Sized>(&mut self, host: &mut H) {
        if !self.started {
            self.start(host);
        }

        let Self {
            machine,
            behaviors,
            requests,
            ..
        } = self;
        let mut ctx = Dispatch::new(host, requests);
        machine.tick(behaviors, &mut ctx);

        self.drain(host);
    }

    pub fn handle<H: AgentHost + ?Sized>(&mut self, host: &mut H, signal: AgentSignal) {
        if self.is_dead() {
            return;
        }
        if !self.started {
            self.start(host);
        }

        match signal {
            AgentSignal::TargetAcquired(target) => {
                self.behaviors.chase.set_target(target);
                self.behaviors.attack.set_target(target);
                logger::log_info(&format!("👁️ EnemyBrain: target {:?} acquired", target));
                self.switch(host, StateId::Chase);
            }
            AgentSignal::TargetGone(target) => {
                if self.target() != Some(target) {
                    return;
                }
                self.forget_target();
                // Stagger доигрывается, revert сам уйдёт из Chase/Attack без цели
                if self.current_state() != Some(StateId::Hit) {
                    self.switch(host, StateId::Idle);
                }
            }
            AgentSignal::Damaged { stagger } => {
                self.behaviors.hit.set_recovery(stagger);
                if self.current_state() == Some(StateId::Hit) {
                    self.behaviors.hit.restart(&*host);
                } else {
                    self.switch(host, StateId::Hit);
                }
            }
            AgentSignal::Died => {
                logger::log_info("💀 EnemyBrain: died");
                self.switch(host, StateId::Die);
            }
        }
    }

    fn forget_target(&mut self) {
        self.behaviors.chase.clear_target();
        self.behaviors.attack.clear_target();
    }

    fn switch<H: AgentHost + ?Sized>(&mut self, host: &mut H, next: StateId) {
        self.requests.push_back(AgentRequest::Switch(next));
        self.drain(host);
    }

    /// Разбор очереди запросов (каждый запрос может породить новые)
    fn drain<H: AgentHost + ?Sized>(&mut self, host: &mut H) {
        let mut processed = 0;

        while let Some(request) = self.requests.pop_front() {
            if processed == MAX_REQUESTS_PER_CALL {
                logger::log_warning(&format!(
                    "⚠️ EnemyBrain: more than {} transitions in one call, dropping {} (state wiring loop?)",
                    MAX_REQUESTS_PER_CALL,
                    self.requests.len() + 1
                ));
                self.requests.clear();
                return;
            }
            processed += 1;
            self.apply(host, request);
        }
    }

    fn apply<H: AgentHost + ?Sized>(&mut self, host: &mut H, request: AgentRequest) {
        // Die terminal: после смерти никакие запросы не исполняются
        if self.is_dead() {
            return;
        }

        let from = self.machine.current();
        let Self {
            machine,
            behaviors,
            requests,
            ..
        } = self;
        let mut ctx = Dispatch::new(host, requests);

        let changed = match request {
            AgentRequest::Switch(next) => machine.change_state(behaviors, &mut ctx, next),
            AgentRequest::TargetLost(_) => {
                behaviors.chase.clear_target();
                behaviors.attack.clear_target();
                machine.change_state(behaviors, &mut ctx, StateId::Idle)
            }
            AgentRequest::Revert => {
                machine.revert_to_previous(behaviors, &mut ctx)
                    || machine.change_state(behaviors, &mut ctx, StateId::Idle)
            }
        };

        if changed {
            logger::log(&format!(
                "🤖 EnemyBrain: {:?} → {:?} ({:?})",
                from,
                machine.current(),
                request
            ));
        }
    }
}
