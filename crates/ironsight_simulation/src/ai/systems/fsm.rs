//! AI FSM systems: индекс целей, drive агентов, реакции на Health.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::{AgentProfile, AgentSignal, EnemyBrain, TargetAcquired, Waypoints};
use crate::combat::{DamageRequest, DamageTaken, Dead, EntityDied};
use crate::components::{CueTrack, Health, NavAgent, Targetable};
use crate::DeterministicRng;

use super::host::{EcsHost, Outbox, TargetIndex};

/// Всё, что нужно для вызова brain'а одного врага
#[derive(QueryData)]
#[query_data(mutable)]
pub struct AgentQuery {
    pub entity: Entity,
    pub brain: &'static mut EnemyBrain,
    pub profile: &'static AgentProfile,
    pub nav: &'static mut NavAgent,
    pub cues: &'static mut CueTrack,
    pub transform: &'static mut Transform,
    pub waypoints: Option<&'static Waypoints>,
}

/// Общие для всех агентов данные кадра
struct Frame<'a> {
    delta: f32,
    rng: &'a mut ChaCha8Rng,
    targets: &'a TargetIndex,
}

/// Собрать EcsHost для агента, вызвать f, вернуть накопленные side effects
fn with_host<R>(
    agent: &mut AgentQueryItem<'_>,
    frame: &mut Frame<'_>,
    f: impl FnOnce(&mut EnemyBrain, &mut EcsHost<'_>) -> R,
) -> (R, Outbox) {
    let cue_requests = agent.cues.requests;

    let mut host = EcsHost {
        config: agent.profile.0.as_ref(),
        nav: &mut *agent.nav,
        // Changed<CueTrack> только при реальном новом cue
        cues: agent.cues.bypass_change_detection(),
        transform: &mut *agent.transform,
        waypoints: agent.waypoints.map(|w| w.0.as_slice()).unwrap_or(&[]),
        delta: frame.delta,
        rng: &mut *frame.rng,
        targets: frame.targets,
        outbox: Outbox::default(),
    };

    let result = f(&mut *agent.brain, &mut host);
    let outbox = host.into_outbox();

    if agent.cues.requests != cue_requests {
        agent.cues.set_changed();
    }

    (result, outbox)
}

/// Система: пересобрать TargetIndex (живые Targetable)
pub fn index_targets(
    mut index: ResMut<TargetIndex>,
    candidates: Query<(Entity, &Transform, &Targetable, Option<&Health>), Without<Dead>>,
) {
    index.clear();

    for (entity, transform, targetable, health) in candidates.iter() {
        if health.is_some_and(|health| health.is_dead()) {
            continue;
        }
        index.insert(entity, transform.translation, targetable.category);
    }
}

/// Система: один тик каждого агента
///
/// Порядок на агента: start (первый кадр) → TargetAcquired сигналы → tick.
pub fn drive_agents(
    mut commands: Commands,
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    targets: Res<TargetIndex>,
    mut acquisitions: EventReader<TargetAcquired>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut agents: Query<AgentQuery>,
) {
    let acquired: Vec<TargetAcquired> = acquisitions.read().copied().collect();
    let mut frame = Frame {
        delta: time.delta_secs(),
        rng: &mut rng.rng,
        targets: &targets,
    };

    for mut agent in agents.iter_mut() {
        let entity = agent.entity;

        let ((), outbox) = with_host(&mut agent, &mut frame, |brain, host| {
            brain.start(host);
            for event in acquired.iter().filter(|event| event.agent == entity) {
                brain.handle(host, AgentSignal::TargetAcquired(event.target));
            }
            brain.tick(host);
        });

        outbox.flush(entity, &mut commands, &mut damage_requests);
    }
}

/// Система: DamageTaken / EntityDied → сигналы агентам
///
/// - свой DamageTaken → Damaged (Hit)
/// - своя смерть → Died
/// - смерть чужой entity → TargetGone (brain сам проверит, его ли это цель)
pub fn react_to_health(
    mut commands: Commands,
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    targets: Res<TargetIndex>,
    mut damage_taken: EventReader<DamageTaken>,
    mut deaths: EventReader<EntityDied>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut agents: Query<AgentQuery>,
) {
    // (адресат, сигнал); None = всем агентам
    let mut signals: Vec<(Option<Entity>, AgentSignal)> = Vec::new();
    for event in damage_taken.read() {
        signals.push((
            Some(event.target),
            AgentSignal::Damaged {
                stagger: event.stagger,
            },
        ));
    }
    for event in deaths.read() {
        signals.push((Some(event.entity), AgentSignal::Died));
        signals.push((None, AgentSignal::TargetGone(event.entity)));
    }

    if signals.is_empty() {
        return;
    }

    let mut frame = Frame {
        delta: time.delta_secs(),
        rng: &mut rng.rng,
        targets: &targets,
    };

    for mut agent in agents.iter_mut() {
        let entity = agent.entity;
        let mut relevant = signals
            .iter()
            .filter(|(recipient, _)| recipient.is_none_or(|recipient| recipient == entity))
            .map(|(_, signal)| *signal)
            .peekable();

        if relevant.peek().is_none() {
            continue;
        }

        let ((), outbox) = with_host(&mut agent, &mut frame, |brain, host| {
            for signal in relevant {
                brain.handle(host, signal);
            }
        });

        outbox.flush(entity, &mut commands, &mut damage_requests);
    }
}
