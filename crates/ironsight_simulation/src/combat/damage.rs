//! Damage pipeline: DamageRequest → Health → HealthChanged/DamageTaken/EntityDied
//!
//! Урон между агентами: same-frame очередь: attacker пишет DamageRequest в
//! think-фазе, `apply_damage` разбирает её следующим шагом того же кадра.

use bevy::prelude::*;

use crate::components::Health;

/// Запрос урона (damage sink для AI и host'а: пули игрока, ловушки)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub source: Option<Entity>,
    /// Длительность stagger'а у цели (0 = hit_recovery из её config)
    pub stagger: f32,
}

impl DamageRequest {
    pub fn new(target: Entity, amount: f32) -> Self {
        Self {
            target,
            amount,
            source: None,
            stagger: 0.0,
        }
    }

    pub fn from_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_stagger(mut self, seconds: f32) -> Self {
        self.stagger = seconds;
        self
    }
}

/// Событие: значение Health изменилось (для UI / health bar)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub previous: f32,
    pub current: f32,
    pub max: f32,
}

/// Событие: урон применён, цель выжила (→ Hit у агентов)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageTaken {
    pub target: Entity,
    pub amount: f32,
    pub source: Option<Entity>,
    pub stagger: f32,
}

/// Событие: entity умерла (ровно один раз за жизнь)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертва (Health дошло до 0)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Компонент: деактивировать (despawn) entity через `remaining` секунд
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DeactivateAfter {
    pub remaining: f32,
}

/// Система: применение DamageRequest к Health
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<&mut Health>,
    mut health_changed: EventWriter<HealthChanged>,
    mut damage_taken: EventWriter<DamageTaken>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            crate::logger::log_warning(&format!(
                "⚠️ DamageRequest: target {:?} has no Health component",
                request.target
            ));
            continue;
        };

        let change = health.take_damage(request.amount, request.source);

        if change.changed() {
            health_changed.write(HealthChanged {
                entity: request.target,
                previous: change.previous,
                current: change.current,
                max: health.max(),
            });
        }

        // Смерть репортим всегда, даже если шаг урона был меньше EPSILON
        if change.died {
            entity_died.write(EntityDied {
                entity: request.target,
                killer: change.source,
            });
            crate::logger::log_info(&format!(
                "💀 Entity {:?} killed by {:?}",
                request.target, change.source
            ));
        } else if change.changed() {
            damage_taken.write(DamageTaken {
                target: request.target,
                amount: change.previous - change.current,
                source: change.source,
                stagger: request.stagger,
            });
        }
    }
}

/// Система: маркер Dead на умерших
pub fn mark_dead(mut commands: Commands, mut deaths: EventReader<EntityDied>) {
    for event in deaths.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }
    }
}

/// Система: отсчёт DeactivateAfter → despawn
pub fn tick_deactivation(
    mut commands: Commands,
    time: Res<Time>,
    mut pending: Query<(Entity, &mut DeactivateAfter)>,
) {
    let delta = time.delta_secs();

    for (entity, mut deactivate) in pending.iter_mut() {
        deactivate.remaining -= delta;
        if deactivate.remaining <= 0.0 {
            commands.entity(entity).despawn();
            crate::logger::log(&format!("🧹 Entity {:?} deactivated", entity));
        }
    }
}
