//! Combat module: damage contract между агентами и окружением
//!
//! ECS ответственность:
//! - Health (components::actor): единственный владелец HP
//! - DamageRequest → apply_damage → HealthChanged / DamageTaken / EntityDied
//! - Dead маркер, отложенная деактивация трупов
//!
//! Кто наносит урон (AI Attack, пули игрока, ловушки): не важно: все пишут
//! DamageRequest.

use bevy::prelude::*;

pub mod damage;


// Re-export основных типов
pub use damage::{
    apply_damage, mark_dead, tick_deactivation, DamageRequest, DamageTaken, DeactivateAfter, Dead,
    EntityDied, HealthChanged,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (внутри общей цепочки SimulationSet):
/// 1. apply_damage: DamageRequest → Health (Resolve)
/// 2. mark_dead: маркер Dead (Resolve)
/// 3. tick_deactivation: despawn трупов (Cleanup)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_simulation_sets(app);

        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<HealthChanged>()
            .add_event::<DamageTaken>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                (apply_damage, mark_dead).chain().in_set(SimulationSet::Resolve),
                tick_deactivation.in_set(SimulationSet::Cleanup),
            ),
        );
    }
}
