//! Enemy AI decision layer
//!
//! Слои (leaf-first):
//! - fsm: generic State / StateMachine
//! - states: Idle, Patrol, Chase, Attack, Hit, Die
//! - context: capability surface для states (AgentHost / AgentContext)
//! - brain: EnemyBrain: агрегат машины + states + очереди переходов
//! - sensor: обнаружение целей
//! - systems: ECS обвязка (FixedUpdate)

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod context;
pub mod error;
pub mod events;
pub mod fsm;
pub mod sensor;
pub mod states;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export основных типов
pub use brain::{AgentSignal, EnemyBrain, MAX_REQUESTS_PER_CALL};
pub use components::{AgentConfig, AgentProfile, AnimationNames, Waypoints};
pub use context::{smooth_face, yaw_towards, AgentContext, AgentHost, AgentRequest, Dispatch};
pub use error::{ConfigError, WiringError};
pub use events::{SensorEntered, SensorExited, TargetAcquired};
pub use sensor::{Sensor, TriggerVolume};
pub use states::{StateId, Wiring};
pub use systems::{EcsHost, TargetIndex};

use crate::combat::{DamageRequest, DamageTaken, EntityDied};
use crate::{DeterministicRng, SimulationSet};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения (в общей цепочке SimulationSet):
/// 1. index_targets: живые Targetable (Sense)
/// 2. detect_in_radius: headless trigger volumes (Sense)
/// 3. process_sensor_events: SensorEntered → TargetAcquired (Sense)
/// 4. drive_agents: сигналы acquisition + tick state'ов (Think)
/// 5. react_to_health: DamageTaken/EntityDied → Hit/Die/TargetGone (React)
/// 6. release_stale_tracking: sensor отпускает потерянную цель (React)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_simulation_sets(app);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.init_resource::<TargetIndex>()
            .add_event::<SensorEntered>()
            .add_event::<SensorExited>()
            .add_event::<TargetAcquired>()
            // Damage contract (идемпотентно, если CombatPlugin уже добавил)
            .add_event::<DamageRequest>()
            .add_event::<DamageTaken>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                (
                    systems::index_targets,
                    systems::detect_in_radius,
                    systems::process_sensor_events,
                )
                    .chain()
                    .in_set(SimulationSet::Sense),
                systems::drive_agents.in_set(SimulationSet::Think),
                (systems::react_to_health, systems::release_stale_tracking)
                    .chain()
                    .in_set(SimulationSet::React),
            ),
        );
    }
}
