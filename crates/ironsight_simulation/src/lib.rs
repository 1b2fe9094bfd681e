//! Ironsight Simulation Core
//!
//! Enemy AI decision layer на Bevy 0.16 ECS (headless).
//!
//! Движок (рендер, физика, анимации, pathfinding): внешний host:
//! - ECS = решения AI, здоровье, урон, спавн
//! - Host = Navigation / CuePlayer реализации, trigger volumes, визуал
//!
//! Для запуска без движка crate содержит headless реализации
//! (NavAgent + steer_nav_agents, CueTrack, detect_in_radius).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod movement;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, AgentConfig, AgentProfile, AgentSignal, ConfigError, EnemyBrain, Sensor, StateId, TargetAcquired,
    TargetIndex, TriggerVolume, Waypoints, Wiring, WiringError,
};
pub use combat::{CombatPlugin, DamageRequest, DamageTaken, DeactivateAfter, Dead, EntityDied, HealthChanged};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use movement::MovementPlugin;
pub use spawn::{spawn_enemy, EnemySpawner, SpawnPlugin};

/// Фазы одного simulation tick (FixedUpdate), строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Спавнеры
    Spawn,
    /// Индекс целей, trigger volumes, sensors
    Sense,
    /// Tick агентов
    Think,
    /// Применение урона
    Resolve,
    /// Реакции агентов на урон/смерть
    React,
    /// Steering
    Move,
    /// Деактивация трупов
    Cleanup,
}

/// Цепочка SimulationSet (вызывается каждым plugin'ом, повтор безвреден)
pub(crate) fn configure_simulation_sets(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            SimulationSet::Spawn,
            SimulationSet::Sense,
            SimulationSet::Think,
            SimulationSet::Resolve,
            SimulationSet::React,
            SimulationSet::Move,
            SimulationSet::Cleanup,
        )
            .chain(),
    );
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Подсистемы (порядок регистрации не важен: порядок задают sets)
            .add_plugins((SpawnPlugin, AIPlugin, CombatPlugin, MovementPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
