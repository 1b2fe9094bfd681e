//! Spawn domain: фабрика врагов и spawner с задержкой между спавнами
//!
//! Задержки: countdown таймеры, которые тикает `run_spawners` (без корутин).

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;

use crate::ai::{AgentConfig, AgentProfile, EnemyBrain, Sensor, TriggerVolume, Waypoints};
use crate::components::{CategoryMask, CueTrack, Health, NavAgent, Targetable};
use crate::SimulationSet;

/// Spawn Plugin: run_spawners в SimulationSet::Spawn (начало кадра)
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_simulation_sets(app);
        app.add_systems(FixedUpdate, run_spawners.in_set(SimulationSet::Spawn));
    }
}

/// Заспавнить врага со всем AI bundle'ом
///
/// Waypoints копируются (у каждого врага свой immutable набор).
pub fn spawn_enemy(
    commands: &mut Commands,
    config: Arc<AgentConfig>,
    transform: Transform,
    waypoints: &[Vec3],
) -> Entity {
    let sensor = Sensor::new(config.detection_radius, CategoryMask::PLAYER);
    let health = Health::new(config.max_health);

    let entity = commands
        .spawn((
            EnemyBrain::new(),
            AgentProfile(config),
            NavAgent::new(transform.translation),
            CueTrack::default(),
            transform,
            Waypoints(waypoints.to_vec()),
            health,
            sensor,
            TriggerVolume::default(),
            Targetable::new(CategoryMask::ENEMY),
        ))
        .id();

    crate::logger::log(&format!("🧟 Enemy {:?} spawned at {:?}", entity, transform.translation));
    entity
}

/// Компонент: spawner врагов
///
/// Спавнит в своей позиции (Transform spawner'а), раздаёт всем один набор
/// waypoints.
#[derive(Component, Debug, Clone)]
pub struct EnemySpawner {
    /// Профили для queue_roster (по одному врагу на профиль)
    pub roster: Vec<Arc<AgentConfig>>,
    /// Секунды между спавнами (0 = вся очередь в одном кадре)
    pub delay_between_spawns: f32,
    pub waypoints: Vec<Vec3>,
    /// Поставить roster в очередь на первом тике
    pub spawn_on_start: bool,
    pending: VecDeque<Arc<AgentConfig>>,
    cooldown: f32,
    started: bool,
}

impl EnemySpawner {
    pub fn new(roster: Vec<Arc<AgentConfig>>, waypoints: Vec<Vec3>) -> Self {
        Self {
            roster,
            delay_between_spawns: 0.0,
            waypoints,
            spawn_on_start: true,
            pending: VecDeque::new(),
            cooldown: 0.0,
            started: false,
        }
    }

    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.delay_between_spawns = seconds.max(0.0);
        self
    }

    pub fn with_spawn_on_start(mut self, spawn_on_start: bool) -> Self {
        self.spawn_on_start = spawn_on_start;
        self
    }

    /// Весь roster в очередь (по одному на профиль)
    pub fn queue_roster(&mut self) {
        let roster = self.roster.clone();
        self.pending.extend(roster);
    }

    /// N копий одного профиля в очередь
    pub fn queue(&mut self, config: Arc<AgentConfig>, amount: usize) {
        self.pending.extend(std::iter::repeat_n(config, amount));
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Один тик: какие профили спавнить в этом кадре
    ///
    /// Первый из очереди выходит сразу, следующие: через delay_between_spawns.
    pub fn tick(&mut self, delta: f32) -> Vec<Arc<AgentConfig>> {
        if !self.started {
            self.started = true;
            if self.spawn_on_start {
                self.queue_roster();
            }
        }

        let mut ready = Vec::new();
        self.cooldown -= delta;

        while self.cooldown <= 0.0 {
            let Some(config) = self.pending.pop_front() else {
                self.cooldown = self.cooldown.max(0.0);
                break;
            };
            ready.push(config);

            if self.delay_between_spawns > 0.0 {
                self.cooldown += self.delay_between_spawns;
            }
        }

        ready
    }
}

/// Система: тик spawner'ов и спавн готовых врагов
pub fn run_spawners(
    mut commands: Commands,
    time: Res<Time>,
    mut spawners: Query<(&mut EnemySpawner, &Transform)>,
) {
    let delta = time.delta_secs();

    for (mut spawner, transform) in spawners.iter_mut() {
        for config in spawner.tick(delta) {
            spawn_enemy(&mut commands, config, *transform, &spawner.waypoints);
        }
    }
}
