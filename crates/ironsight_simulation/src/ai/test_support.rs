//! Test doubles для states и EnemyBrain (без ECS)

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::{AgentConfig, AgentContext, AgentHost, StateId};
use crate::components::{CuePlayer, Navigation};

/// Navigation double: пишет все вызовы, статус пути задаётся тестом
#[derive(Debug, Clone)]
pub struct RecordingNav {
    pub destination: Option<Vec3>,
    /// Все set_destination вызовы по порядку
    pub destinations: Vec<Vec3>,
    pub stopped: bool,
    pub pending: bool,
    pub has_path: bool,
    /// Что вернёт remaining_distance (пока has_path)
    pub remaining: f32,
    pub speed: f32,
    pub stopping_distance: f32,
    pub resets: u32,
}

impl Default for RecordingNav {
    fn default() -> Self {
        Self {
            destination: None,
            destinations: Vec::new(),
            stopped: true,
            pending: false,
            has_path: false,
            remaining: f32::INFINITY,
            speed: 0.0,
            stopping_distance: 0.0,
            resets: 0,
        }
    }
}

impl Navigation for RecordingNav {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
        self.destinations.push(position);
        self.has_path = true;
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.has_path = false;
        self.resets += 1;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn is_path_pending(&self) -> bool {
        self.pending
    }

    fn remaining_distance(&self) -> f32 {
        if self.has_path {
            self.remaining
        } else {
            f32::INFINITY
        }
    }

    fn has_path(&self) -> bool {
        self.has_path
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance;
    }
}

impl CuePlayer for Vec<(String, f32)> {
    fn play_cue(&mut self, name: &str, blend_time: f32) {
        self.push((name.to_string(), blend_time));
    }
}

/// Host double: всё окружение агента в памяти
pub struct FakeHost {
    pub config: AgentConfig,
    pub nav: RecordingNav,
    pub cues: Vec<(String, f32)>,
    pub position: Vec3,
    pub rotation: Quat,
    pub waypoints: Vec<Vec3>,
    pub delta: f32,
    pub rng: ChaCha8Rng,
    /// Заранее заданные random_index результаты (до rng)
    pub scripted: VecDeque<usize>,
    /// Живые цели (entity → позиция); отсутствие = цель невалидна
    pub targets: HashMap<Entity, Vec3>,
    pub damage: Vec<(Entity, f32)>,
    pub deactivations: Vec<f32>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            config: AgentConfig::default(),
            nav: RecordingNav::default(),
            cues: Vec::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            waypoints: Vec::new(),
            delta: 1.0 / 64.0,
            rng: ChaCha8Rng::seed_from_u64(42),
            scripted: VecDeque::new(),
            targets: HashMap::new(),
            damage: Vec::new(),
            deactivations: Vec::new(),
        }
    }

    pub fn cue_names(&self) -> Vec<&str> {
        self.cues.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl AgentHost for FakeHost {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn navigation(&mut self) -> &mut dyn Navigation {
        &mut self.nav
    }

    fn animator(&mut self) -> &mut dyn CuePlayer {
        &mut self.cues
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn face_towards(&mut self, direction: Vec3, t: f32) {
        self.rotation = crate::ai::smooth_face(self.rotation, direction, t);
    }

    fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    fn delta_secs(&self) -> f32 {
        self.delta
    }

    fn random_index(&mut self, len: usize) -> usize {
        match self.scripted.pop_front() {
            Some(index) => index % len,
            None => self.rng.gen_range(0..len),
        }
    }

    fn resolve_target(&self, target: Entity) -> Option<Vec3> {
        self.targets.get(&target).copied()
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) {
        self.damage.push((target, amount));
    }

    fn schedule_deactivation(&mut self, after_secs: f32) {
        self.deactivations.push(after_secs);
    }
}

/// Context double: host + журнал запросов переходов
pub struct FakeContext {
    pub host: FakeHost,
    pub switches: Vec<StateId>,
    pub lost: Vec<Option<Entity>>,
    pub reverts: u32,
}

impl FakeContext {
    pub fn new() -> Self {
        Self {
            host: FakeHost::new(),
            switches: Vec::new(),
            lost: Vec::new(),
            reverts: 0,
        }
    }

    pub fn with_delta(mut self, delta: f32) -> Self {
        self.host.delta = delta;
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Vec3>) -> Self {
        self.host.waypoints = waypoints;
        self
    }

    pub fn with_target(mut self, target: Entity, position: Vec3) -> Self {
        self.host.targets.insert(target, position);
        self
    }
}

impl AgentHost for FakeContext {
    fn config(&self) -> &AgentConfig {
        self.host.config()
    }

    fn navigation(&mut self) -> &mut dyn Navigation {
        self.host.navigation()
    }

    fn animator(&mut self) -> &mut dyn CuePlayer {
        self.host.animator()
    }

    fn position(&self) -> Vec3 {
        self.host.position()
    }

    fn rotation(&self) -> Quat {
        self.host.rotation()
    }

    fn face_towards(&mut self, direction: Vec3, t: f32) {
        self.host.face_towards(direction, t);
    }

    fn waypoints(&self) -> &[Vec3] {
        self.host.waypoints()
    }

    fn delta_secs(&self) -> f32 {
        self.host.delta_secs()
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.host.random_index(len)
    }

    fn resolve_target(&self, target: Entity) -> Option<Vec3> {
        self.host.resolve_target(target)
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) {
        self.host.apply_damage(target, amount);
    }

    fn schedule_deactivation(&mut self, after_secs: f32) {
        self.host.schedule_deactivation(after_secs);
    }
}

impl AgentContext for FakeContext {
    fn switch_state(&mut self, next: StateId) {
        self.switches.push(next);
    }

    fn notify_target_lost(&mut self, target: Option<Entity>) {
        self.lost.push(target);
    }

    fn revert_to_previous_state(&mut self) {
        self.reverts += 1;
    }
}
