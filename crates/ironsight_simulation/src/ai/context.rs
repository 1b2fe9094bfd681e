//! Capability surface агента для states
//!
//! States зависят только от `AgentContext`: никогда от ECS query или
//! конкретного типа агента. В тестах подставляется fake context.
//!
//! Разделение:
//! - `AgentHost`: то, что даёт окружение (navigation, animator, transform,
//!   tuning, waypoints, target lookup, damage sink, deactivation)
//! - `AgentContext`: host + запросы переходов (switch/lost/revert)
//!
//! Запросы переходов не исполняются внутри tick текущего state: `Dispatch`
//! складывает их в очередь, `EnemyBrain` разбирает очередь сразу после вызова
//! (тот же кадр, тот же call chain).

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::ai::{AgentConfig, StateId};
use crate::components::{CuePlayer, Navigation};

/// То, что окружение предоставляет одному агенту
pub trait AgentHost {
    /// Shared read-only tuning
    fn config(&self) -> &AgentConfig;

    fn navigation(&mut self) -> &mut dyn Navigation;

    fn animator(&mut self) -> &mut dyn CuePlayer;

    fn position(&self) -> Vec3;

    fn rotation(&self) -> Quat;

    /// Плавный разворот к direction (t: slerp factor, 0..=1)
    fn face_towards(&mut self, direction: Vec3, t: f32);

    fn waypoints(&self) -> &[Vec3];

    /// Frame delta (секунды)
    fn delta_secs(&self) -> f32;

    /// Uniform index в 0..len (детерминированный RNG), len > 0
    fn random_index(&mut self, len: usize) -> usize;

    /// Позиция цели, None если entity уничтожена/выключена/мертва
    fn resolve_target(&self, target: Entity) -> Option<Vec3>;

    fn apply_damage(&mut self, target: Entity, amount: f32);

    fn schedule_deactivation(&mut self, after_secs: f32);
}

/// Host + запросы переходов, которые states делают "наружу"
pub trait AgentContext: AgentHost {
    fn switch_state(&mut self, next: StateId);

    /// Цель потеряна (None = state остался без цели вообще)
    fn notify_target_lost(&mut self, target: Option<Entity>);

    fn revert_to_previous_state(&mut self);
}

/// Запрос от state к агенту (исполняется после текущего вызова state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRequest {
    Switch(StateId),
    TargetLost(Option<Entity>),
    Revert,
}

/// AgentContext поверх любого host'а: всё host'овское: forward,
/// переходы: в очередь.
pub struct Dispatch<'a, H: AgentHost + ?Sized> {
    host: &'a mut H,
    requests: &'a mut VecDeque<AgentRequest>,
}

impl<'a, H: AgentHost + ?Sized> Dispatch<'a, H> {
    pub fn new(host: &'a mut H, requests: &'a mut VecDeque<AgentRequest>) -> Self {
        Self { host, requests }
    }
}

impl<H: AgentHost + ?Sized> AgentHost for Dispatch<'_, H> {
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

impl<H: AgentHost + ?Sized> AgentContext for Dispatch<'_, H> {
    fn switch_state(&mut self, next: StateId) {
        self.requests.push_back(AgentRequest::Switch(next));
    }

    fn notify_target_lost(&mut self, target: Option<Entity>) {
        self.requests.push_back(AgentRequest::TargetLost(target));
    }

    fn revert_to_previous_state(&mut self) {
        self.requests.push_back(AgentRequest::Revert);
    }
}

/// Yaw-only разворот: rotation, смотрящий (-Z forward) вдоль direction в XZ
///
/// None если direction почти вертикальный/нулевой.
pub fn yaw_towards(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= 0.001 {
        return None;
    }
    let flat = flat.normalize();
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

/// Slerp текущего rotation к yaw_towards(direction)
pub fn smooth_face(current: Quat, direction: Vec3, t: f32) -> Quat {
    match yaw_towards(direction) {
        Some(target) => current.slerp(target, t.clamp(0.0, 1.0)),
        None => current,
    }
}
