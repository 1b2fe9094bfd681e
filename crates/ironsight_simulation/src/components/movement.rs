//! Movement компоненты: navigation контракт и headless navigator

use bevy::prelude::*;

/// Контракт навигации (NavMesh agent, CharacterBody, headless navigator)
///
/// AI states общаются с движением только через этот trait:
/// - high-level intent (destination, stop/resume)
/// - статус (path pending, remaining distance, has path)
/// - профиль (speed, stopping distance) меняется при входе в state
pub trait Navigation {
    fn set_destination(&mut self, position: Vec3);
    /// Заморозить движение (path сохраняется)
    fn stop(&mut self);
    fn resume(&mut self);
    /// Сбросить текущий path (has_path → false)
    fn reset_path(&mut self);
    fn is_stopped(&self) -> bool;
    fn is_path_pending(&self) -> bool;
    /// Дистанция до destination; `f32::INFINITY` если path нет
    fn remaining_distance(&self) -> f32;
    fn has_path(&self) -> bool;
    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
    fn stopping_distance(&self) -> f32;
    fn set_stopping_distance(&mut self, distance: f32);
}

/// Headless navigator: прямая линия в плоскости XZ
///
/// Архитектура:
/// - AI пишет destination/speed/stopped через `Navigation`
/// - `steer_nav_agents` двигает Transform и синхронизирует `position`
/// - Host с настоящим pathfinding может заменить систему, оставив компонент
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Последняя известная позиция (sync из Transform каждый тик)
    pub position: Vec3,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopping_distance: f32,
    pub stopped: bool,
    /// Выставляется host'ом пока path считается асинхронно
    pub path_pending: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl NavAgent {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            destination: None,
            speed: 2.0, // 2 m/s: базовая скорость ходьбы
            stopping_distance: 0.5,
            stopped: true,
            path_pending: false,
        }
    }

    /// Один шаг движения к destination (dt в секундах)
    ///
    /// Останавливаемся на stopping_distance, не перепрыгиваем её.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        let Some(destination) = self.destination else {
            return self.position;
        };
        if self.stopped || self.path_pending {
            return self.position;
        }

        let mut to_target = destination - self.position;
        to_target.y = 0.0;
        let distance = to_target.length();

        if distance > self.stopping_distance && distance > f32::EPSILON {
            let step = (self.speed * dt).min(distance - self.stopping_distance);
            self.position += to_target / distance * step;
        }

        self.position
    }
}

impl Navigation for NavAgent {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn is_path_pending(&self) -> bool {
        self.path_pending
    }

    fn remaining_distance(&self) -> f32 {
        match self.destination {
            Some(destination) => {
                let mut delta = destination - self.position;
                delta.y = 0.0;
                delta.length()
            }
            None => f32::INFINITY,
        }
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
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
