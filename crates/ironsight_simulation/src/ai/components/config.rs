//! AI конфигурация: tuning агента, профиль, waypoints.

use std::sync::Arc;

use bevy::prelude::*;
use serde::Deserialize;

use crate::ai::ConfigError;

/// Имена animation cues + blend time для каждого state
///
/// Пустое имя = cue не проигрывается.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationNames {
    pub idle: String,
    pub patrol: String,
    pub chase: String,
    pub attack: String,
    pub hit: String,
    pub die: String,
}

impl Default for AnimationNames {
    fn default() -> Self {
        Self {
            idle: "Idle".to_string(),
            patrol: "Patrol".to_string(),
            chase: "Chase".to_string(),
            attack: "Attack".to_string(),
            hit: "Hit".to_string(),
            die: "Die".to_string(),
        }
    }
}

/// Tuning параметры врага (immutable, shared между агентами одного типа)
///
/// Загружается из JSON (все поля опциональны, дефолты ниже), валидируется
/// на старте через `validate()`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Idle: пауза перед патрулём (секунды)
    pub idle_delay: f32,

    /// Patrol: скорость navigator'а
    pub patrol_speed: f32,
    /// Patrol: arrival tolerance у waypoint'а
    pub patrol_stopping_distance: f32,

    /// Chase: скорость преследования
    pub chase_speed: f32,
    /// Chase: дистанция "дошёл до цели" → Attack
    pub chase_stopping_distance: f32,
    /// Дальше этой дистанции цель считается потерянной
    pub chase_lose_distance: f32,

    /// Attack: hysteresis поверх chase_stopping_distance (Attack ↔ Chase без дребезга)
    pub attack_range_margin: f32,
    pub attack_damage: f32,
    /// Секунды между ударами
    pub attack_cooldown: f32,
    /// Скорость разворота к цели (slerp factor в секунду)
    pub turn_speed: f32,

    /// Hit: время stagger'а по умолчанию
    pub hit_recovery: f32,
    /// Die: через сколько секунд деактивировать труп
    pub deactivate_delay: f32,

    /// Sensor: радиус trigger volume
    pub detection_radius: f32,
    pub max_health: f32,

    pub animations: AnimationNames,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            idle_delay: 1.5,
            patrol_speed: 3.5,
            patrol_stopping_distance: 0.5,
            chase_speed: 5.0,
            chase_stopping_distance: 1.5,
            chase_lose_distance: 12.0,
            attack_range_margin: 0.3,
            attack_damage: 10.0,
            attack_cooldown: 1.0,
            turn_speed: 10.0,
            hit_recovery: 0.6,
            deactivate_delay: 3.0,
            detection_radius: 10.0,
            max_health: 100.0,
            animations: AnimationNames::default(),
        }
    }
}

impl AgentConfig {
    /// Parse + validate
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Дистанция до цели, в пределах которой Attack бьёт (stopping + hysteresis)
    pub fn attack_range(&self) -> f32 {
        self.chase_stopping_distance + self.attack_range_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("idle_delay", self.idle_delay),
            ("patrol_speed", self.patrol_speed),
            ("patrol_stopping_distance", self.patrol_stopping_distance),
            ("chase_speed", self.chase_speed),
            ("chase_stopping_distance", self.chase_stopping_distance),
            ("attack_range_margin", self.attack_range_margin),
            ("attack_damage", self.attack_damage),
            ("attack_cooldown", self.attack_cooldown),
            ("turn_speed", self.turn_speed),
            ("hit_recovery", self.hit_recovery),
            ("deactivate_delay", self.deactivate_delay),
            ("detection_radius", self.detection_radius),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("expected a finite non-negative value, got {}", value),
                ));
            }
        }

        if !(self.max_health >= 1.0) {
            return Err(ConfigError::invalid(
                "max_health",
                format!("must be at least 1, got {}", self.max_health),
            ));
        }

        if !(self.chase_lose_distance > self.attack_range()) {
            return Err(ConfigError::invalid(
                "chase_lose_distance",
                format!(
                    "must exceed attack range {} (stopping distance + margin), got {}",
                    self.attack_range(),
                    self.chase_lose_distance
                ),
            ));
        }

        // Иначе Chase теряет цель, которая всё ещё внутри sensor'а
        if !(self.detection_radius < self.chase_lose_distance) {
            return Err(ConfigError::invalid(
                "detection_radius",
                format!(
                    "must be below chase_lose_distance {}, got {}",
                    self.chase_lose_distance, self.detection_radius
                ),
            ));
        }

        Ok(())
    }
}

/// Компонент: shared ссылка на AgentConfig
///
/// Несколько врагов одного типа держат один и тот же Arc (read-only).
#[derive(Component, Debug, Clone)]
pub struct AgentProfile(pub Arc<AgentConfig>);

impl AgentProfile {
    pub fn new(config: AgentConfig) -> Self {
        Self(Arc::new(config))
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

/// Компонент: waypoints для Patrol (назначаются на спавне, не меняются)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Waypoints(pub Vec<Vec3>);
