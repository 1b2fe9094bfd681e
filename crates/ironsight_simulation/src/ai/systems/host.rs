//! ECS host: AgentHost поверх компонентов одного врага
//!
//! Всё, что states делают "наружу" (урон, деактивация), копится в Outbox
//! и сбрасывается в events/commands после вызова brain'а.

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{smooth_face, AgentConfig, AgentHost};
use crate::combat::{DamageRequest, DeactivateAfter};
use crate::components::{CategoryMask, CuePlayer, CueTrack, NavAgent, Navigation};

/// Живая цель в индексе
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedTarget {
    pub position: Vec3,
    pub category: CategoryMask,
}

/// Resource: все живые Targetable на начало кадра
///
/// Мёртвые, despawned и disabled entity сюда не попадают: для AI это
/// "нет цели". BTreeMap → детерминированный порядок обхода.
#[derive(Resource, Debug, Default)]
pub struct TargetIndex {
    targets: BTreeMap<Entity, IndexedTarget>,
}

impl TargetIndex {
    pub fn insert(&mut self, entity: Entity, position: Vec3, category: CategoryMask) {
        self.targets.insert(entity, IndexedTarget { position, category });
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn get(&self, entity: Entity) -> Option<&IndexedTarget> {
        self.targets.get(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.targets.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &IndexedTarget)> {
        self.targets.iter().map(|(entity, target)| (*entity, target))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Побочные эффекты одного вызова brain'а
#[derive(Debug, Default)]
pub struct Outbox {
    pub damage: Vec<(Entity, f32)>,
    pub deactivate_after: Option<f32>,
}

impl Outbox {
    /// Урон → DamageRequest (source = агент), деактивация → DeactivateAfter
    pub fn flush(self, agent: Entity, commands: &mut Commands, damage: &mut EventWriter<DamageRequest>) {
        for (target, amount) in self.damage {
            damage.write(DamageRequest::new(target, amount).from_source(agent));
        }

        if let Some(remaining) = self.deactivate_after {
            if let Ok(mut entity_commands) = commands.get_entity(agent) {
                entity_commands.insert(DeactivateAfter { remaining });
            }
        }
    }
}

/// AgentHost для одного врага на время одного вызова
pub struct EcsHost<'a> {
    pub config: &'a AgentConfig,
    pub nav: &'a mut NavAgent,
    pub cues: &'a mut CueTrack,
    pub transform: &'a mut Transform,
    pub waypoints: &'a [Vec3],
    pub delta: f32,
    pub rng: &'a mut ChaCha8Rng,
    pub targets: &'a TargetIndex,
    pub outbox: Outbox,
}

impl EcsHost<'_> {
    pub fn into_outbox(self) -> Outbox {
        self.outbox
    }
}

impl AgentHost for EcsHost<'_> {
    fn config(&self) -> &AgentConfig {
        self.config
    }

    fn navigation(&mut self) -> &mut dyn Navigation {
        &mut *self.nav
    }

    fn animator(&mut self) -> &mut dyn CuePlayer {
        &mut *self.cues
    }

    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn face_towards(&mut self, direction: Vec3, t: f32) {
        self.transform.rotation = smooth_face(self.transform.rotation, direction, t);
    }

    fn waypoints(&self) -> &[Vec3] {
        self.waypoints
    }

    fn delta_secs(&self) -> f32 {
        self.delta
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn resolve_target(&self, target: Entity) -> Option<Vec3> {
        self.targets.get(target).map(|indexed| indexed.position)
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) {
        self.outbox.damage.push((target, amount));
    }

    fn schedule_deactivation(&mut self, after_secs: f32) {
        self.outbox.deactivate_after = Some(after_secs);
    }
}
