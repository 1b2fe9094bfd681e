//! Movement domain: headless steering для NavAgent
//!
//! AI пишет intent (destination, speed, stop/resume) через `Navigation`,
//! здесь intent превращается в движение Transform'а. Host с настоящим
//! pathfinding может не добавлять MovementPlugin и двигать агентов сам.

use bevy::prelude::*;

use crate::components::NavAgent;
use crate::SimulationSet;

/// Movement Plugin
///
/// steer_nav_agents: в SimulationSet::Move (после всех решений AI/combat).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        crate::configure_simulation_sets(app);
        app.add_systems(FixedUpdate, steer_nav_agents.in_set(SimulationSet::Move));
    }
}

/// Система: NavAgent.advance → Transform
///
/// Transform: источник истины для позиции (host мог телепортировать агента),
/// поэтому navigator синхронизируется перед шагом.
pub fn steer_nav_agents(time: Res<Time>, mut agents: Query<(&mut NavAgent, &mut Transform)>) {
    let delta = time.delta_secs();

    for (mut nav, mut transform) in agents.iter_mut() {
        let current = transform.translation;
        nav.position = current;

        let next = nav.advance(delta);
        if next != current {
            transform.translation = next;
        }
    }
}
