//! Sensing systems: trigger volume → Sensor → TargetAcquired.

use bevy::prelude::*;

use crate::ai::{EnemyBrain, Sensor, SensorEntered, SensorExited, TargetAcquired, TriggerVolume};

use super::host::TargetIndex;

/// Система: headless trigger source (дистанция по Transform)
///
/// Edge-triggered: Entered/Exited только когда entity пересекла радиус
/// (или появилась/исчезла из TargetIndex).
pub fn detect_in_radius(
    targets: Res<TargetIndex>,
    mut sensors: Query<(Entity, &Sensor, &Transform, &mut TriggerVolume)>,
    mut entered: EventWriter<SensorEntered>,
    mut exited: EventWriter<SensorExited>,
) {
    for (sensor_entity, sensor, transform, mut volume) in sensors.iter_mut() {
        let radius_sq = sensor.radius() * sensor.radius();
        let origin = transform.translation;

        let inside: Vec<Entity> = targets
            .iter()
            .filter(|(entity, target)| {
                *entity != sensor_entity && target.position.distance_squared(origin) <= radius_sq
            })
            .map(|(entity, _)| entity)
            .collect();

        for &other in volume.inside.iter().filter(|entity| !inside.contains(entity)) {
            exited.write(SensorExited {
                sensor: sensor_entity,
                other,
            });
        }
        for &other in inside.iter().filter(|entity| !volume.inside.contains(entity)) {
            entered.write(SensorEntered {
                sensor: sensor_entity,
                other,
            });
        }

        if volume.inside != inside {
            volume.inside = inside;
        }
    }
}

/// Система: SensorEntered → Sensor::on_entered → TargetAcquired
pub fn process_sensor_events(
    targets: Res<TargetIndex>,
    mut entered: EventReader<SensorEntered>,
    mut sensors: Query<&mut Sensor>,
    mut acquired: EventWriter<TargetAcquired>,
) {
    for event in entered.read() {
        let Ok(mut sensor) = sensors.get_mut(event.sensor) else {
            continue;
        };
        // Не Targetable или уже мёртв: не цель
        let Some(target) = targets.get(event.other) else {
            continue;
        };

        if let Some(target) = sensor.on_entered(event.other, target.category) {
            acquired.write(TargetAcquired {
                agent: event.sensor,
                target,
            });
            crate::logger::log_info(&format!(
                "👁️ Sensor {:?} acquired target {:?}",
                event.sensor, target
            ));
        }
    }
}

/// Система: отпустить tracking, если агент больше не держит эту цель
///
/// После этого повторный вход той же entity: новая acquisition. Entity
/// убирается и из TriggerVolume, чтобы `detect_in_radius` снова поднял
/// SensorEntered, если она всё ещё в радиусе.
pub fn release_stale_tracking(
    targets: Res<TargetIndex>,
    mut agents: Query<(&EnemyBrain, &mut Sensor, Option<&mut TriggerVolume>)>,
) {
    for (brain, mut sensor, volume) in agents.iter_mut() {
        let Some(tracked) = sensor.tracked() else {
            continue;
        };

        if brain.target() == Some(tracked) && targets.contains(tracked) {
            continue;
        }

        sensor.forget();
        if let Some(mut volume) = volume {
            if volume.inside.contains(&tracked) {
                volume.inside.retain(|entity| *entity != tracked);
            }
        }
    }
}
