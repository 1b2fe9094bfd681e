//! Enemy AI integration tests
//!
//! Headless App, FixedUpdate прогоняется вручную с dt = 1/64
//! (точная float арифметика для таймеров: 1.5с = 96 тиков, 1.0с = 64).
//!
//! Проверяем:
//! - полный цикл Idle → Chase → Attack → смерть цели → Idle
//! - Hit stagger и revert в state до удара
//! - смерть врага и деактивацию трупа
//! - spawner с задержкой
//! - sensor: одна acquisition на вход, повторная после потери цели

use std::sync::Arc;
use std::time::Duration;

use bevy::ecs::event::Events;
use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use ironsight_simulation::*;
use ironsight_simulation::ai::SensorEntered;

/// Helper: App со всеми plugins, single-threaded FixedUpdate
fn create_ai_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .insert_resource(DeterministicRng::new(42))
        .add_plugins(SimulationPlugin);
    app.edit_schedule(FixedUpdate, |schedule| {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    });
    app
}

/// Helper: N simulation тиков по 1/64 секунды
fn step(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f64(1.0 / 64.0));
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn spawn_enemy_at(app: &mut App, position: Vec3, waypoints: &[Vec3]) -> Entity {
    spawn_configured_enemy(app, AgentConfig::default(), position, waypoints)
}

fn spawn_configured_enemy(app: &mut App, config: AgentConfig, position: Vec3, waypoints: &[Vec3]) -> Entity {
    let world = app.world_mut();
    let enemy = spawn_enemy(
        &mut world.commands(),
        Arc::new(config),
        Transform::from_translation(position),
        waypoints,
    );
    world.flush();
    enemy
}

fn spawn_player(app: &mut App, position: Vec3, health: f32) -> Entity {
    app.world_mut()
        .spawn((
            Health::new(health),
            Targetable::new(CategoryMask::PLAYER),
            Transform::from_translation(position),
        ))
        .id()
}

fn brain(app: &App, enemy: Entity) -> &EnemyBrain {
    app.world().get::<EnemyBrain>(enemy).expect("enemy brain")
}

fn square() -> Vec<Vec3> {
    vec![
        Vec3::new(8.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 8.0),
        Vec3::new(-8.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -8.0),
    ]
}

/// Test: враг замечает игрока, догоняет, бьёт до смерти, потом успокаивается
#[test]
fn test_enemy_hunts_player_to_death() {
    let mut app = create_ai_app();
    let enemy = spawn_enemy_at(&mut app, Vec3::ZERO, &[]);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 6.0), 30.0);

    step(&mut app, 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Chase));
    assert_eq!(brain(&app, enemy).previous_state(), Some(StateId::Idle));
    assert_eq!(brain(&app, enemy).target(), Some(player));

    // Догоняет и переходит в Attack
    let mut attacked = false;
    for _ in 0..100 {
        step(&mut app, 1);
        if brain(&app, enemy).current_state() == Some(StateId::Attack) {
            attacked = true;
            break;
        }
    }
    assert!(attacked, "враг должен дойти до дистанции атаки");

    // Бьёт раз в секунду, пока игрок не умрёт (30 hp / 10 = 3 удара)
    let mut died_on_tick = None;
    for tick in 0..400 {
        step(&mut app, 1);
        let player_health = app.world().get::<Health>(player).copied().expect("player health");
        if player_health.is_dead() {
            died_on_tick = Some(tick);
            break;
        }
    }
    assert!(died_on_tick.is_some(), "игрок должен умереть");

    // В том же тике: цель сброшена, враг в Idle
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Idle));
    assert_eq!(brain(&app, enemy).target(), None);

    // Мёртвую цель больше не бьют
    step(&mut app, 200);
    assert_eq!(app.world().resource::<Events<DamageRequest>>().len(), 3);
    assert_eq!(app.world().resource::<Events<EntityDied>>().len(), 1);
    assert!(app.world().get::<Dead>(player).is_some());
    assert_ne!(brain(&app, enemy).current_state(), Some(StateId::Chase));
}

/// Test: без целей враг чередует Idle и Patrol
#[test]
fn test_idle_patrol_cycle_moves_enemy() {
    let mut app = create_ai_app();
    let enemy = spawn_enemy_at(&mut app, Vec3::ZERO, &square());

    step(&mut app, 95);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Idle));

    step(&mut app, 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Patrol));

    step(&mut app, 32);
    let position = app.world().get::<Transform>(enemy).expect("transform").translation;
    assert!(position.length() > 1.0, "враг должен двигаться к waypoint'у: {:?}", position);

    let nav = app.world().get::<NavAgent>(enemy).expect("nav agent");
    assert_eq!(nav.speed, 3.5);
    assert!(square().contains(&nav.destination.expect("patrol destination")));
}

/// Test: урон → Hit → revert в Patrol ровно через hit_recovery
#[test]
fn test_hit_stagger_reverts_to_patrol() {
    let mut app = create_ai_app();
    let enemy = spawn_enemy_at(&mut app, Vec3::ZERO, &square());

    step(&mut app, 100);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Patrol));

    app.world_mut().send_event(DamageRequest::new(enemy, 10.0));
    step(&mut app, 1);

    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Hit));
    assert_eq!(brain(&app, enemy).previous_state(), Some(StateId::Patrol));
    assert_eq!(app.world().get::<Health>(enemy).map(Health::current), Some(90.0));
    let cues = app.world().get::<CueTrack>(enemy).expect("cue track");
    assert_eq!(cues.current_name(), Some("Hit"));

    // 0.6с = 38.4 тика → revert на 39-м
    step(&mut app, 38);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Hit));

    step(&mut app, 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Patrol));
    assert!(!app.world().get::<NavAgent>(enemy).expect("nav agent").stopped);
}

/// Test: смертельный урон → Die → деактивация через deactivate_delay
#[test]
fn test_enemy_death_and_deactivation() {
    let mut app = create_ai_app();
    let enemy = spawn_enemy_at(&mut app, Vec3::ZERO, &square());
    step(&mut app, 10);

    app.world_mut().send_event(DamageRequest::new(enemy, 150.0));
    step(&mut app, 1);

    assert!(brain(&app, enemy).is_dead());
    assert!(app.world().get::<Dead>(enemy).is_some());
    let remaining = app
        .world()
        .get::<DeactivateAfter>(enemy)
        .map(|deactivate| deactivate.remaining)
        .expect("deactivation scheduled");
    assert!(remaining > 2.9 && remaining <= 3.0, "remaining = {}", remaining);

    // Урон и сигналы после смерти игнорируются
    app.world_mut().send_event(DamageRequest::new(enemy, 10.0));
    step(&mut app, 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Die));
    assert_eq!(app.world().resource::<Events<HealthChanged>>().len(), 1);

    // 3.0с ≈ 192 тика после смерти
    step(&mut app, 180);
    assert!(app.world().get_entity(enemy).is_ok());

    step(&mut app, 12);
    assert!(app.world().get_entity(enemy).is_err());
}

/// Test: spawner выпускает врагов с задержкой между спавнами
#[test]
fn test_spawner_respects_delay() {
    let mut app = create_ai_app();
    let profile = Arc::new(AgentConfig::default());
    app.world_mut().spawn((
        EnemySpawner::new(vec![profile.clone(), profile], square()).with_delay(0.5),
        Transform::from_xyz(0.0, 0.0, -10.0),
    ));

    let count_enemies = |app: &mut App| app.world_mut().query::<&EnemyBrain>().iter(app.world()).count();

    step(&mut app, 1);
    assert_eq!(count_enemies(&mut app), 1);

    step(&mut app, 30);
    assert_eq!(count_enemies(&mut app), 1);

    step(&mut app, 1);
    assert_eq!(count_enemies(&mut app), 2);

    let mut enemies = app.world_mut().query::<(&Transform, &Waypoints)>();
    for (transform, waypoints) in enemies.iter(app.world()) {
        assert_eq!(transform.translation, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(waypoints.0, square());
    }
}

/// Test: одна acquisition на вход в sensor; после потери цели: новая
#[test]
fn test_sensor_reacquires_after_target_lost() {
    let mut app = create_ai_app();
    let enemy = spawn_enemy_at(&mut app, Vec3::ZERO, &[]);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 6.0), 100.0);

    step(&mut app, 30);
    assert_eq!(app.world().resource::<Events<TargetAcquired>>().len(), 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Chase));

    // Игрок "телепортировался" дальше lose distance
    app.world_mut().get_mut::<Transform>(player).expect("player").translation = Vec3::new(0.0, 0.0, 25.0);
    step(&mut app, 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Idle));
    assert_eq!(brain(&app, enemy).target(), None);
    assert_eq!(app.world().get::<Sensor>(enemy).and_then(Sensor::tracked), None);

    // Вернулся в радиус → новая acquisition
    app.world_mut().get_mut::<Transform>(player).expect("player").translation = Vec3::new(0.0, 0.0, 5.0);
    step(&mut app, 1);
    assert_eq!(app.world().resource::<Events<TargetAcquired>>().len(), 2);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Chase));
}

/// Test: цель потеряна внутри радиуса sensor'а → повторная acquisition
///
/// Такой профиль отклоняет `AgentConfig::validate`, но spawn_enemy его не
/// проверяет: враг не должен "ослепнуть" к игроку, который остался в радиусе.
#[test]
fn test_target_lost_inside_radius_is_reacquired() {
    let mut app = create_ai_app();
    let config = AgentConfig {
        detection_radius: 20.0,
        ..AgentConfig::default()
    };
    assert!(config.validate().is_err());

    let enemy = spawn_configured_enemy(&mut app, config, Vec3::ZERO, &[]);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 6.0), 100.0);

    step(&mut app, 30);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Chase));

    // Дальше lose distance, но всё ещё внутри sensor'а
    app.world_mut().get_mut::<Transform>(player).expect("player").translation = Vec3::new(0.0, 0.0, 17.0);
    step(&mut app, 1);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Idle));
    assert_eq!(app.world().get::<Sensor>(enemy).and_then(Sensor::tracked), None);
    let volume = app.world().get::<TriggerVolume>(enemy).expect("trigger volume");
    assert!(!volume.inside.contains(&player));

    // Игрок подошёл вплотную → снова цель, враг бьёт
    let enemy_position = app.world().get::<Transform>(enemy).expect("enemy").translation;
    app.world_mut().get_mut::<Transform>(player).expect("player").translation = enemy_position + Vec3::new(0.0, 0.0, 2.0);
    step(&mut app, 1);
    assert_eq!(app.world().resource::<Events<TargetAcquired>>().len(), 2);
    assert_eq!(brain(&app, enemy).current_state(), Some(StateId::Chase));
    assert_eq!(brain(&app, enemy).target(), Some(player));

    step(&mut app, 200);
    assert!(app.world().get::<Health>(player).map(Health::current).is_some_and(|hp| hp < 100.0));
}

/// Test: враги не охотятся друг на друга
#[test]
fn test_enemies_ignore_each_other() {
    let mut app = create_ai_app();
    let first = spawn_enemy_at(&mut app, Vec3::ZERO, &[]);
    let second = spawn_enemy_at(&mut app, Vec3::new(2.0, 0.0, 0.0), &[]);

    step(&mut app, 20);

    assert_eq!(brain(&app, first).current_state(), Some(StateId::Idle));
    assert_eq!(brain(&app, second).current_state(), Some(StateId::Idle));
    assert_eq!(app.world().resource::<Events<TargetAcquired>>().len(), 0);
    assert_eq!(app.world().resource::<Events<SensorEntered>>().len(), 2);
}
