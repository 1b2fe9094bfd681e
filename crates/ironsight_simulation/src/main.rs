//! Headless симуляция Ironsight
//!
//! Spawner с тремя врагами + неподвижный игрок-манекен, который иногда
//! стреляет в ближайшего врага. Печатает состояние AI раз в секунду.

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use ironsight_simulation::{
    create_headless_app, AgentConfig, CategoryMask, DamageRequest, EnemyBrain, EnemySpawner, Health, Targetable,
};

const TICK_HZ: f64 = 60.0;
const TICKS: u32 = 600;

fn main() {
    let seed = 42;
    println!("Starting Ironsight headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    // Каждый update = ровно один FixedUpdate tick
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)));

    let grunt = Arc::new(AgentConfig::default());
    let brute = Arc::new(AgentConfig {
        chase_speed: 3.0,
        attack_damage: 25.0,
        attack_cooldown: 2.0,
        max_health: 200.0,
        ..AgentConfig::default()
    });

    let waypoints = vec![
        Vec3::new(-6.0, 0.0, -6.0),
        Vec3::new(6.0, 0.0, -6.0),
        Vec3::new(6.0, 0.0, 6.0),
        Vec3::new(-6.0, 0.0, 6.0),
    ];

    let world = app.world_mut();
    world.spawn((
        EnemySpawner::new(vec![grunt.clone(), brute, grunt], waypoints).with_delay(0.5),
        Transform::from_xyz(0.0, 0.0, -20.0),
    ));
    let player = world
        .spawn((
            Health::new(100.0),
            Targetable::new(CategoryMask::PLAYER),
            Transform::from_xyz(0.0, 0.0, -8.0),
        ))
        .id();

    for tick in 1..=TICKS {
        app.update();

        // Игрок стреляет в ближайшего живого врага раз в 1.5 секунды
        if tick % 90 == 0 {
            shoot_nearest(app.world_mut(), player);
        }

        if tick % 60 == 0 {
            print_summary(app.world_mut(), player, tick);
        }
    }

    println!("Simulation complete!");
}

fn shoot_nearest(world: &mut World, player: Entity) {
    let Some(origin) = world.get::<Transform>(player).map(|t| t.translation) else {
        return;
    };

    let mut enemies = world.query::<(Entity, &Transform, &EnemyBrain)>();
    let nearest = enemies
        .iter(world)
        .filter(|(_, _, brain)| !brain.is_dead())
        .map(|(entity, transform, _)| (entity, transform.translation.distance(origin)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((enemy, _)) = nearest {
        world.send_event(DamageRequest::new(enemy, 40.0).from_source(player));
    }
}

fn print_summary(world: &mut World, player: Entity, tick: u32) {
    let player_health = world.get::<Health>(player).map(Health::current).unwrap_or(0.0);

    let mut enemies = world.query::<(Entity, &EnemyBrain, &Health)>();
    let mut rows: Vec<String> = enemies
        .iter(world)
        .map(|(entity, brain, health)| {
            format!("{:?}: {:?} ({:.0} hp)", entity, brain.current_state(), health.current())
        })
        .collect();
    rows.sort();

    println!("Tick {}: player {:.0} hp | {}", tick, player_health, rows.join(", "));
}
