//! Rapier resolver integration test
//!
//! Headless App: PlatformerPlugin + RapierResolverPlugin + RapierPhysicsPlugin
//! в fixed schedule, статичный пол-коллайдер. Время двигаем через
//! `TimeUpdateStrategy::ManualDuration`: один `app.update()` = один physics step.
//!
//! Проверяем:
//! - floor contact берётся из `KinematicCharacterControllerOutput::grounded`
//! - Landed приходит ровно один раз
//! - прыжок уводит тело вверх (screen Y вниз, rapier Y вверх)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use bevy_rapier2d::prelude::*;
use platformer_simulation::physics::spawn_rapier_character;
use platformer_simulation::{
    create_headless_app, ControllerConfig, DirectionSignals, Jumped, KinematicBody, Landed,
    PlatformerPlugin, RapierResolverPlugin, PHYSICS_HZ,
};

const PIXELS_PER_METER: f32 = 100.0;

/// Верх пола в world координатах (y = 0)
const FLOOR_HALF_HEIGHT: f32 = 10.0;

/// Капсула персонажа: half_height 6 + radius 8
const CHARACTER_HALF_HEIGHT: f32 = 14.0;

/// События за весь прогон (Events<T> чистятся каждые два update)
#[derive(Resource, Default)]
struct EventLog {
    landed: Vec<Landed>,
    jumped: Vec<Jumped>,
}

fn record_events(
    mut landed: EventReader<Landed>,
    mut jumped: EventReader<Jumped>,
    mut event_log: ResMut<EventLog>,
) {
    event_log.landed.extend(landed.read().copied());
    event_log.jumped.extend(jumped.read().copied());
}

fn create_rapier_app() -> App {
    let mut app = create_headless_app();
    app.add_plugins((
        TransformPlugin,
        PlatformerPlugin,
        RapierResolverPlugin,
        RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(PIXELS_PER_METER).in_fixed_schedule(),
    ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / PHYSICS_HZ,
    )))
    .init_resource::<EventLog>()
    .add_systems(Update, record_events);

    app.finish();
    app.cleanup();

    // Startup (rapier context в PreStartup); первый update идёт с нулевым delta
    app.update();
    app
}

fn spawn_world(app: &mut App, position: Vec2) -> Entity {
    let world = app.world_mut();
    world.spawn((
        Transform::from_xyz(0.0, -FLOOR_HALF_HEIGHT, 0.0),
        Collider::cuboid(400.0, FLOOR_HALF_HEIGHT),
    ));

    let character =
        spawn_rapier_character(&mut world.commands(), position, ControllerConfig::default());
    world.flush();
    character
}

fn body(app: &App, entity: Entity) -> KinematicBody {
    *app.world()
        .get::<KinematicBody>(entity)
        .expect("character has KinematicBody")
}

fn world_y(app: &App, entity: Entity) -> f32 {
    app.world()
        .get::<Transform>(entity)
        .expect("character has Transform")
        .translation
        .y
}

fn event_log(app: &App) -> &EventLog {
    app.world().resource::<EventLog>()
}

/// Падение до floor contact
fn land(app: &mut App, entity: Entity) {
    for _ in 0..240 {
        app.update();
        if body(app, entity).on_floor {
            return;
        }
    }
    panic!("character never landed: {:?}", body(app, entity));
}

#[test]
fn test_rapier_floor_contact_and_single_landing() {
    let mut app = create_rapier_app();
    let character = spawn_world(&mut app, Vec2::new(0.0, -100.0));

    land(&mut app, character);

    let output = app
        .world()
        .get::<KinematicCharacterControllerOutput>(character)
        .expect("rapier wrote controller output");
    assert!(output.grounded);

    // Стоим на полу: центр капсулы на половину высоты над ним (Y вниз → минус)
    let landed = body(&app, character);
    assert_eq!(landed.velocity.y, 0.0);
    assert!(
        (landed.position.y + CHARACTER_HALF_HEIGHT).abs() < 1.0,
        "resting at {:?}",
        landed.position
    );

    let events = event_log(&app);
    assert_eq!(events.landed.len(), 1);
    assert_eq!(events.landed[0].entity, character);
    assert!(events.landed[0].impact_speed > 0.0);

    // Покой на полу: контакт держится, повторных Landed нет
    for _ in 0..30 {
        app.update();
    }

    let resting = body(&app, character);
    assert!(resting.on_floor);
    assert_eq!(resting.velocity, Vec2::ZERO);
    assert!((resting.position.y - landed.position.y).abs() < 0.5);
    assert_eq!(event_log(&app).landed.len(), 1);
}

#[test]
fn test_rapier_jump_consumed_on_floor_moves_up() {
    let mut app = create_rapier_app();
    let config = ControllerConfig::default();
    let character = spawn_world(&mut app, Vec2::new(0.0, -60.0));

    land(&mut app, character);
    for _ in 0..5 {
        app.update();
    }
    let rest_screen_y = body(&app, character).position.y;
    let rest_world_y = world_y(&app, character);

    *app.world_mut()
        .get_mut::<DirectionSignals>(character)
        .expect("character has DirectionSignals") = DirectionSignals {
        jump: true,
        ..default()
    };

    // Request поднимается в Update, потребляется следующим physics step
    for _ in 0..3 {
        app.update();
        if !event_log(&app).jumped.is_empty() {
            break;
        }
    }

    let events = event_log(&app);
    assert_eq!(events.jumped.len(), 1);
    assert_eq!(events.jumped[0].velocity.y, config.jump_velocity);

    for _ in 0..3 {
        app.update();
    }

    let airborne = body(&app, character);
    assert!(!airborne.on_floor);
    assert!(airborne.velocity.y < 0.0, "still rising (screen space)");
    // Screen Y уменьшается, rapier Y растёт
    assert!(
        airborne.position.y < rest_screen_y - 5.0,
        "screen y {} vs rest {}",
        airborne.position.y,
        rest_screen_y
    );
    assert!(world_y(&app, character) > rest_world_y + 5.0);

    // Удержание кнопки не прыгает повторно, подъём не считается приземлением
    assert_eq!(event_log(&app).jumped.len(), 1);
    assert_eq!(event_log(&app).landed.len(), 1);
}
