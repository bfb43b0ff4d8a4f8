//! Platformer Simulation Core
//!
//! 2D platformer character controller: engine-agnostic арифметика +
//! ECS обвязка на Bevy 0.16.
//!
//! HYBRID ARCHITECTURE:
//! - core (integrator, input, presenter) = чистые функции, общие для всех движков
//! - Bevy = headless симуляция и тесты (FlatFloorPlugin / RapierResolverPlugin)
//! - Godot = CharacterBody2D node в platformer_godot (move_and_slide, is_on_floor)
//!
//! Поток данных одного персонажа:
//! ```text
//! Update:      DirectionSignals → ControllerInput (direction + jump latch)
//!                               → SpritePresenter (flip, interpolation, animation)
//! FixedUpdate: Contact → Integrate (velocity) → Resolve (position, floor contact)
//! ```

use bevy::prelude::*;

pub mod components;
pub mod config;
pub mod input;
pub mod latch;
pub mod logger;
pub mod physics;
pub mod presenter;

pub use components::*;
pub use config::{ControllerConfig, ControllerFeatures, ControllerPreset, GravityMode};
pub use input::{ControllerInput, DirectionSignals};
pub use latch::{EdgeTrigger, SignalLatch};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter, LOGGER_LEVEL,
};
pub use physics::{FlatFloor, FlatFloorPlugin, Jumped, Landed, RapierResolverPlugin};

/// Частота physics step (как physics_ticks_per_second в Godot)
pub const PHYSICS_HZ: f64 = 60.0;

/// Порядок систем controller'а
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    /// Update: сигналы → input вектор + jump latch
    Sample,
    /// Update: косметика спрайта
    Present,
    /// FixedUpdate: floor contact от прошлого движения (rapier)
    Contact,
    /// FixedUpdate: новая velocity
    Integrate,
    /// FixedUpdate: velocity → позиция
    Resolve,
}

/// Главный plugin controller'а (resolver добавляется отдельно)
pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Jumped>()
            .add_event::<Landed>()
            .configure_sets(Update, (ControllerSet::Sample, ControllerSet::Present).chain())
            .configure_sets(
                FixedUpdate,
                (
                    ControllerSet::Contact,
                    ControllerSet::Integrate,
                    ControllerSet::Resolve,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    input::sample_controller_input.in_set(ControllerSet::Sample),
                    presenter::present_sprites.in_set(ControllerSet::Present),
                ),
            )
            .add_systems(
                FixedUpdate,
                physics::integrate_controller_velocity.in_set(ControllerSet::Integrate),
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ));

    app
}

/// Spawn helper для персонажа без коллайдера (FlatFloorPlugin)
///
/// `position` в screen space (Y вниз).
pub fn spawn_platformer_character(
    commands: &mut Commands,
    position: Vec2,
    config: ControllerConfig,
) -> Entity {
    commands
        .spawn((
            PlatformerCharacter,
            config,
            DirectionSignals::default(),
            ControllerInput::default(),
            KinematicBody::at(position),
            SpritePresenter {
                position,
                ..default()
            },
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
