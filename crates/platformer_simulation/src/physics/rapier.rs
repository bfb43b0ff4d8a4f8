//! Resolver через bevy_rapier2d KinematicCharacterController
//!
//! Архитектура:
//! - Rapier отвечает за коллизии и sliding (аналог move_and_slide)
//! - velocity интегрируем сами (integrator), rapier получает только перемещение
//! - floor contact = `KinematicCharacterControllerOutput::grounded`
//!
//! Rapier/Bevy живут в Y-вверх, controller в screen space (Y вниз):
//! на границе Y переворачивается.
//!
//! Rapier plugin регистрирует пользователь, в fixed schedule:
//! `RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(..).in_fixed_schedule()`.
//! Rapier тогда живёт в том же FixedUpdate: `ControllerSet::Resolve`
//! ставится до `PhysicsSet::SyncBackend`, иначе translation уедет на step позже.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::events::{landing_impact, Landed};
use crate::components::{KinematicBody, PlatformerCharacter, SpritePresenter};
use crate::config::ControllerConfig;
use crate::input::{ControllerInput, DirectionSignals};
use crate::{ControllerSet, PHYSICS_HZ};

fn to_world(screen: Vec2) -> Vec2 {
    Vec2::new(screen.x, -screen.y)
}

/// Physics system: результат прошлого rapier step → KinematicBody
///
/// Запускается ДО integrator'а: floor contact должен быть от прошлого движения.
pub fn read_rapier_contacts(
    mut query: Query<
        (
            Entity,
            &Transform,
            &mut KinematicBody,
            Option<&KinematicCharacterControllerOutput>,
        ),
        With<KinematicCharacterController>,
    >,
    mut landed_events: EventWriter<Landed>,
) {
    for (entity, transform, mut body, output) in query.iter_mut() {
        body.position = to_world(transform.translation.truncate());

        let Some(output) = output else {
            continue;
        };

        let was_on_floor = body.on_floor;
        let velocity_y = body.velocity.y;
        body.on_floor = output.grounded;

        if body.on_floor && velocity_y > 0.0 {
            body.velocity.y = 0.0;
        }

        if let Some(impact_speed) = landing_impact(was_on_floor, body.on_floor, velocity_y) {
            crate::logger::log(&format!(
                "Entity {:?}: landed on collider at x = {:.1} (impact {:.1} px/s)",
                entity, body.position.x, impact_speed
            ));
            landed_events.write(Landed {
                entity,
                impact_speed,
            });
        }
    }
}

/// Physics system: velocity → желаемое перемещение для rapier
pub fn write_rapier_translation(
    mut query: Query<(&KinematicBody, &mut KinematicCharacterController)>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (body, mut controller) in query.iter_mut() {
        controller.translation = Some(to_world(body.velocity) * dt);
    }
}

/// Plugin resolver'а на rapier (сам RapierPhysicsPlugin не добавляет)
///
/// Rapier шагает тем же dt что и integrator: `TimestepMode::Fixed`.
pub struct RapierResolverPlugin;

impl Plugin for RapierResolverPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TimestepMode::Fixed {
            dt: (1.0 / PHYSICS_HZ) as f32,
            substeps: 1,
        })
        .configure_sets(
            FixedUpdate,
            ControllerSet::Resolve.before(PhysicsSet::SyncBackend),
        )
        .add_systems(
            FixedUpdate,
            (
                read_rapier_contacts.in_set(ControllerSet::Contact),
                write_rapier_translation.in_set(ControllerSet::Resolve),
            ),
        );
    }
}

/// Spawn helper для персонажа с rapier коллайдером
///
/// - `position` в screen space (Y вниз)
/// - капсула 16x28 px, KinematicPositionBased + KinematicCharacterController
pub fn spawn_rapier_character(
    commands: &mut Commands,
    position: Vec2,
    config: ControllerConfig,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(to_world(position).extend(0.0)),
            PlatformerCharacter,
            config,
            DirectionSignals::default(),
            ControllerInput::default(),
            KinematicBody::at(position),
            SpritePresenter {
                position,
                ..default()
            },
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(6.0, 8.0),
            KinematicCharacterController::default(),
        ))
        .id()
}
