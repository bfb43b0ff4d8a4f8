//! Kinematic движение в ECS
//!
//! Архитектура:
//! - `integrate_controller_velocity` — integrator, решает ТОЛЬКО velocity
//! - resolver превращает velocity в позицию и считает floor contact
//!   (`FlatFloorPlugin` для headless, `RapierResolverPlugin` для коллизий)
//!
//! Оба работают в FixedUpdate, порядок задают `ControllerSet`.

use bevy::prelude::*;

use super::events::{landing_impact, Jumped, Landed};
use super::integrator::integrate_velocity;
use crate::components::KinematicBody;
use crate::config::ControllerConfig;
use crate::input::ControllerInput;
use crate::ControllerSet;

/// Physics system: ControllerInput + KinematicBody → новая velocity
pub fn integrate_controller_velocity(
    mut query: Query<(Entity, &ControllerConfig, &mut ControllerInput, &mut KinematicBody)>,
    mut jumped_events: EventWriter<Jumped>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (entity, config, mut input, mut body) in query.iter_mut() {
        let direction = input.direction;
        let report = integrate_velocity(
            config,
            body.velocity,
            direction,
            body.on_floor,
            &mut input.jump_request,
            dt,
        );

        body.velocity = report.velocity;

        if report.jumped {
            crate::logger::log(&format!(
                "Entity {:?}: jump! velocity.y = {:.1} px/s",
                entity, report.velocity.y
            ));
            jumped_events.write(Jumped {
                entity,
                velocity: report.velocity,
            });
        }
    }
}

/// Горизонтальный пол на высоте `y` (Y вниз: всё что `>= y` — под полом)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FlatFloor {
    pub y: f32,
}

impl Default for FlatFloor {
    fn default() -> Self {
        Self { y: 0.0 }
    }
}

/// Результат resolve одного тела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveOutcome {
    /// Тело только что коснулось пола; значение — скорость удара
    pub landed: Option<f32>,
}

/// Move-and-slide против плоского пола:
/// `position += velocity * dt`, тело под полом поднимается на пол,
/// скорость в пол гасится.
pub fn resolve_flat_floor(body: &mut KinematicBody, floor: &FlatFloor, dt: f32) -> ResolveOutcome {
    let was_on_floor = body.on_floor;
    let velocity_y = body.velocity.y;
    body.position += body.velocity * dt;

    body.on_floor = body.position.y >= floor.y && velocity_y >= 0.0;

    if body.on_floor {
        body.position.y = floor.y;
        body.velocity.y = 0.0;
    }

    ResolveOutcome {
        landed: landing_impact(was_on_floor, body.on_floor, velocity_y),
    }
}

/// Physics system: headless resolver
pub fn resolve_flat_floor_movement(
    mut query: Query<(Entity, &mut KinematicBody)>,
    mut landed_events: EventWriter<Landed>,
    floor: Res<FlatFloor>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (entity, mut body) in query.iter_mut() {
        let outcome = resolve_flat_floor(&mut body, &floor, dt);

        if let Some(impact_speed) = outcome.landed {
            crate::logger::log(&format!(
                "Entity {:?}: landed at x = {:.1} (impact {:.1} px/s)",
                entity, body.position.x, impact_speed
            ));
            landed_events.write(Landed {
                entity,
                impact_speed,
            });
        }
    }
}

/// Plugin headless resolver'а (без коллайдеров, только плоский пол)
#[derive(Default)]
pub struct FlatFloorPlugin {
    pub floor: FlatFloor,
}

impl FlatFloorPlugin {
    pub fn at(y: f32) -> Self {
        Self {
            floor: FlatFloor { y },
        }
    }
}

impl Plugin for FlatFloorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.floor).add_systems(
            FixedUpdate,
            resolve_flat_floor_movement.in_set(ControllerSet::Resolve),
        );
    }
}
