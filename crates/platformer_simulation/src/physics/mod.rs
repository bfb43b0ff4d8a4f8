//! Physics side controller'а (FixedUpdate)
//!
//! - integrator: чистая арифметика одного step
//! - movement: ECS system integrator'а + headless resolver (плоский пол)
//! - rapier: resolver через bevy_rapier2d KinematicCharacterController
//! - events: Jumped / Landed

pub mod events;
pub mod integrator;
pub mod movement;
pub mod rapier;

pub use events::*;
pub use integrator::{integrate_velocity, move_toward, StepReport};
pub use movement::{integrate_controller_velocity, resolve_flat_floor, FlatFloor, FlatFloorPlugin};
pub use rapier::{spawn_rapier_character, RapierResolverPlugin};
