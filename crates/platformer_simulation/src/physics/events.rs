//! Controller events

use bevy::prelude::*;

/// Event: jump request потреблён, vy выставлена в jump velocity
///
/// Генерируется: integrate_controller_velocity (FixedUpdate)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Jumped {
    pub entity: Entity,
    pub velocity: Vec2,
}

/// Event: переход airborne → floor contact
///
/// Генерируется resolver'ом (flat floor или rapier).
/// `impact_speed` — вертикальная скорость в момент касания (px/s, вниз).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Landed {
    pub entity: Entity,
    pub impact_speed: f32,
}

/// Скорость удара для `Landed`, если этот step перевёл тело на пол.
///
/// `velocity_y` — скорость ДО того как resolver погасил её в пол
/// (иначе на шаге касания получаем только остаток перемещения).
pub fn landing_impact(was_on_floor: bool, on_floor: bool, velocity_y: f32) -> Option<f32> {
    (on_floor && !was_on_floor).then_some(velocity_y.max(0.0))
}
