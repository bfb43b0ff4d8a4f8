//! Кинематическое тело персонажа

use bevy::prelude::*;

/// Marker: entity управляется platformer controller'ом
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlatformerCharacter;

/// Состояние тела, которое видит controller
///
/// Координаты screen space (Y вниз), как у CharacterBody2D.
/// - `velocity` пишет integrator (FixedUpdate)
/// - `position` и `on_floor` пишет resolver после движения
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Floor contact после последнего resolve
    pub on_floor: bool,
}

impl KinematicBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..default()
        }
    }
}
