//! Sprite Presenter — flip, сглаживание позиции, выбор анимации
//!
//! Параллельный потребитель input и позиции body, обратной связи в
//! velocity нет. Работает на frame rate (Update).

use bevy::prelude::*;

use crate::components::{AnimationKind, KinematicBody, SpritePresenter};
use crate::config::ControllerConfig;
use crate::input::ControllerInput;

/// >0 → смотрим вправо, <0 → влево, 0 → оставляем как было
pub fn flip_for_input(direction_x: f32, current: bool) -> bool {
    if direction_x < 0.0 {
        true
    } else if direction_x > 0.0 {
        false
    } else {
        current
    }
}

/// Спрайт догоняет `body + (0, offset)` на долю `fraction` (0..=1)
pub fn interpolate_position(sprite: Vec2, body: Vec2, offset: f32, fraction: f32) -> Vec2 {
    let target = body + Vec2::new(0.0, offset);
    sprite.lerp(target, fraction.clamp(0.0, 1.0))
}

/// Анимация по состоянию тела (Y вниз: vy < 0 — подъём)
pub fn select_animation(velocity: Vec2, on_floor: bool) -> AnimationKind {
    if on_floor {
        if velocity.x != 0.0 {
            AnimationKind::Run
        } else {
            AnimationKind::Idle
        }
    } else if velocity.y < 0.0 {
        AnimationKind::Jump
    } else {
        AnimationKind::Fall
    }
}

/// Frame system: flip + позиция + анимация
pub fn present_sprites(
    mut query: Query<(
        &ControllerInput,
        &KinematicBody,
        &ControllerConfig,
        &mut SpritePresenter,
    )>,
    time: Res<Time<Fixed>>,
) {
    let fraction = time.overstep_fraction();

    for (input, body, config, mut sprite) in query.iter_mut() {
        sprite.flip_h = flip_for_input(input.direction.x, sprite.flip_h);

        sprite.position = if config.features.has_sprite_interpolation {
            interpolate_position(sprite.position, body.position, config.sprite_offset, fraction)
        } else {
            body.position + Vec2::new(0.0, config.sprite_offset)
        };

        let animation = select_animation(body.velocity, body.on_floor);
        if animation != sprite.animation {
            crate::logger::log(&format!(
                "sprite animation {} → {}",
                sprite.animation.name(),
                animation.name()
            ));
            sprite.animation = animation;
        }
    }
}
