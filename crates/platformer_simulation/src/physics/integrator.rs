//! Velocity Integrator — чистая арифметика одного physics step
//!
//! Не знает ни про ECS, ни про Godot: на вход предыдущая velocity, `dt`,
//! input, floor contact и jump request; на выход новая velocity, которую
//! resolver (move_and_slide / rapier / flat floor) превращает в позицию.
//!
//! Ось Y смотрит вниз: гравитация положительная, прыжок отрицательный.

use bevy::prelude::*;

use crate::config::{ControllerConfig, GravityMode};
use crate::input::sign;
use crate::latch::SignalLatch;

/// Что произошло за step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub velocity: Vec2,
    /// Jump request был потреблён на этом step
    pub jumped: bool,
}

/// Полный step: вертикаль, затем горизонталь.
///
/// `jump_request` потребляется только при floor contact; иначе стареет
/// согласно `config.jump_buffer`.
pub fn integrate_velocity(
    config: &ControllerConfig,
    velocity: Vec2,
    direction: Vec2,
    on_floor: bool,
    jump_request: &mut SignalLatch,
    dt: f32,
) -> StepReport {
    let (vertical, jumped) = integrate_vertical(config, velocity.y, on_floor, jump_request, dt);

    let horizontal = if config.features.horizontal_movement {
        integrate_horizontal(config, velocity.x, direction.x)
    } else {
        velocity.x
    };

    StepReport {
        velocity: Vec2::new(horizontal, vertical),
        jumped,
    }
}

/// Вертикальная компонента + разрешение прыжка
pub fn integrate_vertical(
    config: &ControllerConfig,
    velocity_y: f32,
    on_floor: bool,
    jump_request: &mut SignalLatch,
    dt: f32,
) -> (f32, bool) {
    if config.features.has_jump && jump_request.take_if(on_floor) {
        return (config.jump_velocity, true);
    }

    // Request не потреблён (в воздухе) — стареет
    jump_request.age_by(dt, config.jump_buffer);

    let velocity_y = match config.features.gravity {
        GravityMode::Euler => velocity_y + config.gravity * dt,
        GravityMode::Averaged if on_floor => velocity_y,
        GravityMode::Averaged => {
            averaged_gravity(velocity_y, config.gravity, config.terminal_velocity, dt)
        }
    };

    (velocity_y, false)
}

/// Semi-implicit шаг: среднее между скоростью до и после интеграции,
/// верхний clamp по `terminal_velocity`, нижнего нет.
pub fn averaged_gravity(velocity_y: f32, gravity: f32, terminal_velocity: f32, dt: f32) -> f32 {
    let next = (velocity_y + gravity * dt).min(terminal_velocity);
    (velocity_y + next) * 0.5
}

/// Горизонтальная компонента: move-toward к `direction_x * move_speed`.
///
/// Знак input совпадает со знаком velocity → `acceleration`,
/// иначе (разворот, старт с места, остановка) → `deceleration`.
pub fn integrate_horizontal(config: &ControllerConfig, velocity_x: f32, direction_x: f32) -> f32 {
    let target = direction_x * config.move_speed;
    let rate = if sign(direction_x) == sign(velocity_x) {
        config.acceleration
    } else {
        config.deceleration
    };

    move_toward(velocity_x, target, rate)
}

/// Линейное приближение к `to` не более чем на `delta`, без перелёта
pub fn move_toward(from: f32, to: f32, delta: f32) -> f32 {
    let diff = to - from;
    if diff.abs() <= delta {
        to
    } else {
        from + sign(diff) * delta
    }
}
