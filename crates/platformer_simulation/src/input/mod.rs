//! Input Sampler — frame-rate сторона controller'а
//!
//! ```text
//! DirectionSignals (4 силы + jump held)
//!     ↓  aggregate_direction (deadzone, clamp до единичной длины)
//!     ↓  to_raw (если raw_input)
//! ControllerInput.direction
//!     +  EdgeTrigger → ControllerInput.jump_request (SignalLatch)
//! ```
//!
//! Godot сам агрегирует вектор (`Input.get_vector`), headless/ECS версия
//! повторяет ту же формулу здесь.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::latch::{EdgeTrigger, SignalLatch};

/// Сырые сигналы направлений (сила 0..=1, кнопка = 0 или 1)
///
/// Для headless тестов — mock input через этот компонент.
/// Для игры — заполняется из устройства ввода.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DirectionSignals {
    pub left: f32,
    pub right: f32,
    pub up: f32,
    pub down: f32,
    /// Jump action удерживается (edge ловит sampler)
    pub jump: bool,
}

impl DirectionSignals {
    /// Цифровые кнопки → силы 0/1
    pub fn from_buttons(left: bool, right: bool, up: bool, down: bool) -> Self {
        let strength = |pressed: bool| if pressed { 1.0 } else { 0.0 };
        Self {
            left: strength(left),
            right: strength(right),
            up: strength(up),
            down: strength(down),
            jump: false,
        }
    }
}

/// Результат сэмплинга, читается physics step'ом и presenter'ом
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ControllerInput {
    /// Направление (Y вниз)
    pub direction: Vec2,
    pub jump_request: SignalLatch,
    pub jump_edge: EdgeTrigger,
}

impl ControllerInput {
    /// Один кадр: обновить направление и, на нажатии, поднять jump request
    pub fn sample(&mut self, signals: &DirectionSignals, config: &ControllerConfig) {
        self.direction = sample_direction(signals, config);

        let pressed = self.jump_edge.just_pressed(signals.jump);
        if pressed && config.features.has_jump {
            self.jump_request.raise();
        }
    }
}

/// Направление с учётом deadzone и raw режима
pub fn sample_direction(signals: &DirectionSignals, config: &ControllerConfig) -> Vec2 {
    let direction = aggregate_direction(
        signals.left,
        signals.right,
        signals.up,
        signals.down,
        config.input_deadzone,
    );

    if config.features.raw_input {
        to_raw(direction)
    } else {
        direction
    }
}

/// Верхняя граница deadzone: при 1.0 перемасштабирование делит на ноль
pub const MAX_DEADZONE: f32 = 0.99;

/// Deadzone в рабочем диапазоне `[0, MAX_DEADZONE]`.
/// Отрицательное значение (Godot: "взять deadzone action'а") → 0.
pub fn clamp_deadzone(deadzone: f32) -> f32 {
    if deadzone.is_nan() {
        return 0.0;
    }
    deadzone.clamp(0.0, MAX_DEADZONE)
}

/// Четыре силы → вектор, как `Input.get_vector`:
/// длина <= deadzone → ноль, длина > 1 → нормализация,
/// иначе длина перемасштабируется из [deadzone, 1] в [0, 1].
pub fn aggregate_direction(
    negative_x: f32,
    positive_x: f32,
    negative_y: f32,
    positive_y: f32,
    deadzone: f32,
) -> Vec2 {
    let vector = Vec2::new(positive_x - negative_x, positive_y - negative_y);
    let length = vector.length();
    let deadzone = clamp_deadzone(deadzone);

    if length == 0.0 || length <= deadzone {
        Vec2::ZERO
    } else if length > 1.0 {
        vector / length
    } else {
        let rescaled = (length - deadzone) / (1.0 - deadzone);
        vector * (rescaled / length)
    }
}

/// Каждая ненулевая компонента → ±1 (8 направлений независимо от аналоговой силы)
pub fn to_raw(vector: Vec2) -> Vec2 {
    Vec2::new(sign(vector.x), sign(vector.y))
}

/// Знак с нулём: `f32::signum(0.0) == 1.0`, нам нужен 0
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Frame system: DirectionSignals → ControllerInput
pub fn sample_controller_input(
    mut query: Query<(&DirectionSignals, &ControllerConfig, &mut ControllerInput)>,
) {
    for (signals, config, mut input) in query.iter_mut() {
        input.sample(signals, config);
    }
}
