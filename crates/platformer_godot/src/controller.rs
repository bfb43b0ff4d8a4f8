//! PlatformerController — CharacterBody2D node поверх controller core
//!
//! Архитектура:
//! - process() (frame rate): Input.get_vector → ControllerInput, jump latch,
//!   flip/интерполяция/анимация AnimatedSprite2D
//! - physics_process() (physics rate): integrate_velocity → velocity → move_and_slide()
//!
//! Floor contact, агрегацию input и коллизии даёт Godot; node решает только
//! velocity. Вся арифметика в platformer_simulation (общая с headless тестами).

use bevy::prelude::Vec2;
use godot::classes::{AnimatedSprite2D, CharacterBody2D, Engine, ICharacterBody2D, Input};
use godot::prelude::*;
use platformer_simulation::input::to_raw;
use platformer_simulation::physics::{integrate_velocity, landing_impact};
use platformer_simulation::presenter::{flip_for_input, interpolate_position, select_animation};
use platformer_simulation::{
    AnimationKind, ControllerConfig, ControllerFeatures, ControllerInput, GravityMode,
};

use crate::logger::GodotLogger;

fn to_vec2(vector: Vector2) -> Vec2 {
    Vec2::new(vector.x, vector.y)
}

fn to_vector2(vector: Vec2) -> Vector2 {
    Vector2::new(vector.x, vector.y)
}

/// PlatformerController - 2D platformer персонаж
///
/// # Setup
/// - Скрипт на CharacterBody2D с дочерним AnimatedSprite2D (`sprite_path`)
/// - Input Map: actions `Left`, `Right`, `Up`, `Down`, `Jump` (имена экспортируются)
#[derive(GodotClass)]
#[class(base=CharacterBody2D)]
pub struct PlatformerController {
    /// Квантовать input по осям в {-1, 0, 1}
    #[export]
    use_raw_input: bool,
    #[export]
    horizontal_movement: bool,
    #[export]
    has_jump: bool,
    #[export]
    has_sprite_interpolation: bool,
    /// false = простой Euler без clamp (самая первая итерация)
    #[export]
    smoothed_gravity: bool,

    #[export]
    gravity: f32,
    #[export]
    terminal_velocity: f32,
    #[export]
    move_speed: f32,
    /// px/s за physics step
    #[export]
    acceleration: f32,
    /// px/s за physics step
    #[export]
    deceleration: f32,
    /// Отрицательная = вверх
    #[export]
    jump_velocity: f32,
    /// Секунды; <= 0 — request ждёт приземления сколь угодно долго
    #[export]
    jump_buffer: f32,
    #[export]
    input_deadzone: f32,

    #[export]
    sprite_path: NodePath,
    #[export]
    sprite_offset: f32,

    // Кэш имён actions, чтобы не создавать StringName каждый кадр
    #[export]
    action_left: StringName,
    #[export]
    action_right: StringName,
    #[export]
    action_up: StringName,
    #[export]
    action_down: StringName,
    #[export]
    action_jump: StringName,

    input: ControllerInput,
    sprite: Option<Gd<AnimatedSprite2D>>,
    animation: Option<AnimationKind>,
    was_on_floor: bool,
    // vy отданная в move_and_slide (до гашения об пол)
    slide_velocity_y: f32,

    base: Base<CharacterBody2D>,
}

#[godot_api]
impl ICharacterBody2D for PlatformerController {
    fn init(base: Base<CharacterBody2D>) -> Self {
        let defaults = ControllerConfig::default();

        Self {
            use_raw_input: defaults.features.raw_input,
            horizontal_movement: defaults.features.horizontal_movement,
            has_jump: defaults.features.has_jump,
            has_sprite_interpolation: defaults.features.has_sprite_interpolation,
            smoothed_gravity: defaults.features.gravity == GravityMode::Averaged,
            gravity: defaults.gravity,
            terminal_velocity: defaults.terminal_velocity,
            move_speed: defaults.move_speed,
            acceleration: defaults.acceleration,
            deceleration: defaults.deceleration,
            jump_velocity: defaults.jump_velocity,
            jump_buffer: defaults.jump_buffer.unwrap_or(0.0),
            input_deadzone: defaults.input_deadzone,
            sprite_path: NodePath::from("AnimatedSprite2D"),
            sprite_offset: defaults.sprite_offset,
            action_left: StringName::from("Left"),
            action_right: StringName::from("Right"),
            action_up: StringName::from("Up"),
            action_down: StringName::from("Down"),
            action_jump: StringName::from("Jump"),
            input: ControllerInput::default(),
            sprite: None,
            animation: None,
            was_on_floor: false,
            slide_velocity_y: 0.0,
            base,
        }
    }

    fn ready(&mut self) {
        platformer_simulation::logger::set_logger_if_needed(Box::new(GodotLogger));

        let path = self.sprite_path.clone();
        let sprite = self.base().try_get_node_as::<AnimatedSprite2D>(&path);

        match sprite {
            Some(mut sprite) => {
                // Интерполированный спрайт не должен ехать вместе с parent transform
                if self.has_sprite_interpolation {
                    sprite.set_as_top_level(true);
                }
                self.sprite = Some(sprite);
            }
            None => {
                platformer_simulation::log_error(&format!(
                    "PlatformerController: AnimatedSprite2D not found at path: {}",
                    path
                ));
            }
        }

        let on_floor = self.base().is_on_floor();
        self.was_on_floor = on_floor;
        platformer_simulation::log("PlatformerController ready");
    }

    fn process(&mut self, _delta: f64) {
        let config = self.config();
        self.gather_input(&config);
        self.present_sprite(&config);
    }

    fn physics_process(&mut self, delta: f64) {
        let config = self.config();
        self.calculate_velocity(&config, delta as f32);

        self.base_mut().move_and_slide();
        self.report_landing();
    }
}

#[godot_api]
impl PlatformerController {
    /// Jump request потреблён, аргумент — новая vy
    #[signal]
    fn jumped(velocity_y: f32);

    /// Переход airborne → floor, аргумент — скорость удара
    #[signal]
    fn landed(impact_speed: f32);

    /// Ждёт ли необработанный jump request приземления
    #[func]
    pub fn is_jump_requested(&self) -> bool {
        self.input.jump_request.is_raised()
    }

    /// Сбросить висящий jump request (например при смене уровня)
    #[func]
    pub fn clear_jump_request(&mut self) {
        self.input.jump_request.clear();
    }
}

impl PlatformerController {
    /// Экспортированные поля → ControllerConfig (дёшево, собираем каждый callback)
    fn config(&self) -> ControllerConfig {
        ControllerConfig {
            gravity: self.gravity,
            terminal_velocity: self.terminal_velocity,
            move_speed: self.move_speed,
            acceleration: self.acceleration,
            deceleration: self.deceleration,
            jump_velocity: self.jump_velocity,
            jump_buffer: (self.jump_buffer > 0.0).then_some(self.jump_buffer),
            input_deadzone: self.input_deadzone,
            sprite_offset: self.sprite_offset,
            features: ControllerFeatures {
                raw_input: self.use_raw_input,
                horizontal_movement: self.horizontal_movement,
                has_jump: self.has_jump,
                has_sprite_interpolation: self.has_sprite_interpolation,
                gravity: if self.smoothed_gravity {
                    GravityMode::Averaged
                } else {
                    GravityMode::Euler
                },
            },
        }
    }

    /// Frame: направление + edge-triggered jump
    fn gather_input(&mut self, config: &ControllerConfig) {
        let input = Input::singleton();

        let vector = input
            .get_vector_ex(
                &self.action_left,
                &self.action_right,
                &self.action_up,
                &self.action_down,
            )
            .deadzone(config.input_deadzone)
            .done();

        let direction = to_vec2(vector);
        self.input.direction = if config.features.raw_input {
            to_raw(direction)
        } else {
            direction
        };

        // is_action_just_pressed уже edge-triggered (press, не hold)
        if config.features.has_jump && input.is_action_just_pressed(&self.action_jump) {
            self.input.jump_request.raise();
        }
    }

    /// Physics: новая velocity для move_and_slide
    fn calculate_velocity(&mut self, config: &ControllerConfig, delta: f32) {
        let velocity = to_vec2(self.base().get_velocity());
        let on_floor = self.base().is_on_floor();

        let report = integrate_velocity(
            config,
            velocity,
            self.input.direction,
            on_floor,
            &mut self.input.jump_request,
            delta,
        );

        self.base_mut().set_velocity(to_vector2(report.velocity));
        // landed берёт скорость удара отсюда, а не из get_real_velocity
        self.slide_velocity_y = report.velocity.y;

        if report.jumped {
            platformer_simulation::log(&format!(
                "PlatformerController: jump! velocity.y = {:.1} px/s",
                report.velocity.y
            ));
            self.base_mut()
                .emit_signal(&StringName::from("jumped"), &[report.velocity.y.to_variant()]);
        }
    }

    /// После move_and_slide: сообщаем о приземлении
    fn report_landing(&mut self) {
        let on_floor = self.base().is_on_floor();
        let impact = landing_impact(self.was_on_floor, on_floor, self.slide_velocity_y);
        if let Some(impact_speed) = impact {
            self.base_mut()
                .emit_signal(&StringName::from("landed"), &[impact_speed.to_variant()]);
        }
        self.was_on_floor = on_floor;
    }

    /// Frame: flip, интерполяция позиции, анимация
    fn present_sprite(&mut self, config: &ControllerConfig) {
        let Some(mut sprite) = self.sprite.clone() else {
            return;
        };

        let flip = flip_for_input(self.input.direction.x, sprite.is_flipped_h());
        sprite.set_flip_h(flip);

        let body_position = to_vec2(self.base().get_global_position());
        let target = if config.features.has_sprite_interpolation {
            let fraction = Engine::singleton().get_physics_interpolation_fraction() as f32;
            interpolate_position(
                to_vec2(sprite.get_global_position()),
                body_position,
                config.sprite_offset,
                fraction,
            )
        } else {
            body_position + Vec2::new(0.0, config.sprite_offset)
        };
        sprite.set_global_position(to_vector2(target));

        let velocity = to_vec2(self.base().get_velocity());
        let animation = select_animation(velocity, self.base().is_on_floor());
        if self.animation != Some(animation) {
            self.play_animation(&mut sprite, animation);
            self.animation = Some(animation);
        }
    }

    fn play_animation(&self, sprite: &mut Gd<AnimatedSprite2D>, animation: AnimationKind) {
        let name = StringName::from(animation.name());

        let has_animation = sprite
            .get_sprite_frames()
            .is_some_and(|frames| frames.has_animation(&name));
        if !has_animation {
            return;
        }

        sprite.set_animation(&name);
        sprite.play();
    }
}
