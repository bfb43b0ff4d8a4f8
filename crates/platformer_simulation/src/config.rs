//! Конфигурация controller'а: один компонент вместо параллельных копий
//!
//! Итерации контроллера (только гравитация → ходьба → прыжок → сглаживание
//! спрайта) выражены через `ControllerFeatures` + `ControllerPreset`.
//!
//! Единицы: пиксели и секунды, ось Y смотрит ВНИЗ (screen space).
//! `acceleration`/`deceleration` применяются за один physics step, без `dt`.

use anyhow::{ensure, Context, Result};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env override пути к TOML конфигу (headless runner)
pub const CONFIG_PATH_ENV: &str = "PLATFORMER_CONFIG";

/// Как интегрируется вертикальная скорость в воздухе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "snake_case")]
pub enum GravityMode {
    /// `vy += gravity * dt` каждый step, без проверки пола и без clamp
    Euler,
    /// Среднее между скоростью до и после шага, clamp по terminal velocity,
    /// на полу гравитация не применяется
    #[default]
    Averaged,
}

/// Переключатели возможностей (что включено в данной итерации)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct ControllerFeatures {
    /// Квантовать input по осям в {-1, 0, 1}
    pub raw_input: bool,
    pub horizontal_movement: bool,
    pub has_jump: bool,
    /// Спрайт догоняет body через physics interpolation fraction
    pub has_sprite_interpolation: bool,
    pub gravity: GravityMode,
}

impl Default for ControllerFeatures {
    fn default() -> Self {
        Self {
            raw_input: true,
            horizontal_movement: true,
            has_jump: true,
            has_sprite_interpolation: true,
            gravity: GravityMode::Averaged,
        }
    }
}

/// Параметры controller'а (per-instance, transient)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct ControllerConfig {
    /// px/s²
    pub gravity: f32,
    /// Потолок вертикальной скорости (вниз), px/s
    pub terminal_velocity: f32,
    /// px/s
    pub move_speed: f32,
    /// px/s за step, когда направление input совпадает с направлением движения
    pub acceleration: f32,
    /// px/s за step при развороте или остановке
    pub deceleration: f32,
    /// Вертикальная скорость прыжка (отрицательная = вверх)
    pub jump_velocity: f32,
    /// Сколько секунд живёт необработанный jump request.
    /// `None` = ждёт приземления сколь угодно долго.
    pub jump_buffer: Option<f32>,
    /// Deadzone агрегации направленного input
    pub input_deadzone: f32,
    /// Вертикальное смещение спрайта относительно body
    pub sprite_offset: f32,
    pub features: ControllerFeatures,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            terminal_velocity: 600.0,
            move_speed: 100.0,
            acceleration: 7.0,
            deceleration: 10.0,
            jump_velocity: -300.0,
            jump_buffer: None,
            input_deadzone: 0.5,
            sprite_offset: 0.0,
            features: ControllerFeatures::default(),
        }
    }
}

/// Итерации контроллера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPreset {
    /// Только Euler гравитация, никакого input
    Falling,
    /// Сглаженная гравитация + ускорение по X + raw input + flip спрайта
    Walking,
    /// Walking + прыжок
    Jumping,
    /// Jumping + интерполяция позиции спрайта
    Smoothed,
}

impl ControllerPreset {
    pub fn config(self) -> ControllerConfig {
        let base = ControllerConfig::default();
        let features = match self {
            ControllerPreset::Falling => ControllerFeatures {
                raw_input: false,
                horizontal_movement: false,
                has_jump: false,
                has_sprite_interpolation: false,
                gravity: GravityMode::Euler,
            },
            ControllerPreset::Walking => ControllerFeatures {
                has_jump: false,
                has_sprite_interpolation: false,
                ..default()
            },
            ControllerPreset::Jumping => ControllerFeatures {
                has_sprite_interpolation: false,
                ..default()
            },
            ControllerPreset::Smoothed => ControllerFeatures::default(),
        };

        ControllerConfig { features, ..base }
    }
}

impl From<ControllerPreset> for ControllerConfig {
    fn from(preset: ControllerPreset) -> Self {
        preset.config()
    }
}

/// TOML представление: опциональный preset + overrides поверх него
#[derive(Debug, Clone, Deserialize)]
struct ControllerFile {
    preset: Option<ControllerPreset>,
    #[serde(default)]
    controller: Option<toml::Table>,
}

impl ControllerConfig {
    /// Парсит TOML: `preset = "..."` выбирает базу, таблица `[controller]`
    /// перекрывает отдельные поля.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ControllerFile = toml::from_str(text).context("parse controller TOML")?;
        let base = file.preset.map(ControllerPreset::config).unwrap_or_default();

        let Some(overrides) = file.controller else {
            return Ok(base);
        };

        // Накладываем overrides на сериализованную базу, чтобы preset
        // сохранял поля которых нет в файле
        let mut merged =
            toml::Value::try_from(&base).context("serialize base controller config")?;
        if let toml::Value::Table(table) = &mut merged {
            merge_tables(table, overrides);
        }

        let config: Self = merged
            .try_into()
            .context("apply [controller] overrides")?;
        config.validate()?;
        Ok(config)
    }

    /// Значения, на которых арифметика controller'а вырождается
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..1.0).contains(&self.input_deadzone),
            "input_deadzone must be in [0, 1), got {}",
            self.input_deadzone
        );
        ensure!(
            self.terminal_velocity >= 0.0,
            "terminal_velocity must be non-negative, got {}",
            self.terminal_velocity
        );
        if let Some(buffer) = self.jump_buffer {
            ensure!(buffer >= 0.0, "jump_buffer must be non-negative, got {}", buffer);
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("load {}", path.display()))
    }

    /// Конфиг из `$PLATFORMER_CONFIG` или `data/config/controller.toml`;
    /// нет файла → defaults.
    pub fn load_default() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_root().join("config/controller.toml"));

        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

fn data_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() {
        ws
    } else {
        here.join("data")
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(patch) => match base.get_mut(&key) {
                Some(toml::Value::Table(inner)) => merge_tables(inner, patch),
                _ => {
                    base.insert(key, toml::Value::Table(patch));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = ControllerConfig::default();
        assert_eq!(config.gravity, 800.0);
        assert_eq!(config.terminal_velocity, 600.0);
        assert_eq!(config.move_speed, 100.0);
        assert_eq!(config.acceleration, 7.0);
        assert_eq!(config.deceleration, 10.0);
        assert!(config.jump_velocity < 0.0, "jump must point up (screen space)");
        assert!(config.jump_buffer.is_none());
        assert!(config.features.raw_input);
    }

    #[test]
    fn test_presets_enable_features_incrementally() {
        let falling = ControllerPreset::Falling.config();
        assert_eq!(falling.features.gravity, GravityMode::Euler);
        assert!(!falling.features.horizontal_movement);

        let walking = ControllerPreset::Walking.config();
        assert!(walking.features.horizontal_movement);
        assert!(!walking.features.has_jump);

        let jumping = ControllerPreset::Jumping.config();
        assert!(jumping.features.has_jump);
        assert!(!jumping.features.has_sprite_interpolation);

        let smoothed: ControllerConfig = ControllerPreset::Smoothed.into();
        assert_eq!(smoothed, ControllerConfig::default());
    }

    #[test]
    fn test_toml_preset_with_overrides() {
        let text = r#"
            preset = "jumping"

            [controller]
            move_speed = 150.0
            jump_buffer = 0.1

            [controller.features]
            raw_input = false
        "#;

        let config = ControllerConfig::from_toml_str(text).expect("valid toml");
        assert_eq!(config.move_speed, 150.0);
        assert_eq!(config.jump_buffer, Some(0.1));
        assert!(!config.features.raw_input);
        // Остальное взято из preset
        assert!(config.features.has_jump);
        assert!(!config.features.has_sprite_interpolation);
        assert_eq!(config.gravity, 800.0);
    }

    #[test]
    fn test_toml_empty_file_is_default() {
        let config = ControllerConfig::from_toml_str("").expect("empty toml");
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_toml_rejects_wrong_types() {
        let text = "[controller]\ngravity = \"heavy\"\n";
        assert!(ControllerConfig::from_toml_str(text).is_err());
    }

    #[test]
    fn test_toml_rejects_deadzone_out_of_range() {
        let negative = "[controller]\ninput_deadzone = -1.0\n";
        assert!(ControllerConfig::from_toml_str(negative).is_err());

        let full = "[controller]\ninput_deadzone = 1.0\n";
        assert!(ControllerConfig::from_toml_str(full).is_err());

        let zero = "[controller]\ninput_deadzone = 0.0\n";
        let config = ControllerConfig::from_toml_str(zero).expect("zero deadzone is valid");
        assert_eq!(config.input_deadzone, 0.0);
    }

    #[test]
    fn test_toml_rejects_unknown_preset() {
        assert!(ControllerConfig::from_toml_str("preset = \"dashing\"").is_err());
    }
}
