//! ECS Components персонажа
//!
//! - body: кинематическое тело (позиция, velocity, floor contact)
//! - sprite: состояние спрайта (flip, позиция отрисовки, анимация)
//!
//! Input компоненты живут в `crate::input`, конфиг в `crate::config`.

pub mod body;
pub mod sprite;

pub use body::*;
pub use sprite::*;
