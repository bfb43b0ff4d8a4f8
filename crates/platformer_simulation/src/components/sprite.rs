//! Sprite Presenter компонент (чисто косметика, в velocity не пишет)

use bevy::prelude::*;

/// Какую анимацию играет спрайт
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AnimationKind {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
}

impl AnimationKind {
    /// Имя анимации в SpriteFrames
    pub fn name(&self) -> &'static str {
        match self {
            AnimationKind::Idle => "Idle",
            AnimationKind::Run => "Run",
            AnimationKind::Jump => "Jump",
            AnimationKind::Fall => "Fall",
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpritePresenter {
    /// Позиция отрисовки (догоняет body, см. `presenter::interpolate_position`)
    pub position: Vec2,
    pub flip_h: bool,
    pub animation: AnimationKind,
}
