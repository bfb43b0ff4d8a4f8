//! Headless прогон platformer controller'а
//!
//! Персонаж падает на плоский пол, бежит вправо, прыгает, разворачивается.
//! Конфиг: `$PLATFORMER_CONFIG` или data/config/controller.toml.

use std::time::Duration;

use anyhow::Result;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use platformer_simulation::{
    create_headless_app, log_info, spawn_platformer_character, ControllerConfig, DirectionSignals,
    FlatFloorPlugin, KinematicBody, PlatformerPlugin, SpritePresenter, PHYSICS_HZ,
};

const TICKS: u32 = 600;

/// Скрипт input по номеру кадра
fn scripted_signals(tick: u32) -> DirectionSignals {
    let mut signals = match tick {
        0..=119 => DirectionSignals::default(),
        120..=359 => DirectionSignals::from_buttons(false, true, false, false),
        _ => DirectionSignals::from_buttons(true, false, false, false),
    };
    // Нажатие (не удержание) jump на двух кадрах
    signals.jump = matches!(tick, 200..=205 | 420..=425);
    signals
}

fn main() -> Result<()> {
    let config = ControllerConfig::load_default()?;

    let mut app = create_headless_app();
    app.add_plugins((PlatformerPlugin, FlatFloorPlugin::at(0.0)))
        // Каждый app.update() = ровно один кадр на частоте physics
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / PHYSICS_HZ,
        )));

    log_info(&format!("Starting headless platformer run: {:?}", config));

    let character = {
        let world = app.world_mut();
        let entity =
            spawn_platformer_character(&mut world.commands(), Vec2::new(0.0, -120.0), config);
        world.flush();
        entity
    };

    for tick in 0..TICKS {
        if let Some(mut signals) = app.world_mut().get_mut::<DirectionSignals>(character) {
            *signals = scripted_signals(tick);
        }

        app.update();

        if tick % 60 == 0 {
            let world = app.world();
            if let (Some(body), Some(sprite)) = (
                world.get::<KinematicBody>(character),
                world.get::<SpritePresenter>(character),
            ) {
                log_info(&format!(
                    "Tick {}: pos = ({:.1}, {:.1}) vel = ({:.1}, {:.1}) on_floor = {} anim = {} flip = {}",
                    tick,
                    body.position.x,
                    body.position.y,
                    body.velocity.x,
                    body.velocity.y,
                    body.on_floor,
                    sprite.animation.name(),
                    sprite.flip_h
                ));
            }
        }
    }

    log_info("Simulation complete!");
    Ok(())
}
