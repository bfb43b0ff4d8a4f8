use godot::prelude::*;

mod controller;
mod logger;

pub use controller::PlatformerController;

/// GDExtension entry point
struct PlatformerExtension;

#[gdextension]
unsafe impl ExtensionLibrary for PlatformerExtension {}
