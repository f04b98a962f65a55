//! Asteroids demo
//!
//! Two scenes composed from stock and game-side systems: an asteroid field with
//! a steerable ship, and a hangar. WASD/arrows steer, scrolling moves the ship
//! in depth, clicking spawns an asteroid, TAB switches scenes and ESC quits.
//!
//! Usage: `demo [config.toml|config.ron]`. Without the `glfw` feature the demo
//! replays a short scripted session on the headless backend.

mod scenes;
mod systems;

use std::error::Error;

use ecs_engine::foundation::logging;
use ecs_engine::prelude::*;

fn load_args() -> Result<WindowArgs, ConfigError> {
    let args = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading window configuration from {}", path);
            WindowArgs::load_from_file(path)?
        }
        None => WindowArgs::default(),
    };
    Ok(args.with_title("Asteroids"))
}

fn run<B: Backend>(args: WindowArgs, backend: B) -> Result<(), WindowError> {
    let mut window = Window::new(args, backend);
    window.add_scenes([scenes::field(), scenes::hangar()]);
    window.spawn()
}

#[cfg(feature = "glfw")]
fn backend() -> Result<ecs_engine::backend::GlfwBackend, BackendError> {
    ecs_engine::backend::GlfwBackend::new()
}

/// Scripted session: steer, spawn, switch to the hangar and back, quit
#[cfg(not(feature = "glfw"))]
fn backend() -> Result<HeadlessBackend, BackendError> {
    let key = |key, pressed| RawEvent::Key {
        key,
        scancode: 0,
        pressed,
        modifiers: Modifiers::empty(),
        timestamp: 0.0,
    };
    let idle = |frames| std::iter::repeat_with(Vec::new).take(frames);

    let mut script = vec![vec![key(keys::W, true)]];
    script.extend(idle(30));
    script.push(vec![
        key(keys::W, false),
        RawEvent::MouseButton {
            button: 0,
            pressed: true,
            x: 600.0,
            y: 200.0,
            timestamp: 0.5,
        },
    ]);
    script.extend(idle(30));
    script.push(vec![key(keys::TAB, true), key(keys::TAB, false)]);
    script.extend(idle(60));
    script.push(vec![key(keys::TAB, true), key(keys::TAB, false)]);
    script.extend(idle(10));
    script.push(vec![key(keys::ESCAPE, true)]);

    Ok(HeadlessBackend::with_frames(script))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = load_args()?;
    logging::init(args.debug);
    log::info!("Starting Asteroids demo");

    match run(args, backend()?) {
        Ok(()) => {
            log::info!("Asteroids demo finished");
            Ok(())
        }
        Err(e) => {
            log::error!("Asteroids demo failed: {}", e);
            Err(e.into())
        }
    }
}
