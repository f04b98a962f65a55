//! GLFW backend
//!
//! Opens a desktop window with an OpenGL context. Rendering itself is left to
//! the game's systems; the backend only presents the back buffer.

use glfw::{Action, Context, WindowEvent};

use crate::events::Modifiers;
use crate::window::{Backend, BackendError, RawEvent, WindowArgs};

/// GLFW window and its event queue
pub struct GlfwSurface {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    cursor: Option<(f64, f64)>,
}

/// Backend opening a real window through GLFW
pub struct GlfwBackend {
    glfw: glfw::Glfw,
}

impl GlfwBackend {
    /// Initialise GLFW
    pub fn new() -> Result<Self, BackendError> {
        let glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| BackendError::InitializationFailed(format!("{e:?}")))?;
        Ok(Self { glfw })
    }
}

impl Backend for GlfwBackend {
    type Surface = GlfwSurface;

    fn create_surface(&mut self, args: &WindowArgs) -> Result<GlfwSurface, BackendError> {
        self.glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = self
            .glfw
            .create_window(args.width, args.height, &args.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| BackendError::SurfaceCreationFailed(args.title.clone()))?;

        window.set_pos(args.x, args.y);
        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_close_polling(true);
        window.make_current();

        log::info!("GLFW window '{}' created", args.title);
        Ok(GlfwSurface {
            window,
            events,
            cursor: None,
        })
    }

    fn swap(&mut self, surface: &mut GlfwSurface) {
        surface.window.swap_buffers();
    }

    fn poll_events(&mut self, surface: &mut GlfwSurface) -> Vec<RawEvent> {
        self.glfw.poll_events();

        let mut raw = Vec::new();
        for (timestamp, event) in glfw::flush_messages(&surface.events) {
            match event {
                WindowEvent::Close => raw.push(RawEvent::Quit),
                WindowEvent::Key(key, scancode, action, mods) => raw.push(RawEvent::Key {
                    key: key as i32,
                    scancode,
                    pressed: action != Action::Release,
                    modifiers: modifiers(mods),
                    timestamp,
                }),
                WindowEvent::MouseButton(button, action, _) => {
                    let (x, y) = surface.window.get_cursor_pos();
                    raw.push(RawEvent::MouseButton {
                        button: u8::try_from(button as i32).unwrap_or(u8::MAX),
                        pressed: action == Action::Press,
                        x,
                        y,
                        timestamp,
                    });
                }
                WindowEvent::CursorPos(x, y) => {
                    let (last_x, last_y) = surface.cursor.unwrap_or((x, y));
                    surface.cursor = Some((x, y));
                    raw.push(RawEvent::MouseMotion {
                        x,
                        y,
                        x_rel: x - last_x,
                        y_rel: y - last_y,
                        timestamp,
                    });
                }
                WindowEvent::Scroll(x, y) => raw.push(RawEvent::MouseScroll { x, y, timestamp }),
                _ => {}
            }
        }

        if surface.window.should_close() && !raw.contains(&RawEvent::Quit) {
            raw.push(RawEvent::Quit);
        }
        raw
    }

    fn quit(&mut self, mut surface: GlfwSurface) {
        surface.window.set_should_close(true);
        log::info!("GLFW window closed");
    }
}

fn modifiers(mods: glfw::Modifiers) -> Modifiers {
    let mut held = Modifiers::empty();
    held.set(Modifiers::SHIFT, mods.contains(glfw::Modifiers::Shift));
    held.set(Modifiers::CONTROL, mods.contains(glfw::Modifiers::Control));
    held.set(Modifiers::ALT, mods.contains(glfw::Modifiers::Alt));
    held.set(Modifiers::SUPER, mods.contains(glfw::Modifiers::Super));
    held
}
