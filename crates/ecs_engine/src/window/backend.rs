//! Backend-agnostic windowing contract
//!
//! The run loop needs four things from a windowing toolkit: a surface to draw
//! into, a way to present it, the input that arrived since the last frame, and
//! an orderly shutdown. Everything toolkit-specific stays behind this trait.

use thiserror::Error;

use super::args::WindowArgs;
use crate::events::Modifiers;

/// Windowing toolkit driving a [`crate::window::Window`]
pub trait Backend {
    /// Native window or context handle
    type Surface;

    /// Open the window described by `args`
    fn create_surface(&mut self, args: &WindowArgs) -> Result<Self::Surface, BackendError>;

    /// Present the frame drawn into the surface
    fn swap(&mut self, surface: &mut Self::Surface);

    /// Input that arrived since the previous call, oldest first
    ///
    /// Positions are in window pixels with the origin at the top-left corner.
    fn poll_events(&mut self, surface: &mut Self::Surface) -> Vec<RawEvent>;

    /// Close the window and release the toolkit
    fn quit(&mut self, surface: Self::Surface);
}

/// Input event as reported by a backend
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// The user asked to close the window
    Quit,
    /// Key press, repeat or release
    Key {
        /// Key code, see [`crate::events::keys`]
        key: i32,
        /// Platform scancode
        scancode: i32,
        /// `true` on press and repeat
        pressed: bool,
        /// Modifier keys held
        modifiers: Modifiers,
        /// Seconds since the surface was created
        timestamp: f64,
    },
    /// Mouse button press or release at a pixel position
    MouseButton {
        /// Button index, 0 is the primary button
        button: u8,
        /// `true` on press
        pressed: bool,
        /// Pixel x
        x: f64,
        /// Pixel y, growing downwards
        y: f64,
        /// Seconds since the surface was created
        timestamp: f64,
    },
    /// Pointer motion in pixels
    MouseMotion {
        /// Pixel x
        x: f64,
        /// Pixel y, growing downwards
        y: f64,
        /// Pixel motion since the previous event
        x_rel: f64,
        /// Pixel motion since the previous event, growing downwards
        y_rel: f64,
        /// Seconds since the surface was created
        timestamp: f64,
    },
    /// Scroll wheel offset
    MouseScroll {
        /// Horizontal offset, positive to the right
        x: f64,
        /// Vertical offset, positive away from the user
        y: f64,
        /// Seconds since the surface was created
        timestamp: f64,
    },
}

/// Windowing backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    /// The toolkit could not be initialised
    #[error("Backend initialization failed: {0}")]
    InitializationFailed(String),

    /// The window could not be created
    #[error("Surface creation failed: {0}")]
    SurfaceCreationFailed(String),
}
