//! # Backend Module
//!
//! Concrete implementations of [`crate::window::Backend`].
//!
//! - **Headless**: scripted input, no window; used by tests and batch runs
//! - **GLFW**: a real desktop window, behind the `glfw` cargo feature

pub mod headless;
#[cfg(feature = "glfw")]
pub mod glfw;

pub use headless::HeadlessBackend;
#[cfg(feature = "glfw")]
pub use self::glfw::GlfwBackend;
