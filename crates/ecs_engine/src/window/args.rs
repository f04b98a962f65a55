//! Window arguments

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Placement and behaviour of the game window
///
/// Loadable from TOML or RON through [`Config`]:
///
/// ```toml
/// x = 100
/// y = 100
/// width = 1280
/// height = 720
/// title = "Asteroids"
/// debug = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowArgs {
    /// Horizontal screen position of the top-left corner
    pub x: i32,
    /// Vertical screen position of the top-left corner
    pub y: i32,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Title bar text
    pub title: String,
    /// Verbose logging and scene-switch announcements
    pub debug: bool,
}

impl Default for WindowArgs {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 800,
            height: 800,
            title: "ECS Engine".to_string(),
            debug: false,
        }
    }
}

impl WindowArgs {
    /// Builder: set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set the client area size
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set the screen position
    #[must_use]
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder: enable debug output
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Width over height
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Window pixel position to normalised device coordinates, `+y` up
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_ndc(&self, x: f64, y: f64) -> (f32, f32) {
        let (width, height) = self.extent();
        ((x / width * 2.0 - 1.0) as f32, (1.0 - y / height * 2.0) as f32)
    }

    /// Pixel motion to normalised device units, `+y` up
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_ndc_delta(&self, dx: f64, dy: f64) -> (f32, f32) {
        let (width, height) = self.extent();
        ((dx / width * 2.0) as f32, (-dy / height * 2.0) as f32)
    }

    fn extent(&self) -> (f64, f64) {
        (f64::from(self.width.max(1)), f64::from(self.height.max(1)))
    }
}

impl Config for WindowArgs {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid("window title is empty".to_string()));
        }
        Ok(())
    }
}
