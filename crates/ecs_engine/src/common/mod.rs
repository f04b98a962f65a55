//! Stock capability components and systems
//!
//! | Component         | Kind     | System         | Requires         |
//! |-------------------|----------|----------------|------------------|
//! | `SpaceComponent`  | "Space"  |                |                  |
//! | `CameraComponent` | "Camera" | `CameraSystem` | Camera, Space    |
//! | `RenderComponent` | "Render" | `RenderSystem` | Render, Space    |
//! | `LightComponent`  | "Light"  | `LightSystem`  | Light, Space     |

pub mod camera;
pub mod light;
pub mod render;
pub mod space;

pub use camera::{camera_entity, CameraComponent, CameraMessage, CameraSystem};
pub use light::{LightComponent, LightList, LightSource, LightSystem};
pub use render::{DrawCommand, DrawList, RenderComponent, RenderSystem};
pub use space::SpaceComponent;
