//! # ECS Engine
//!
//! An entity-component-system composition engine. Systems declare which
//! component kinds they need; scenes wire every entity into every system whose
//! requirements it satisfies and keep that wiring current as entities and
//! components come and go.
//!
//! ## Features
//!
//! - **Requirement wiring**: ordered component requirements, matched on init
//!   and incrementally on every mutation
//! - **MailBox**: explicitly owned publish/subscribe bus, reopened on every
//!   scene focus
//! - **Run loop**: multi-scene window state machine over a pluggable backend
//! - **Stock capabilities**: space, camera, render and light components
//!
//! ## Quick Start
//!
//! ```rust
//! use ecs_engine::prelude::*;
//!
//! let mut scene = Scene::new("level");
//! scene.add_system(CameraSystem::new()).add_system(RenderSystem::new());
//! scene.add_entity(camera_entity(Vec3::new(0.0, 0.0, 5.0)));
//! scene.add_entity(
//!     Entity::new()
//!         .with(RenderComponent::new("cube.obj"))
//!         .with(SpaceComponent::default()),
//! );
//!
//! let mut window = Window::new(WindowArgs::default(), HeadlessBackend::with_frames(vec![Vec::new(); 3]));
//! window.add_scene(scene);
//! window.spawn().unwrap();
//! assert_eq!(window.state(), WindowState::Terminated);
//! ```

pub mod backend;
pub mod common;
pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod scene;
pub mod window;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        backend::HeadlessBackend,
        common::{
            camera_entity, CameraComponent, CameraMessage, CameraSystem, LightComponent, LightSystem,
            RenderComponent, RenderSystem, SpaceComponent,
        },
        config::{Config, ConfigError},
        ecs::{
            Component, ComponentRef, Entity, EntityId, Handle, Kind, Membership, MultiMembers,
            SharedMembers, SingleMembers, System,
        },
        events::{
            keys, ChangeSceneMessage, KeyboardMessage, MailBox, Message, MessageKind, Modifiers,
            MouseButtonMessage, MouseMotionMessage, MouseScrollMessage, QuitMessage,
        },
        foundation::{
            math::{Mat4, Quat, Vec3},
            time::Timer,
        },
        scene::{Scene, SceneContext, SceneError},
        window::{Backend, BackendError, RawEvent, Window, WindowArgs, WindowError, WindowState},
    };
}
