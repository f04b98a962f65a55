//! Camera: perspective lens plus the system that turns it into a
//! view-projection matrix for everyone else

use std::time::Duration;

use super::space::SpaceComponent;
use crate::ecs::{Component, Entity, Handle, Kind, Membership, SingleMembers, System};
use crate::events::{MailBox, Message, MessageKind};
use crate::foundation::math::{Isometry3, Mat4, Perspective3, Point3, Vec3};
use crate::scene::SceneContext;
use crate::window::WindowArgs;

/// Perspective lens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    projection: Perspective3<f32>,
}

impl Component for CameraComponent {
    const KIND: Kind = "Camera";
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self::new(100f32.to_radians(), 16.0 / 9.0, 0.1, 100.0)
    }
}

impl CameraComponent {
    /// Lens with a vertical field of view in radians, an aspect ratio and
    /// near/far clipping planes
    pub fn new(fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            projection: Perspective3::new(aspect, fovy, znear, zfar),
        }
    }

    /// Default lens matching the window's aspect ratio
    pub fn for_window(args: &WindowArgs) -> Self {
        let mut camera = Self::default();
        camera.set_aspect(args.aspect_ratio());
        camera
    }

    /// Vertical field of view in radians
    pub fn fovy(&self) -> f32 {
        self.projection.fovy()
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        self.projection.aspect()
    }

    /// Change the aspect ratio
    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection.set_aspect(aspect);
    }

    /// Change the vertical field of view
    pub fn set_fovy(&mut self, fovy: f32) {
        self.projection.set_fovy(fovy);
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.to_homogeneous()
    }
}

/// Camera prefab: a lens at `position`, looking down `-Z`
pub fn camera_entity(position: Vec3) -> Entity {
    Entity::new()
        .with(SpaceComponent::at(position))
        .with(CameraComponent::default())
}

/// Current view-projection matrix, posted by [`CameraSystem`] every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMessage {
    /// Projection times view
    pub view_projection: Mat4,
}

impl Message for CameraMessage {
    const KIND: MessageKind = "Camera";
}

type Viewpoint = (Handle<CameraComponent>, Handle<SpaceComponent>);

/// Tracks the single camera of a scene
///
/// Without a camera the view-projection is the identity.
#[derive(Default)]
pub struct CameraSystem {
    members: SingleMembers<Viewpoint>,
    mailbox: Option<MailBox>,
}

impl CameraSystem {
    /// Create a camera system
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a camera entity is wired in
    pub fn is_active(&self) -> bool {
        self.members.is_active()
    }

    /// Projection times view for the current camera
    pub fn view_projection(&self) -> Mat4 {
        let Some((_, (camera, space))) = self.members.get() else {
            return Mat4::identity();
        };
        let space = space.borrow();

        let eye = Point3::from(space.position());
        let target = Point3::from(space.position() + space.forward());
        let view = Isometry3::look_at_rh(&eye, &target, &Vec3::y());

        camera.borrow().projection_matrix() * view.to_homogeneous()
    }
}

impl System for CameraSystem {
    fn name(&self) -> &'static str {
        "Camera"
    }

    fn members(&self) -> &dyn Membership {
        &self.members
    }

    fn members_mut(&mut self) -> &mut dyn Membership {
        &mut self.members
    }

    fn focus(&mut self, ctx: &SceneContext<'_>) {
        self.mailbox = Some(ctx.mailbox.clone());
    }

    fn update(&mut self, _delta: Duration) {
        if let Some(mailbox) = &self.mailbox {
            mailbox.post(CameraMessage {
                view_projection: self.view_projection(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentRef, EntityId};
    use approx::assert_relative_eq;

    fn wired(position: Vec3) -> (CameraSystem, Handle<SpaceComponent>) {
        let camera = Handle::new(CameraComponent::new(90f32.to_radians(), 1.0, 0.1, 100.0));
        let space = Handle::new(SpaceComponent::at(position));
        let mut system = CameraSystem::new();
        system.add(EntityId::new(1), vec![camera.erase(), space.erase()]);
        (system, space)
    }

    #[test]
    fn test_inactive_camera_is_identity() {
        let system = CameraSystem::new();
        assert!(!system.is_active());
        assert_eq!(system.view_projection(), Mat4::identity());
    }

    #[test]
    fn test_point_ahead_lands_in_center() {
        let (system, _) = wired(Vec3::new(0.0, 0.0, 5.0));
        let clip = system.view_projection() * nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0);

        assert_relative_eq!(clip.x / clip.w, 0.0);
        assert_relative_eq!(clip.y / clip.w, 0.0);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn test_view_follows_shared_space() {
        let (system, space) = wired(Vec3::zeros());
        let before = system.view_projection();

        space.borrow_mut().translate(Vec3::new(1.0, 0.0, 0.0));

        assert_ne!(system.view_projection(), before);
    }

    #[test]
    fn test_camera_prefab_has_required_kinds() {
        let entity = camera_entity(Vec3::zeros());
        assert!(entity.has("Camera"));
        assert!(entity.has("Space"));
        assert!(entity.component("Camera").is_some_and(ComponentRef::is::<CameraComponent>));
    }

    #[test]
    fn test_lens_for_window() {
        let camera = CameraComponent::for_window(&WindowArgs::default().with_size(400, 200));
        assert_relative_eq!(camera.aspect(), 2.0);
        assert_relative_eq!(camera.fovy(), 100f32.to_radians());
    }
}
