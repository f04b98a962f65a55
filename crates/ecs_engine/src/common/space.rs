//! Space component: where an entity is, which way it faces, how big it is

use crate::ecs::{Component, Kind};
use crate::foundation::math::{Mat4, Quat, Unit, Vec3};

/// Position, rotation and size of an entity in world space
///
/// Y-up, right-handed. An unrotated entity faces `-Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceComponent {
    position: Vec3,
    rotation: Quat,
    size: Vec3,
}

impl Component for SpaceComponent {
    const KIND: Kind = "Space";
}

impl Default for SpaceComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            size: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl SpaceComponent {
    /// Unit-sized, unrotated, at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder: set the size factors
    #[must_use]
    pub fn with_size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    /// Builder: set the rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move to a position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Replace the orientation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Rotate by `angle` radians around `axis`
    ///
    /// A zero axis leaves the rotation unchanged.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        if let Some(axis) = Unit::try_new(axis, f32::EPSILON) {
            self.rotation = Quat::from_axis_angle(&axis, angle) * self.rotation;
        }
    }

    /// Size factors
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Replace the size factors
    pub fn set_size(&mut self, size: Vec3) {
        self.size = size;
    }

    /// Direction the entity faces
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.size)
    }
}
