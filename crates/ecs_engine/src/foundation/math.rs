//! Math types
//!
//! Thin aliases over `nalgebra`, in single precision.

pub use nalgebra::{Isometry3, Matrix4, Perspective3, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Rotation quaternion type
pub type Quat = UnitQuaternion<f32>;
