//! Real-Time Graphics Mathematics Library
//!
//! This crate provides the vector, quaternion, and matrix types a renderer
//! needs to build model, view, and projection transformations. All types are
//! plain `f32` value types with column-major matrix storage, laid out for
//! direct upload as GPU uniform data.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Vec4`] - 4D homogeneous vector with x, y, z, w components
//! - [`Quat`] - Rotation quaternion
//! - [`Mat3`] - 3x3 matrix for 2D transformations and normal matrices
//! - [`Mat4`] - 4x4 matrix for 3D transformations and projections
//!
//! Operations follow IEEE 754 silently: inverting a singular matrix or
//! normalizing a zero-length vector produces non-finite components rather
//! than panicking.

mod vec2;
mod vec3;
mod vec4;
mod quat;
pub mod mat3;
pub mod mat4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use quat::Quat;
pub use mat3::Mat3;
pub use mat4::Mat4;
