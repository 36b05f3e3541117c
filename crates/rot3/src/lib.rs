#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # rot3
//!
//! This crate provides the small cluster of value types used to represent 3D
//! orientations in robotics and computer vision: a dense [`Matrix3`], a
//! [`Quaternion`] and a [`Vector3`], generic over `f32` and `f64`.
//!
//! All operations are total: degenerate inputs (singular matrices, zero-norm
//! quaternions, antiparallel axes, gimbal lock) produce documented fallback
//! values instead of errors, so the types are safe to use in real-time loops.
//!
//! ## Example
//!
//! ```rust
//! use rot3::{Quaternion, Vector3};
//!
//! // Rotate a point a quarter turn about the Z axis.
//! let q = Quaternion::from_axis_angle(&Vector3::new(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
//! let p = q.rotate_vector(&Vector3::new(1.0, 0.0, 0.0));
//! assert!(p.equal(&Vector3::new(0.0, 1.0, 0.0), 1e-12));
//! ```

use std::fmt;

use num_traits::{float::FloatConst, Float, FromPrimitive};

/// Error types for the slice-marshalling constructors.
pub mod error;

/// Dense 3x3 matrix type.
pub mod matrix3;

/// Quaternion type for 3D rotations.
pub mod quaternion;

/// 3-component vector type.
pub mod vector3;

pub use crate::error::AlgebraError;
pub use crate::matrix3::Matrix3;
pub use crate::quaternion::Quaternion;
pub use crate::vector3::Vector3;

/// Scalar types the algebra is generic over.
///
/// Blanket-implemented for everything that satisfies the bounds, which in
/// practice means `f32` and `f64`.
pub trait Real: Float + FloatConst + FromPrimitive + fmt::Debug + fmt::Display + 'static {}

impl<T> Real for T where T: Float + FloatConst + FromPrimitive + fmt::Debug + fmt::Display + 'static {}

/// Lossless cast of an `f64` literal into the working scalar type.
#[inline]
pub(crate) fn cast<T: Real>(v: f64) -> T {
    T::from_f64(v).expect("constant not representable in scalar type")
}
