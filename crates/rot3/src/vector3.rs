//! Generic 3-component vector.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use crate::error::AlgebraError;
use crate::{cast, Real};

/// A 3-component vector over `f32` or `f64`.
///
/// Formats with [`fmt::Display`] as the three components space-separated,
/// e.g. `"1 2 3"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3<T> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
    /// Z component.
    pub z: T,
}

macro_rules! impl_vector3_consts {
    ($t:ty) => {
        impl Vector3<$t> {
            /// The zero vector.
            pub const ZERO: Self = Self {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            };

            /// The vector with all components one.
            pub const ONE: Self = Self {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            };

            /// Unit vector along X.
            pub const UNIT_X: Self = Self {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            };

            /// Unit vector along Y.
            pub const UNIT_Y: Self = Self {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            };

            /// Unit vector along Z.
            pub const UNIT_Z: Self = Self {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            };
        }
    };
}

impl_vector3_consts!(f32);
impl_vector3_consts!(f64);

impl<T: Real> Vector3<T> {
    /// Create a vector from its three components.
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Unit vector along X.
    #[inline]
    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero(), T::zero())
    }

    /// Unit vector along Y.
    #[inline]
    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one(), T::zero())
    }

    /// Unit vector along Z.
    #[inline]
    pub fn unit_z() -> Self {
        Self::new(T::zero(), T::zero(), T::one())
    }

    /// Build a vector from a slice of exactly 3 scalars `[x, y, z]`.
    pub fn from_slice(s: &[T]) -> Result<Self, AlgebraError> {
        if s.len() != 3 {
            return Err(AlgebraError::InvalidLength {
                expected: 3,
                got: s.len(),
            });
        }
        Ok(Self::new(s[0], s[1], s[2]))
    }

    /// The components as `[x, y, z]`.
    #[inline]
    pub fn to_array(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Set the three components.
    #[inline]
    pub fn set(&mut self, x: T, y: T, z: T) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Cross product.
    #[inline]
    pub fn cross(&self, rhs: &Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn squared_length(&self) -> T {
        self.dot(self)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> T {
        self.squared_length().sqrt()
    }

    /// Normalize in place to unit length.
    ///
    /// The zero vector has no direction and is left unchanged.
    pub fn normalize(&mut self) {
        let d = self.length();
        if d > T::zero() {
            self.x = self.x / d;
            self.y = self.y / d;
            self.z = self.z / d;
        }
    }

    /// A normalized copy of this vector.
    pub fn normalized(&self) -> Self {
        let mut v = *self;
        v.normalize();
        v
    }

    /// Elementwise comparison within an absolute tolerance.
    pub fn equal(&self, rhs: &Self, tol: T) -> bool {
        (self.x - rhs.x).abs() <= tol
            && (self.y - rhs.y).abs() <= tol
            && (self.z - rhs.z).abs() <= tol
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Round each component to `precision` decimal places.
    pub fn round(&mut self, precision: i32) {
        let factor = cast::<T>(10.0).powi(precision);
        self.x = (self.x * factor).round() / factor;
        self.y = (self.y * factor).round() / factor;
        self.z = (self.z * factor).round() / factor;
    }
}

impl<T: Real> Add for Vector3<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Real> AddAssign for Vector3<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Real> Sub for Vector3<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Real> SubAssign for Vector3<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Real> Neg for Vector3<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: Real> Mul<T> for Vector3<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl<T: Real> Index<usize> for Vector3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of range: {i}"),
        }
    }
}

impl<T: Real> IndexMut<usize> for Vector3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 index out of range: {i}"),
        }
    }
}

impl<T: Real> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}
