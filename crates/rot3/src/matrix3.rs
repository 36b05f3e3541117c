//! Generic dense 3x3 matrix stored in row-major order.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::error::AlgebraError;
use crate::quaternion::Quaternion;
use crate::vector3::Vector3;
use crate::Real;

/// A dense 3x3 matrix over `f32` or `f64`.
///
/// The nine elements are stored row-major; `(row, col)` indexing maps to
/// element `row * 3 + col` of the underlying buffer. Any values are legal,
/// including singular matrices; nothing is ever normalized implicitly.
///
/// Formats with [`fmt::Display`] as the nine elements space-separated in
/// row-major order, e.g. the identity prints as `"1 0 0 0 1 0 0 0 1"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3<T> {
    data: [T; 9],
}

macro_rules! impl_matrix3_consts {
    ($t:ty) => {
        impl Matrix3<$t> {
            /// The identity matrix.
            pub const IDENTITY: Self = Self {
                data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            };

            /// The zero matrix.
            pub const ZERO: Self = Self {
                data: [0.0; 9],
            };
        }
    };
}

impl_matrix3_consts!(f32);
impl_matrix3_consts!(f64);

impl<T: Real> Default for Matrix3<T> {
    /// The default matrix is the zero matrix.
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Real> Matrix3<T> {
    /// Create a matrix from nine scalars in row-major order.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn new(v00: T, v01: T, v02: T, v10: T, v11: T, v12: T, v20: T, v21: T, v22: T) -> Self {
        Self {
            data: [v00, v01, v02, v10, v11, v12, v20, v21, v22],
        }
    }

    /// The identity matrix.
    #[inline]
    pub fn identity() -> Self {
        let o = T::one();
        let z = T::zero();
        Self::new(o, z, z, z, o, z, z, z, o)
    }

    /// The zero matrix.
    #[inline]
    pub fn zero() -> Self {
        Self {
            data: [T::zero(); 9],
        }
    }

    /// The rotation matrix of a quaternion.
    ///
    /// The quaternion is taken as-is; callers that need a proper rotation
    /// matrix must pass a unit quaternion.
    pub fn from_quaternion(q: &Quaternion<T>) -> Self {
        let two = T::one() + T::one();
        let (w, x, y, z) = (q.w(), q.x(), q.y(), q.z());

        let xx = two * x * x;
        let yy = two * y * y;
        let zz = two * z * z;
        let xy = two * x * y;
        let xz = two * x * z;
        let yz = two * y * z;
        let wx = two * w * x;
        let wy = two * w * y;
        let wz = two * w * z;

        Self::new(
            T::one() - yy - zz,
            xy - wz,
            xz + wy,
            xy + wz,
            T::one() - xx - zz,
            yz - wx,
            xz - wy,
            yz + wx,
            T::one() - xx - yy,
        )
    }

    /// The rotation matrix about `axis` by `angle` radians.
    pub fn from_axis_angle(axis: &Vector3<T>, angle: T) -> Self {
        let mut m = Self::identity();
        m.set_from_axis_angle(axis, angle);
        m
    }

    /// The shortest-arc rotation matrix taking `v1` onto `v2`.
    pub fn from_2_axes(v1: &Vector3<T>, v2: &Vector3<T>) -> Self {
        let mut m = Self::identity();
        m.set_from_2_axes(v1, v2);
        m
    }

    /// Build a matrix from a slice of exactly 9 scalars in row-major order.
    pub fn from_slice(s: &[T]) -> Result<Self, AlgebraError> {
        if s.len() != 9 {
            return Err(AlgebraError::InvalidLength {
                expected: 9,
                got: s.len(),
            });
        }
        let mut data = [T::zero(); 9];
        data.copy_from_slice(s);
        Ok(Self { data })
    }

    /// Set a single element.
    ///
    /// Panics when `row` or `col` is out of `[0, 2]`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self[(row, col)] = value;
    }

    /// Set all nine elements in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub fn set_values(
        &mut self,
        v00: T,
        v01: T,
        v02: T,
        v10: T,
        v11: T,
        v12: T,
        v20: T,
        v21: T,
        v22: T,
    ) {
        self.data = [v00, v01, v02, v10, v11, v12, v20, v21, v22];
    }

    /// Set the matrix from three column vectors.
    pub fn set_axes(&mut self, x_axis: &Vector3<T>, y_axis: &Vector3<T>, z_axis: &Vector3<T>) {
        self.set_col(0, x_axis);
        self.set_col(1, y_axis);
        self.set_col(2, z_axis);
    }

    /// Set one column from a vector.
    ///
    /// Panics when `col` is out of `[0, 2]`.
    pub fn set_col(&mut self, col: usize, v: &Vector3<T>) {
        self[(0, col)] = v.x;
        self[(1, col)] = v.y;
        self[(2, col)] = v.z;
    }

    /// Set the matrix to the rotation about `axis` by `angle` radians.
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn set_from_axis_angle(&mut self, axis: &Vector3<T>, angle: T) {
        let u = axis.normalized();
        if u.squared_length() == T::zero() {
            *self = Self::identity();
            return;
        }

        let c = angle.cos();
        let s = angle.sin();
        let t = T::one() - c;

        self.set_values(
            c + u.x * u.x * t,
            u.x * u.y * t - u.z * s,
            u.x * u.z * t + u.y * s,
            u.x * u.y * t + u.z * s,
            c + u.y * u.y * t,
            u.y * u.z * t - u.x * s,
            u.x * u.z * t - u.y * s,
            u.y * u.z * t + u.x * s,
            c + u.z * u.z * t,
        );
    }

    /// Set the matrix to the shortest-arc rotation taking `v1` onto `v2`.
    ///
    /// Delegates to [`Quaternion::set_from_2_axes`], so the antiparallel
    /// fallback axis is identical between the two types.
    pub fn set_from_2_axes(&mut self, v1: &Vector3<T>, v2: &Vector3<T>) {
        let mut q = Quaternion::identity();
        q.set_from_2_axes(v1, v2);
        *self = Self::from_quaternion(&q);
    }

    /// Elementwise comparison within an absolute tolerance.
    pub fn equal(&self, rhs: &Self, tol: T) -> bool {
        self.data
            .iter()
            .zip(rhs.data.iter())
            .all(|(a, b)| (*a - *b).abs() <= tol)
    }

    /// The determinant, by cofactor expansion along the first row.
    pub fn determinant(&self) -> T {
        let m = &self.data;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// The inverse, computed from the adjugate divided by the determinant.
    ///
    /// When `|determinant| <= T::epsilon()` the matrix is treated as singular
    /// and the zero matrix is returned as a sentinel; callers that care must
    /// check [`Matrix3::determinant`] themselves.
    pub fn inverse(&self) -> Self {
        let det = self.determinant();
        if det.abs() <= T::epsilon() {
            return Self::zero();
        }

        let m = &self.data;
        let inv_det = T::one() / det;
        Self::new(
            (m[4] * m[8] - m[5] * m[7]) * inv_det,
            (m[2] * m[7] - m[1] * m[8]) * inv_det,
            (m[1] * m[5] - m[2] * m[4]) * inv_det,
            (m[5] * m[6] - m[3] * m[8]) * inv_det,
            (m[0] * m[8] - m[2] * m[6]) * inv_det,
            (m[2] * m[3] - m[0] * m[5]) * inv_det,
            (m[3] * m[7] - m[4] * m[6]) * inv_det,
            (m[1] * m[6] - m[0] * m[7]) * inv_det,
            (m[0] * m[4] - m[1] * m[3]) * inv_det,
        )
    }

    /// Transpose in place.
    pub fn transpose(&mut self) {
        self.data.swap(1, 3);
        self.data.swap(2, 6);
        self.data.swap(5, 7);
    }

    /// A transposed copy of this matrix.
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// The nine elements as a contiguous row-major slice.
    ///
    /// The view borrows the matrix, so external numeric-array consumers can
    /// alias the storage without copying.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable view of the nine elements in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Real> Index<(usize, usize)> for Matrix3<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < 3 && col < 3, "Matrix3 index out of range: ({row}, {col})");
        &self.data[row * 3 + col]
    }
}

impl<T: Real> IndexMut<(usize, usize)> for Matrix3<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < 3 && col < 3, "Matrix3 index out of range: ({row}, {col})");
        &mut self.data[row * 3 + col]
    }
}

impl<T: Real> Add for Matrix3<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = self;
        for (a, b) in out.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + *b;
        }
        out
    }
}

impl<T: Real> Sub for Matrix3<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = self;
        for (a, b) in out.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - *b;
        }
        out
    }
}

impl<T: Real> Mul for Matrix3<T> {
    type Output = Self;

    /// Matrix product with the usual row-into-column convention.
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::zero();
        for row in 0..3 {
            for col in 0..3 {
                let mut sum = T::zero();
                for k in 0..3 {
                    sum = sum + self[(row, k)] * rhs[(k, col)];
                }
                out[(row, col)] = sum;
            }
        }
        out
    }
}

impl<T: Real> Mul<T> for Matrix3<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        let mut out = self;
        for a in out.data.iter_mut() {
            *a = *a * rhs;
        }
        out
    }
}

impl<T: Real> Mul<Vector3<T>> for Matrix3<T> {
    type Output = Vector3<T>;

    /// Apply the matrix as a linear map.
    fn mul(self, v: Vector3<T>) -> Vector3<T> {
        let m = &self.data;
        Vector3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[3] * v.x + m[4] * v.y + m[5] * v.z,
            m[6] * v.x + m[7] * v.y + m[8] * v.z,
        )
    }
}

impl<T: Real> fmt::Display for Matrix3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
