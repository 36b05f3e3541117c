//! Generic quaternion for 3D rotations.
//!
//! Conventions, fixed once for the whole crate and pinned by the tests:
//!
//! * Components are stored and passed in **(w, x, y, z)** order; `w` is the
//!   scalar part.
//! * The Hamilton product `q1 * q2` composes rotations so that `q2` is
//!   applied first, then `q1`, matching matrix composition:
//!   `Matrix3::from_quaternion(&(q1 * q2))` equals
//!   `Matrix3::from_quaternion(&q1) * Matrix3::from_quaternion(&q2)`.
//! * Euler angles are roll-pitch-yaw about the fixed body-frame X, Y and Z
//!   axes, composed as `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
//!
//! Nothing enforces unit norm. Operations that assume a rotation (vector
//! rotation, slerp, Euler and axis-angle extraction) require the caller to
//! have normalized the quaternion first.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand::Rng;

use crate::error::AlgebraError;
use crate::matrix3::Matrix3;
use crate::vector3::Vector3;
use crate::{cast, Real};

/// A quaternion over `f32` or `f64`, stored as (w, x, y, z).
///
/// Formats with [`fmt::Display`] as the four components space-separated in
/// (w, x, y, z) order, e.g. the identity prints as `"1 0 0 0"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion<T> {
    w: T,
    x: T,
    y: T,
    z: T,
}

macro_rules! impl_quaternion_consts {
    ($t:ty) => {
        impl Quaternion<$t> {
            /// The identity quaternion (no rotation).
            pub const IDENTITY: Self = Self {
                w: 1.0,
                x: 0.0,
                y: 0.0,
                z: 0.0,
            };

            /// The zero quaternion. Degenerate; not a valid rotation.
            pub const ZERO: Self = Self {
                w: 0.0,
                x: 0.0,
                y: 0.0,
                z: 0.0,
            };
        }
    };
}

impl_quaternion_consts!(f32);
impl_quaternion_consts!(f64);

impl<T: Real> Default for Quaternion<T> {
    /// The default quaternion is the identity.
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> Quaternion<T> {
    /// Create a quaternion from its four components in (w, x, y, z) order.
    #[inline]
    pub fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }

    /// The identity quaternion (no rotation).
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    /// The zero quaternion.
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::zero())
    }

    /// The quaternion for the given roll-pitch-yaw Euler angles, composed as
    /// `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn from_euler(roll: T, pitch: T, yaw: T) -> Self {
        let mut q = Self::identity();
        q.set_from_euler(roll, pitch, yaw);
        q
    }

    /// The quaternion for Euler angles packed as `(roll, pitch, yaw)`.
    pub fn from_euler_vec(v: &Vector3<T>) -> Self {
        Self::from_euler(v.x, v.y, v.z)
    }

    /// Convert Euler angles to a quaternion.
    pub fn euler_to_quaternion(v: &Vector3<T>) -> Self {
        Self::from_euler_vec(v)
    }

    /// The rotation about `axis` by `angle` radians.
    pub fn from_axis_angle(axis: &Vector3<T>, angle: T) -> Self {
        let mut q = Self::identity();
        q.set_from_axis_angle_vec(axis, angle);
        q
    }

    /// A pure quaternion (w = 0) from a vector.
    #[inline]
    pub fn from_vector(v: &Vector3<T>) -> Self {
        Self::new(T::zero(), v.x, v.y, v.z)
    }

    /// The quaternion extracted from a rotation matrix.
    pub fn from_matrix(m: &Matrix3<T>) -> Self {
        let mut q = Self::identity();
        q.set_from_matrix(m);
        q
    }

    /// The shortest-arc rotation taking `v1` onto `v2`.
    pub fn from_2_axes(v1: &Vector3<T>, v2: &Vector3<T>) -> Self {
        let mut q = Self::identity();
        q.set_from_2_axes(v1, v2);
        q
    }

    /// Build a quaternion from a slice of exactly 4 scalars `[w, x, y, z]`.
    pub fn from_slice(s: &[T]) -> Result<Self, AlgebraError> {
        if s.len() != 4 {
            return Err(AlgebraError::InvalidLength {
                expected: 4,
                got: s.len(),
            });
        }
        Ok(Self::new(s[0], s[1], s[2], s[3]))
    }

    /// A uniformly distributed random unit quaternion (Shoemake's method).
    pub fn random() -> Self {
        let mut rng = rand::rng();

        let r1: T = cast(rng.random::<f64>());
        let r2: T = cast(rng.random::<f64>());
        let r3: T = cast(rng.random::<f64>());
        let two_pi = T::PI() + T::PI();

        Self::new(
            (T::one() - r1).sqrt() * (two_pi * r2).sin(),
            (T::one() - r1).sqrt() * (two_pi * r2).cos(),
            r1.sqrt() * (two_pi * r3).sin(),
            r1.sqrt() * (two_pi * r3).cos(),
        )
    }

    /// The scalar component.
    #[inline]
    pub fn w(&self) -> T {
        self.w
    }

    /// The first vector component.
    #[inline]
    pub fn x(&self) -> T {
        self.x
    }

    /// The second vector component.
    #[inline]
    pub fn y(&self) -> T {
        self.y
    }

    /// The third vector component.
    #[inline]
    pub fn z(&self) -> T {
        self.z
    }

    /// Set the scalar component.
    #[inline]
    pub fn set_w(&mut self, w: T) {
        self.w = w;
    }

    /// Set the first vector component.
    #[inline]
    pub fn set_x(&mut self, x: T) {
        self.x = x;
    }

    /// Set the second vector component.
    #[inline]
    pub fn set_y(&mut self, y: T) {
        self.y = y;
    }

    /// Set the third vector component.
    #[inline]
    pub fn set_z(&mut self, z: T) {
        self.z = z;
    }

    /// Set all four components in (w, x, y, z) order.
    #[inline]
    pub fn set(&mut self, w: T, x: T, y: T, z: T) {
        self.w = w;
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// The components as `[x, y, z, w]`, the order external array consumers
    /// conventionally expect.
    #[inline]
    pub fn xyzw(&self) -> [T; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Set the quaternion from raw axis components and an angle in radians.
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn set_from_axis_angle(&mut self, ax: T, ay: T, az: T, angle: T) {
        self.set_from_axis_angle_vec(&Vector3::new(ax, ay, az), angle);
    }

    /// Set the quaternion from an axis vector and an angle in radians.
    ///
    /// The axis is normalized first; a zero axis yields the identity.
    pub fn set_from_axis_angle_vec(&mut self, axis: &Vector3<T>, angle: T) {
        let u = axis.normalized();
        if u.squared_length() == T::zero() {
            *self = Self::identity();
            return;
        }

        let half = angle / (T::one() + T::one());
        let s = half.sin();
        self.set(half.cos(), u.x * s, u.y * s, u.z * s);
        self.normalize();
    }

    /// Set the quaternion from roll-pitch-yaw Euler angles, composed as
    /// `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn set_from_euler(&mut self, roll: T, pitch: T, yaw: T) {
        let two = T::one() + T::one();
        let phi = roll / two;
        let the = pitch / two;
        let psi = yaw / two;

        self.w = phi.cos() * the.cos() * psi.cos() + phi.sin() * the.sin() * psi.sin();
        self.x = phi.sin() * the.cos() * psi.cos() - phi.cos() * the.sin() * psi.sin();
        self.y = phi.cos() * the.sin() * psi.cos() + phi.sin() * the.cos() * psi.sin();
        self.z = phi.cos() * the.cos() * psi.sin() - phi.sin() * the.sin() * psi.cos();
    }

    /// The rotation as `(roll, pitch, yaw)` Euler angles.
    ///
    /// At gimbal lock (`|sin(pitch)| >= 1 - 1e-6`) the decomposition is
    /// ambiguous; roll is fixed to zero, pitch to `±π/2` and the remaining
    /// rotation is folded into yaw.
    pub fn euler(&self) -> Vector3<T> {
        let two = T::one() + T::one();
        let q = self.normalized();

        let sarg = (two * (q.w * q.y - q.z * q.x))
            .min(T::one())
            .max(-T::one());

        if sarg.abs() >= T::one() - cast(1e-6) {
            let pitch = T::FRAC_PI_2().copysign(sarg);
            let yaw = two * q.z.atan2(q.w);
            Vector3::new(T::zero(), pitch, yaw)
        } else {
            let roll = (two * (q.w * q.x + q.y * q.z))
                .atan2(T::one() - two * (q.x * q.x + q.y * q.y));
            let pitch = sarg.asin();
            let yaw = (two * (q.w * q.z + q.x * q.y))
                .atan2(T::one() - two * (q.y * q.y + q.z * q.z));
            Vector3::new(roll, pitch, yaw)
        }
    }

    /// The Euler roll angle in radians.
    pub fn roll(&self) -> T {
        self.euler().x
    }

    /// The Euler pitch angle in radians.
    pub fn pitch(&self) -> T {
        self.euler().y
    }

    /// The Euler yaw angle in radians.
    pub fn yaw(&self) -> T {
        self.euler().z
    }

    /// The rotation as an axis and angle in radians.
    ///
    /// For a (near-)identity rotation the axis is degenerate; `(unit X, 0)`
    /// is returned.
    pub fn axis_angle(&self) -> (Vector3<T>, T) {
        let q = self.normalized();
        let sin_sq = q.x * q.x + q.y * q.y + q.z * q.z;

        if sin_sq <= T::epsilon() {
            return (Vector3::unit_x(), T::zero());
        }

        let s = sin_sq.sqrt();
        let angle = (T::one() + T::one()) * q.w.min(T::one()).max(-T::one()).acos();
        (Vector3::new(q.x / s, q.y / s, q.z / s), angle)
    }

    /// Set the quaternion from a rotation matrix.
    ///
    /// Uses Shepperd's method: the branch is chosen by the largest of the
    /// trace and the diagonal elements, which keeps the divisor well away
    /// from zero for every proper rotation matrix.
    pub fn set_from_matrix(&mut self, m: &Matrix3<T>) {
        let one = T::one();
        let two = one + one;
        let quarter = one / (two + two);

        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
        if trace > T::zero() {
            let s = (trace + one).sqrt() * two;
            self.w = quarter * s;
            self.x = (m[(2, 1)] - m[(1, 2)]) / s;
            self.y = (m[(0, 2)] - m[(2, 0)]) / s;
            self.z = (m[(1, 0)] - m[(0, 1)]) / s;
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = (one + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt() * two;
            self.w = (m[(2, 1)] - m[(1, 2)]) / s;
            self.x = quarter * s;
            self.y = (m[(0, 1)] + m[(1, 0)]) / s;
            self.z = (m[(0, 2)] + m[(2, 0)]) / s;
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = (one + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt() * two;
            self.w = (m[(0, 2)] - m[(2, 0)]) / s;
            self.x = (m[(0, 1)] + m[(1, 0)]) / s;
            self.y = quarter * s;
            self.z = (m[(1, 2)] + m[(2, 1)]) / s;
        } else {
            let s = (one + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt() * two;
            self.w = (m[(1, 0)] - m[(0, 1)]) / s;
            self.x = (m[(0, 2)] + m[(2, 0)]) / s;
            self.y = (m[(1, 2)] + m[(2, 1)]) / s;
            self.z = quarter * s;
        }
    }

    /// Set the quaternion to the shortest-arc rotation taking `v1` onto `v2`.
    ///
    /// Both vectors are normalized first; if either is zero the result is the
    /// identity. When the vectors are antiparallel (`dot < -1 + 1e-6`) the
    /// rotation axis is ambiguous and a deterministic fallback is used:
    /// `v1 × X̂`, or `v1 × Ŷ` when `v1` is parallel to X, rotated by π.
    /// [`Matrix3::set_from_2_axes`] delegates here, so both types share this
    /// fallback exactly.
    pub fn set_from_2_axes(&mut self, v1: &Vector3<T>, v2: &Vector3<T>) {
        let u1 = v1.normalized();
        let u2 = v2.normalized();
        if u1.squared_length() == T::zero() || u2.squared_length() == T::zero() {
            *self = Self::identity();
            return;
        }

        let tol = cast::<T>(1e-6);
        let dot = u1.dot(&u2);
        if dot < tol - T::one() {
            let mut axis = u1.cross(&Vector3::unit_x());
            if axis.squared_length() <= tol {
                axis = u1.cross(&Vector3::unit_y());
            }
            self.set_from_axis_angle_vec(&axis, T::PI());
        } else {
            // Half-way quaternion: (1 + u1·u2, u1 × u2), normalized.
            let c = u1.cross(&u2);
            self.set(T::one() + dot, c.x, c.y, c.z);
            self.normalize();
        }
    }

    /// Squared norm, i.e. the dot product with itself.
    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Normalize in place to unit norm.
    ///
    /// The zero quaternion cannot be normalized and is reset to the identity.
    pub fn normalize(&mut self) {
        let s = self.dot(self);
        if s == T::zero() {
            *self = Self::identity();
        } else {
            let d = s.sqrt();
            self.w = self.w / d;
            self.x = self.x / d;
            self.y = self.y / d;
            self.z = self.z / d;
        }
    }

    /// A normalized copy of this quaternion.
    pub fn normalized(&self) -> Self {
        let mut q = *self;
        q.normalize();
        q
    }

    /// Invert in place.
    ///
    /// Computes the conjugate divided by the squared norm, which is correct
    /// for non-unit quaternions too. The zero quaternion has no inverse and
    /// is reset to the identity.
    pub fn invert(&mut self) {
        let s = self.dot(self);
        if s == T::zero() {
            *self = Self::identity();
        } else {
            self.w = self.w / s;
            self.x = -self.x / s;
            self.y = -self.y / s;
            self.z = -self.z / s;
        }
    }

    /// The inverse of this quaternion.
    pub fn inverse(&self) -> Self {
        let mut q = *self;
        q.invert();
        q
    }

    /// The quaternion logarithm.
    ///
    /// For `q = (cos θ, n sin θ)` with unit axis `n`, returns `(0, n θ)`.
    /// Near the identity the vector part is passed through unscaled.
    pub fn log(&self) -> Self {
        let mut out = Self::new(T::zero(), self.x, self.y, self.z);
        if self.w.abs() < T::one() {
            let angle = self.w.acos();
            let s = angle.sin();
            if s.abs() >= cast(1e-8) {
                let coeff = angle / s;
                out.x = self.x * coeff;
                out.y = self.y * coeff;
                out.z = self.z * coeff;
            }
        }
        out
    }

    /// The quaternion exponential, inverse of [`Quaternion::log`].
    ///
    /// For a pure quaternion `(0, n θ)` with unit axis `n`, returns
    /// `(cos θ, n sin θ)`.
    pub fn exp(&self) -> Self {
        let angle = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let s = angle.sin();
        let mut out = Self::new(angle.cos(), self.x, self.y, self.z);
        if s.abs() >= cast(1e-8) {
            let coeff = s / angle;
            out.x = self.x * coeff;
            out.y = self.y * coeff;
            out.z = self.z * coeff;
        }
        out
    }

    /// Scale the rotation angle in place, keeping the axis.
    pub fn scale(&mut self, scale: T) {
        let (axis, angle) = self.axis_angle();
        self.set_from_axis_angle_vec(&axis, angle * scale);
    }

    /// Rotate a vector by this quaternion, as `q v q⁻¹`.
    pub fn rotate_vector(&self, v: &Vector3<T>) -> Vector3<T> {
        let qv = Self::from_vector(v);
        let r = *self * qv * self.inverse();
        Vector3::new(r.x, r.y, r.z)
    }

    /// Rotate a vector by the inverse of this quaternion.
    pub fn rotate_vector_reverse(&self, v: &Vector3<T>) -> Vector3<T> {
        let qv = Self::from_vector(v);
        let r = self.inverse() * qv * *self;
        Vector3::new(r.x, r.y, r.z)
    }

    /// The X axis of the equivalent rotation matrix (its first column).
    pub fn x_axis(&self) -> Vector3<T> {
        let two = T::one() + T::one();
        Vector3::new(
            T::one() - two * (self.y * self.y + self.z * self.z),
            two * (self.x * self.y + self.w * self.z),
            two * (self.x * self.z - self.w * self.y),
        )
    }

    /// The Y axis of the equivalent rotation matrix (its second column).
    pub fn y_axis(&self) -> Vector3<T> {
        let two = T::one() + T::one();
        Vector3::new(
            two * (self.x * self.y - self.w * self.z),
            T::one() - two * (self.x * self.x + self.z * self.z),
            two * (self.y * self.z + self.w * self.x),
        )
    }

    /// The Z axis of the equivalent rotation matrix (its third column).
    pub fn z_axis(&self) -> Vector3<T> {
        let two = T::one() + T::one();
        Vector3::new(
            two * (self.x * self.z + self.w * self.y),
            two * (self.y * self.z - self.w * self.x),
            T::one() - two * (self.x * self.x + self.y * self.y),
        )
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Replace any non-finite component with its identity-quaternion value:
    /// 1 for w, 0 for x, y and z.
    pub fn correct(&mut self) {
        if !self.w.is_finite() {
            self.w = T::one();
        }
        if !self.x.is_finite() {
            self.x = T::zero();
        }
        if !self.y.is_finite() {
            self.y = T::zero();
        }
        if !self.z.is_finite() {
            self.z = T::zero();
        }
    }

    /// Round each component to `precision` decimal places.
    pub fn round(&mut self, precision: i32) {
        let factor = cast::<T>(10.0).powi(precision);
        self.w = (self.w * factor).round() / factor;
        self.x = (self.x * factor).round() / factor;
        self.y = (self.y * factor).round() / factor;
        self.z = (self.z * factor).round() / factor;
    }

    /// Elementwise comparison within an absolute tolerance.
    pub fn equal(&self, rhs: &Self, tol: T) -> bool {
        (self.w - rhs.w).abs() <= tol
            && (self.x - rhs.x).abs() <= tol
            && (self.y - rhs.y).abs() <= tol
            && (self.z - rhs.z).abs() <= tol
    }

    /// Spherical linear interpolation from `q0` (t = 0) to `q1` (t = 1).
    ///
    /// Always takes the shortest path: when `q0 · q1 < 0`, `q1` is negated
    /// (q and -q are the same rotation). When the endpoints are nearly
    /// parallel (`1 - |dot| <= 1e-6`) the spherical weights degenerate, so a
    /// linear interpolation followed by renormalization is used instead.
    pub fn slerp(q0: &Self, q1: &Self, t: T) -> Self {
        let mut dot = q0.dot(q1);
        let q1 = if dot < T::zero() {
            dot = -dot;
            -*q1
        } else {
            *q1
        };

        if T::one() - dot > cast(1e-6) {
            let angle = dot.min(T::one()).acos();
            let s = angle.sin();
            let c0 = ((T::one() - t) * angle).sin() / s;
            let c1 = (t * angle).sin() / s;
            *q0 * c0 + q1 * c1
        } else {
            let mut q = *q0 * (T::one() - t) + q1 * t;
            q.normalize();
            q
        }
    }

    /// Spherical quadratic (cubic-spline) interpolation.
    ///
    /// `p` and `q` are the segment endpoints, `a` and `b` the inner control
    /// points (see [`Quaternion::squad_control`]); `t` runs over `[0, 1]`.
    /// Built from two nested slerps:
    /// `slerp(2t(1-t), slerp(t, p, q), slerp(t, a, b))`.
    pub fn squad(p: &Self, a: &Self, b: &Self, q: &Self, t: T) -> Self {
        let two = T::one() + T::one();
        let slerp_t = two * t * (T::one() - t);
        let outer = Self::slerp(p, q, t);
        let inner = Self::slerp(a, b, t);
        Self::slerp(&outer, &inner, slerp_t)
    }

    /// The squad inner control point at `cur` for the key sequence
    /// `prev, cur, next`, computed from the quaternion logarithm:
    /// `cur * exp(-(log(cur⁻¹ next) + log(cur⁻¹ prev)) / 4)`.
    pub fn squad_control(prev: &Self, cur: &Self, next: &Self) -> Self {
        let inv = cur.inverse();
        let tangent = ((inv * *next).log() + (inv * *prev).log()) * cast::<T>(-0.25);
        *cur * tangent.exp()
    }

    /// Advance the orientation by a constant angular velocity (rad/s, body
    /// frame) applied over `dt` seconds.
    ///
    /// First-order step: builds the delta rotation `exp(ω dt / 2)` and
    /// composes it on the left. For very small steps the sine and cosine are
    /// replaced by their series expansions to avoid cancellation.
    pub fn integrate(&self, angular_velocity: &Vector3<T>, dt: T) -> Self {
        let two = T::one() + T::one();
        let theta = *angular_velocity * (dt / two);
        let theta_sq = theta.squared_length();

        let (w, s) = if theta_sq * theta_sq / cast(24.0) < T::min_positive_value() {
            (
                T::one() - theta_sq / two,
                T::one() - theta_sq / cast(6.0),
            )
        } else {
            let mag = theta_sq.sqrt();
            (mag.cos(), mag.sin() / mag)
        };

        let dq = Self::new(w, theta.x * s, theta.y * s, theta.z * s);
        dq * *self
    }
}

impl<T: Real> Add for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.w + rhs.w,
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
        )
    }
}

impl<T: Real> AddAssign for Quaternion<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Real> Sub for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.w - rhs.w,
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
        )
    }
}

impl<T: Real> SubAssign for Quaternion<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Real> Neg for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

impl<T: Real> Mul for Quaternion<T> {
    type Output = Self;

    /// Hamilton product. `q1 * q2` applies `q2` first, then `q1`.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

impl<T: Real> MulAssign for Quaternion<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Real> Mul<T> for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.w * rhs, self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl<T: Real> Mul<Vector3<T>> for Quaternion<T> {
    type Output = Vector3<T>;

    /// Rotate a vector, shorthand for [`Quaternion::rotate_vector`].
    #[inline]
    fn mul(self, v: Vector3<T>) -> Vector3<T> {
        self.rotate_vector(&v)
    }
}

impl<T: Real> fmt::Display for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.w, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn same_rotation(a: &Quaternion<f64>, b: &Quaternion<f64>, tol: f64) -> bool {
        a.equal(b, tol) || a.equal(&-*b, tol)
    }

    #[test]
    fn test_identity_default() {
        let q = Quaternion::<f64>::default();
        assert_eq!(q, Quaternion::<f64>::IDENTITY);
        assert_eq!(q.xyzw(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normalize_unit_and_idempotent() {
        let q = Quaternion::new(1.0f64, 2.0, 3.0, 4.0);
        let n = q.normalized();
        assert_relative_eq!(n.dot(&n), 1.0, epsilon = 1e-12);
        assert!(n.equal(&n.normalized(), 1e-12));
    }

    #[test]
    fn test_normalize_zero_is_identity() {
        let mut q = Quaternion::<f64>::ZERO;
        q.normalize();
        assert_eq!(q, Quaternion::<f64>::IDENTITY);
    }

    #[test]
    fn test_inverse_non_unit() {
        let q = Quaternion::new(1.0f64, 2.0, 3.0, 4.0);
        assert!((q * q.inverse()).equal(&Quaternion::<f64>::IDENTITY, 1e-12));
    }

    #[test]
    fn test_mul_applies_rhs_first() {
        let qx = Quaternion::from_axis_angle(&Vector3::unit_x(), FRAC_PI_2);
        let qz = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
        // Rx first maps Z to -Y, then Rz maps -Y to X.
        let v = (qz * qx).rotate_vector(&Vector3::unit_z());
        assert!(v.equal(&Vector3::unit_x(), 1e-12));
    }

    #[test]
    fn test_mul_matches_matrix_composition() {
        let q1 = Quaternion::from_euler(0.1f64, -0.7, 0.4);
        let q2 = Quaternion::from_euler(1.2f64, 0.3, -0.5);
        let composed = Matrix3::from_quaternion(&(q1 * q2));
        let product = Matrix3::from_quaternion(&q1) * Matrix3::from_quaternion(&q2);
        assert!(composed.equal(&product, 1e-12));
    }

    #[test]
    fn test_rotate_vector_half_turn() {
        let mut q = Quaternion::identity();
        q.set_from_axis_angle(1.0f64, 0.0, 0.0, PI);
        let v = q.rotate_vector(&Vector3::new(0.0, 1.0, 0.0));
        assert!(v.equal(&Vector3::new(0.0, -1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_rotate_vector_reverse() {
        let q = Quaternion::from_euler(0.3f64, -0.2, 1.1);
        let v = Vector3::new(1.0, 2.0, 3.0);
        let back = q.rotate_vector_reverse(&q.rotate_vector(&v));
        assert!(back.equal(&v, 1e-12));
    }

    #[test]
    fn test_axis_angle_roundtrip_through_matrix() {
        let q = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
        let m = Matrix3::from_quaternion(&q);
        let back = Quaternion::from_matrix(&m);
        assert!(same_rotation(&q, &back, 1e-12));
    }

    #[test]
    fn test_from_matrix_all_branches() {
        // Large angles about each axis exercise the three diagonal branches;
        // a small rotation exercises the trace branch.
        for (axis, angle) in [
            (Vector3::unit_x(), 3.0f64),
            (Vector3::unit_y(), 3.0),
            (Vector3::unit_z(), 3.0),
            (Vector3::new(1.0, 1.0, 1.0), 0.2),
        ] {
            let q = Quaternion::from_axis_angle(&axis, angle);
            let back = Quaternion::from_matrix(&Matrix3::from_quaternion(&q));
            assert!(same_rotation(&q, &back, 1e-12));
        }
    }

    #[test]
    fn test_axis_angle_decomposition() {
        let axis = Vector3::new(0.0f64, 0.0, 1.0);
        let q = Quaternion::from_axis_angle(&axis, FRAC_PI_2);
        let (a, angle) = q.axis_angle();
        assert!(a.equal(&axis, 1e-12));
        assert_relative_eq!(angle, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle_identity_fallback() {
        let (axis, angle) = Quaternion::<f64>::IDENTITY.axis_angle();
        assert_eq!(axis, Vector3::<f64>::UNIT_X);
        assert_relative_eq!(angle, 0.0);
    }

    #[test]
    fn test_euler_roundtrip() {
        let (roll, pitch, yaw) = (0.1f64, -0.4, 2.0);
        let e = Quaternion::from_euler(roll, pitch, yaw).euler();
        assert!(e.equal(&Vector3::new(roll, pitch, yaw), 1e-12));
    }

    #[test]
    fn test_euler_single_axis_matches_axis_angle() {
        let q = Quaternion::from_euler(0.8f64, 0.0, 0.0);
        let r = Quaternion::from_axis_angle(&Vector3::unit_x(), 0.8);
        assert!(q.equal(&r, 1e-12));
    }

    #[test]
    fn test_euler_gimbal_lock_fallback() {
        // At pitch = π/2 only yaw - roll is observable; the defined fallback
        // reports roll = 0 and folds the difference into yaw.
        let e = Quaternion::from_euler(0.3f64, FRAC_PI_2, 0.5).euler();
        assert_relative_eq!(e.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(e.y, FRAC_PI_2, epsilon = 1e-9);
        assert_relative_eq!(e.z, 0.2, epsilon = 1e-9);

        let e = Quaternion::from_euler(0.3f64, -FRAC_PI_2, 0.5).euler();
        assert_relative_eq!(e.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(e.y, -FRAC_PI_2, epsilon = 1e-9);
        assert_relative_eq!(e.z, 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_roll_pitch_yaw_accessors() {
        let q = Quaternion::from_euler(0.1f64, 0.2, 0.3);
        assert_relative_eq!(q.roll(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(q.pitch(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(q.yaw(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_from_2_axes() {
        let v1 = Vector3::new(1.0f64, 0.0, 0.0);
        let v2 = Vector3::new(0.0f64, 1.0, 0.0);
        let q = Quaternion::from_2_axes(&v1, &v2);
        assert!(q.rotate_vector(&v1).equal(&v2, 1e-12));
        // Scale must not matter.
        let q2 = Quaternion::from_2_axes(&(v1 * 3.0), &(v2 * 0.5));
        assert!(q.equal(&q2, 1e-12));
    }

    #[test]
    fn test_from_2_axes_antiparallel_fallback() {
        // v1 along X: the X cross is zero, so the fallback axis is v1 x Y = Z.
        let v1 = Vector3::new(1.0f64, 0.0, 0.0);
        let v2 = Vector3::new(-1.0f64, 0.0, 0.0);
        let q = Quaternion::from_2_axes(&v1, &v2);
        assert!(q.rotate_vector(&v1).equal(&v2, 1e-12));
        let expected = Quaternion::from_axis_angle(&Vector3::unit_z(), PI);
        assert!(same_rotation(&q, &expected, 1e-12));
    }

    #[test]
    fn test_slerp_identical_endpoints() {
        let q = Quaternion::from_euler(0.4f64, 0.1, -0.9);
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert!(Quaternion::slerp(&q, &q, t).equal(&q, 1e-12));
        }
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let q0 = Quaternion::from_axis_angle(&Vector3::unit_z(), 0.0f64);
        let q1 = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
        assert!(Quaternion::slerp(&q0, &q1, 0.0).equal(&q0, 1e-12));
        assert!(Quaternion::slerp(&q0, &q1, 1.0).equal(&q1, 1e-12));
        let mid = Quaternion::slerp(&q0, &q1, 0.5);
        let expected = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2 / 2.0);
        assert!(mid.equal(&expected, 1e-12));
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let q0 = Quaternion::from_axis_angle(&Vector3::unit_z(), 0.1f64);
        let q1 = -Quaternion::from_axis_angle(&Vector3::unit_z(), 0.3);
        let mid = Quaternion::slerp(&q0, &q1, 0.5);
        let expected = Quaternion::from_axis_angle(&Vector3::unit_z(), 0.2);
        assert!(same_rotation(&mid, &expected, 1e-12));
    }

    #[test]
    fn test_squad_endpoints() {
        let p = Quaternion::from_euler(0.1f64, 0.2, 0.3);
        let q = Quaternion::from_euler(-0.3f64, 0.5, 1.0);
        let prev = Quaternion::from_euler(0.0f64, 0.0, 0.0);
        let next = Quaternion::from_euler(-0.5f64, 0.8, 1.4);
        let a = Quaternion::squad_control(&prev, &p, &q);
        let b = Quaternion::squad_control(&p, &q, &next);
        assert!(Quaternion::squad(&p, &a, &b, &q, 0.0).equal(&p, 1e-12));
        assert!(Quaternion::squad(&p, &a, &b, &q, 1.0).equal(&q, 1e-12));
    }

    #[test]
    fn test_log_exp_roundtrip() {
        let q = Quaternion::from_axis_angle(&Vector3::new(1.0f64, -1.0, 0.5), 1.3);
        assert!(q.log().exp().equal(&q, 1e-12));
        assert!(Quaternion::<f64>::IDENTITY.log().equal(&Quaternion::<f64>::ZERO, 1e-12));
    }

    #[test]
    fn test_integrate_quarter_turn() {
        let q = Quaternion::<f64>::IDENTITY.integrate(&Vector3::new(0.0, 0.0, FRAC_PI_2), 1.0);
        let expected = Quaternion::from_axis_angle(&Vector3::unit_z(), FRAC_PI_2);
        assert!(q.equal(&expected, 1e-12));
    }

    #[test]
    fn test_integrate_small_step() {
        let omega = Vector3::new(1e-12f64, 0.0, 0.0);
        let q = Quaternion::<f64>::IDENTITY.integrate(&omega, 1e-3);
        assert!(q.equal(&Quaternion::<f64>::IDENTITY, 1e-9));
        assert!(q.is_finite());
    }

    #[test]
    fn test_axes_are_matrix_columns() {
        let q = Quaternion::from_euler(0.7f64, -0.3, 0.4);
        let m = Matrix3::from_quaternion(&q);
        assert!(q
            .x_axis()
            .equal(&Vector3::new(m[(0, 0)], m[(1, 0)], m[(2, 0)]), 1e-12));
        assert!(q
            .y_axis()
            .equal(&Vector3::new(m[(0, 1)], m[(1, 1)], m[(2, 1)]), 1e-12));
        assert!(q
            .z_axis()
            .equal(&Vector3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)]), 1e-12));
    }

    #[test]
    fn test_scale_doubles_angle() {
        let mut q = Quaternion::from_axis_angle(&Vector3::unit_z(), 0.4f64);
        q.scale(2.0);
        let expected = Quaternion::from_axis_angle(&Vector3::unit_z(), 0.8);
        assert!(q.equal(&expected, 1e-12));
    }

    #[test]
    fn test_correct_replaces_nan() {
        let mut q = Quaternion::new(f64::NAN, f64::INFINITY, 0.25, f64::NEG_INFINITY);
        assert!(!q.is_finite());
        q.correct();
        assert!(q.is_finite());
        assert_eq!(q, Quaternion::new(1.0, 0.0, 0.25, 0.0));
    }

    #[test]
    fn test_round() {
        let mut q = Quaternion::new(0.12345f64, -0.9999, 1.00001, 0.5);
        q.round(3);
        assert!(q.equal(&Quaternion::new(0.123, -1.0, 1.0, 0.5), 1e-12));
    }

    #[test]
    fn test_random_is_unit() {
        for _ in 0..16 {
            let q = Quaternion::<f64>::random();
            assert!(q.is_finite());
            assert_relative_eq!(q.dot(&q), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_from_slice() {
        let q = Quaternion::from_slice(&[1.0f64, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(q, Quaternion::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            Quaternion::<f64>::from_slice(&[1.0]),
            Err(crate::AlgebraError::InvalidLength {
                expected: 4,
                got: 1
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Quaternion::<f64>::IDENTITY.to_string(), "1 0 0 0");
        assert_eq!(
            Quaternion::new(0.5f64, -0.5, 0.25, 0.0).to_string(),
            "0.5 -0.5 0.25 0"
        );
    }

    #[test]
    fn test_algebra_ops() {
        let a = Quaternion::new(1.0f64, 2.0, 3.0, 4.0);
        let b = Quaternion::new(0.5f64, -1.0, 0.0, 2.0);
        assert_eq!(a + b, Quaternion::new(1.5, 1.0, 3.0, 6.0));
        assert_eq!(a - b, Quaternion::new(0.5, 3.0, 3.0, 2.0));
        assert_eq!(-a, Quaternion::new(-1.0, -2.0, -3.0, -4.0));
        assert_eq!(a * 2.0, Quaternion::new(2.0, 4.0, 6.0, 8.0));

        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
        c -= b;
        assert!(c.equal(&a, 1e-12));
        let mut d = a;
        d *= b;
        assert_eq!(d, a * b);
    }

    #[test]
    fn test_equal_tolerance() {
        let a = Quaternion::<f64>::IDENTITY;
        let b = Quaternion::new(1.0 + 1e-9, 0.0, 0.0, 0.0);
        assert!(a.equal(&b, 1e-8));
        assert!(!a.equal(&b, 1e-10));
    }
}
