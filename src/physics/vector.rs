//! Three-component vector for spatial computation.
//!
//! Arithmetic methods mutate the receiver in place, matching how a simulation
//! step updates particle state tick by tick. `get()` (or plain `Copy`) is the
//! way to take an independent snapshot. Value-style operators from
//! `std::ops` are provided as well.

use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

/// 3D vector with f64 components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Right-hand side of the in-place arithmetic methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// Component-wise with another vector.
    Vector(Vector),
    /// Explicit x, y, z.
    Components(f64, f64, f64),
    /// One value applied to all three components.
    Scalar(f64),
}

impl Operand {
    #[inline]
    fn components(self) -> (f64, f64, f64) {
        match self {
            Self::Vector(v) => (v.x, v.y, v.z),
            Self::Components(x, y, z) => (x, y, z),
            Self::Scalar(s) => (s, s, s),
        }
    }
}

impl From<Vector> for Operand {
    fn from(v: Vector) -> Self {
        Self::Vector(v)
    }
}

impl From<&Vector> for Operand {
    fn from(v: &Vector) -> Self {
        Self::Vector(*v)
    }
}

impl From<f64> for Operand {
    fn from(s: f64) -> Self {
        Self::Scalar(s)
    }
}

impl From<(f64, f64, f64)> for Operand {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::Components(x, y, z)
    }
}

impl From<[f64; 3]> for Operand {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::Components(x, y, z)
    }
}

impl Vector {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Add in place.
    pub fn add(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y, z) = rhs.into().components();
        self.x += x;
        self.y += y;
        self.z += z;
        self
    }

    /// Subtract in place.
    pub fn subtract(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y, z) = rhs.into().components();
        self.x -= x;
        self.y -= y;
        self.z -= z;
        self
    }

    /// Multiply in place.
    pub fn multiply(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y, z) = rhs.into().components();
        self.x *= x;
        self.y *= y;
        self.z *= z;
        self
    }

    /// Divide in place. Division by zero follows IEEE rules.
    pub fn divide(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y, z) = rhs.into().components();
        self.x /= x;
        self.y /= y;
        self.z /= z;
        self
    }

    pub fn dot_product(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross_product(&self, other: &Vector) -> Vector {
        Vector::new(
            self.y * other.z - other.y * self.z,
            self.z * other.x - other.z * self.x,
            self.x * other.y - other.x * self.y,
        )
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        self.dot_product(self).sqrt()
    }

    /// Euclidean distance to another vector.
    pub fn distance(&self, other: &Vector) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Scale to unit length. The zero vector is left unchanged.
    pub fn normalize(&mut self) -> &mut Self {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            self.divide(magnitude);
        }
        self
    }

    /// Angle to another vector in radians.
    ///
    /// NaN when either vector has zero magnitude.
    pub fn angle_between(&self, other: &Vector) -> f64 {
        (self.dot_product(other) / (self.magnitude() * other.magnitude())).acos()
    }

    /// Clamp the magnitude to at most `max`.
    pub fn limit(&mut self, max: f64) -> &mut Self {
        if self.magnitude() > max {
            self.normalize();
            self.multiply(max);
        }
        self
    }

    /// An independent copy.
    pub fn get(&self) -> Vector {
        *self
    }

    /// Overwrite all three components.
    pub fn set(&mut self, value: impl Into<Vector>) -> &mut Self {
        *self = value.into();
        self
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<(f64, f64, f64)> for Vector {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f64; 3]> for Vector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<&Vector> for Vector {
    fn from(v: &Vector) -> Self {
        *v
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

impl ops::Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl ops::Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl ops::Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl ops::Div<f64> for Vector {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl ops::Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl ops::AddAssign for Vector {
    fn add_assign(&mut self, other: Self) {
        Vector::add(self, other);
    }
}

impl ops::SubAssign for Vector {
    fn sub_assign(&mut self, other: Self) {
        self.subtract(other);
    }
}

impl ops::MulAssign<f64> for Vector {
    fn mul_assign(&mut self, scalar: f64) {
        self.multiply(scalar);
    }
}

impl ops::DivAssign<f64> for Vector {
    fn div_assign(&mut self, scalar: f64) {
        self.divide(scalar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_add_forms() {
        let mut v = Vector::new(1.0, 2.0, 3.0);
        v.add(Vector::new(1.0, 1.0, 1.0));
        assert_eq!(v, Vector::new(2.0, 3.0, 4.0));

        v.add((1.0, 0.0, -1.0));
        assert_eq!(v, Vector::new(3.0, 3.0, 3.0));

        v.add(0.5);
        assert_eq!(v, Vector::new(3.5, 3.5, 3.5));
    }

    #[test]
    fn test_subtract_multiply_divide() {
        let mut v = Vector::new(4.0, 6.0, 8.0);
        v.subtract((1.0, 2.0, 3.0)).multiply(2.0).divide(Vector::new(2.0, 4.0, 5.0));
        assert_eq!(v, Vector::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_dot_and_cross() {
        let x = Vector::new(1.0, 0.0, 0.0);
        let y = Vector::new(0.0, 1.0, 0.0);

        assert_eq!(x.dot_product(&y), 0.0);
        assert_eq!(x.cross_product(&y), Vector::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross_product(&x), Vector::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_magnitude_and_distance() {
        let v = Vector::new(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.distance(&Vector::new(3.0, 4.0, 12.0)), 12.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = Vector::new(2.0, -7.0, 4.0);
        v.normalize();
        assert!((v.magnitude() - 1.0).abs() < EPS);

        let mut zero = Vector::ZERO;
        zero.normalize();
        assert_eq!(zero, Vector::ZERO);
    }

    #[test]
    fn test_angle_between() {
        let x = Vector::new(1.0, 0.0, 0.0);
        let y = Vector::new(0.0, 2.0, 0.0);
        assert!((x.angle_between(&y) - FRAC_PI_2).abs() < EPS);
        assert!(x.angle_between(&Vector::ZERO).is_nan());
    }

    #[test]
    fn test_limit() {
        let mut v = Vector::new(30.0, 40.0, 0.0);
        v.limit(5.0);
        assert!((v.magnitude() - 5.0).abs() < EPS);
        assert!((v.x - 3.0).abs() < EPS);

        let mut short = Vector::new(1.0, 0.0, 0.0);
        short.limit(5.0);
        assert_eq!(short, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_get_is_independent() {
        let v = Vector::new(1.0, 2.0, 3.0);
        let mut copy = v.get();
        assert_eq!(copy, v);

        copy.add(1.0);
        assert_eq!(v, Vector::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_set() {
        let mut v = Vector::ZERO;
        v.set((1.0, 2.0, 3.0));
        assert_eq!(v, Vector::new(1.0, 2.0, 3.0));

        v.set([4.0, 5.0, 6.0]);
        assert_eq!(v.to_array(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_operators() {
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(1.0, 1.0, 1.0);

        assert_eq!(a + b, Vector::new(2.0, 3.0, 4.0));
        assert_eq!(a - b, Vector::new(0.0, 1.0, 2.0));
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0, 6.0));
        assert_eq!(-a / 2.0, Vector::new(-0.5, -1.0, -1.5));

        let mut c = a;
        c += b;
        c *= 2.0;
        assert_eq!(c, Vector::new(4.0, 6.0, 8.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector::new(1.0, 2.5, -3.0).to_string(), "[1, 2.5, -3]");
    }

    #[test]
    fn test_deserialize_shapes() {
        let v: Vector = serde_json::from_str(r#"{ "x": 1, "z": 2 }"#).unwrap();
        assert_eq!(v, Vector::new(1.0, 0.0, 2.0));

        let v: Vector = serde_json::from_str("[4, 5, 6]").unwrap();
        assert_eq!(v, Vector::new(4.0, 5.0, 6.0));
    }
}
