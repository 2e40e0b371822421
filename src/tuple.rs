use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A point or a direction in 3D space.
///
/// There is no `w` component; the same type is used for positions and for
/// directions, and the caller decides which one a value stands for.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple3D {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PartialEq for Tuple3D {
    fn eq(&self, other: &Tuple3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Tuple3D {
    fn from(a: [f64; 3]) -> Tuple3D {
        Tuple3D { x: a[0], y: a[1], z: a[2] }
    }
}

impl Tuple3D {
    pub fn new(x: f64, y: f64, z: f64) -> Tuple3D {
        Tuple3D { x, y, z }
    }

    /// The world origin, `(0, 0, 0)`.
    pub fn origin() -> Tuple3D {
        Tuple3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
        )
    }

    /// Scales the tuple to unit length.
    ///
    /// A zero-length tuple produces NaN components; nothing here guards
    /// against it.
    pub fn normalize(&self) -> Tuple3D {
        let mag = self.magnitude();

        Tuple3D {
            x: self.x * (1.0 / mag),
            y: self.y * (1.0 / mag),
            z: self.z * (1.0 / mag),
        }
    }

    pub fn dot(&self, other: &Tuple3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// The signed length of `self` along the direction of `other`.
    ///
    /// ```
    /// use kite_tracer::tuple::Tuple3D;
    ///
    /// let v = Tuple3D::new(3.0, 4.0, 0.0);
    /// let along = Tuple3D::new(10.0, 0.0, 0.0);
    ///
    /// assert_eq!(v.component(&along), 3.0);
    /// ```
    pub fn component(&self, other: &Tuple3D) -> f64 {
        self.dot(other) / other.magnitude()
    }
}

impl Add for Tuple3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Tuple3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Tuple3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a 3D tuple.
///
/// ```
/// use kite_tracer::tuple::Tuple3D;
///
/// let t = Tuple3D::new(1.0, 2.0, 3.0);
///
/// // (notice how the scalar is on the right)
/// assert_eq!(t * 5.0, Tuple3D::new(5.0, 10.0, 15.0));
/// ```
impl Mul<f64> for Tuple3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a 3D tuple.
impl Mul<Tuple3D> for f64 {
    type Output = Tuple3D;

    fn mul(self, other: Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self * other.x,
            y: self * other.y,
            z: self * other.z,
        }
    }
}

/* Tests */

#[test]
fn add_tuples() {
    let a1 = Tuple3D::new(3.0, -2.0, 5.0);
    let a2 = Tuple3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Tuple3D::new(1.0, 1.0, 6.0));
    assert_eq!(a2 + a1, a1 + a2);
}

#[test]
fn sub_tuples() {
    let p1 = Tuple3D::new(3.0, 2.0, 1.0);
    let p2 = Tuple3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_tuple() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Tuple3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Tuple3D::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Tuple3D::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Tuple3D::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Tuple3D::new(1.0, 2.0, 3.0);
    let e = Tuple3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
    assert!(feq(v.normalize().magnitude(), 1.0));
}

#[test]
fn normalize_zero_is_nan() {
    let n = Tuple3D::origin().normalize();

    assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
}

#[test]
fn dot_vectors() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(b.dot(&a), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Tuple3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple3D::new(1.0, -2.0, 1.0));
}

#[test]
fn component_along_negative_direction() {
    let v = Tuple3D::new(0.0, 2.0, 5.0);
    let down = Tuple3D::new(0.0, -4.0, 0.0);

    assert!(feq(v.component(&down), -2.0));
}
