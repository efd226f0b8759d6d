//! `Point`: a 3-component coordinate used by every geometric routine.
//!
//! Coordinates of lower embedding dimension are padded with zeros, so a
//! 2D mesh works in the `z = 0` plane and all formulas can use the same
//! `[f64; 3]` arithmetic.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A point (or vector) in R^3.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point(pub [f64; 3]);

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point([x, y, z])
    }

    /// Builds a point from a coordinate slice of length 1 to 3.
    #[inline]
    pub fn from_slice(x: &[f64]) -> Self {
        let mut p = [0.0; 3];
        for (dst, src) in p.iter_mut().zip(x.iter()) {
            *dst = *src;
        }
        Point(p)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub fn coordinates(&self) -> &[f64; 3] {
        &self.0
    }

    #[inline]
    pub fn dot(&self, other: &Point) -> f64 {
        self.0[0] * other.0[0] + self.0[1] * other.0[1] + self.0[2] * other.0[2]
    }

    #[inline]
    pub fn cross(&self, other: &Point) -> Point {
        let a = &self.0;
        let b = &other.0;
        Point([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }

    #[inline]
    pub fn squared_norm(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    #[inline]
    pub fn squared_distance(&self, other: &Point) -> f64 {
        (*self - *other).squared_norm()
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }

    /// Unit vector in the same direction; `None` for the zero vector.
    pub fn normalized(&self) -> Option<Point> {
        let n = self.norm();
        (n > 0.0).then(|| *self / n)
    }

    /// Rotates the point by `angle` radians about coordinate `axis` through `center`.
    pub fn rotated(&self, angle: f64, axis: usize, center: &Point) -> Point {
        let (s, c) = angle.sin_cos();
        let d = *self - *center;
        let r = match axis {
            0 => Point::new(d.x(), c * d.y() - s * d.z(), s * d.y() + c * d.z()),
            1 => Point::new(c * d.x() + s * d.z(), d.y(), -s * d.x() + c * d.z()),
            _ => Point::new(c * d.x() - s * d.y(), s * d.x() + c * d.y(), d.z()),
        };
        r + *center
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[f64; 3]> for Point {
    fn from(value: [f64; 3]) -> Self {
        Point(value)
    }
}

impl Index<usize> for Point {
    type Output = f64;
    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, o: Point) -> Point {
        Point([self.0[0] + o.0[0], self.0[1] + o.0[1], self.0[2] + o.0[2]])
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, o: Point) {
        *self = *self + o;
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, o: Point) -> Point {
        Point([self.0[0] - o.0[0], self.0[1] - o.0[1], self.0[2] - o.0[2]])
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, o: Point) {
        *self = *self - o;
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, s: f64) -> Point {
        Point([self.0[0] * s, self.0[1] * s, self.0[2] * s])
    }
}

impl Mul<Point> for f64 {
    type Output = Point;
    #[inline]
    fn mul(self, p: Point) -> Point {
        p * self
    }
}

impl Div<f64> for Point {
    type Output = Point;
    #[inline]
    fn div(self, s: f64) -> Point {
        Point([self.0[0] / s, self.0[1] / s, self.0[2] / s])
    }
}
