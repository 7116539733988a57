use std::ops::{Add, Sub, Mul, Neg};
use serde::{Serialize, Deserialize};

/// 2D point in plant space or canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector for a heading in degrees
    pub fn from_heading(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self {
            x: rad.cos(),
            y: rad.sin(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector, or zero for a zero-length input
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Rotated 90 degrees
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, 0.5)
    }

    /// Distance to another point
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_length() {
        let p = Point::new(3.0, 4.0);
        assert!((p.length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Point::ZERO.normalize(), Point::ZERO);
    }

    #[test]
    fn test_heading_up_is_negative_y() {
        let up = Point::from_heading(-90.0);
        assert!(up.x.abs() < 1e-9);
        assert!((up.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perpendicular_is_orthogonal() {
        let d = Point::new(2.0, 5.0);
        let p = d.perpendicular();
        assert!((d.x * p.x + d.y * p.y).abs() < 1e-9);
        assert!((p.length() - d.length()).abs() < 1e-9);
    }

    #[test]
    fn test_point_ops() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);

        assert_eq!((a + b).x, 5.0);
        assert_eq!((b - a).y, 4.0);
        assert_eq!((a * 2.0).y, 4.0);
        assert_eq!((-a).x, -1.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
        assert_eq!(a.midpoint(&b), Point::new(2.5, 4.0));
    }
}
