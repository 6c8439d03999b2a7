//! Logical 2D coordinates for gesture and curve math.
//!
//! This module provides [`Point2D`], the single coordinate type the sombrero
//! cores exchange with the hosting UI layer: pointer offsets, handle
//! positions, anchor origins and curve control points.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) at the top-left corner
//! - X-axis increases to the right
//! - Y-axis increases downward, so a positive sag moves a curve *down*
//!
//! # Example
//!
//! ```
//! use sombrero_ui::geometry::Point2D;
//!
//! let a = Point2D::new(0.0, 0.0);
//! let b = Point2D::new(3.0, 4.0);
//! assert_eq!(a.distance_to(b), 5.0);
//!
//! // Keep `b` within 2.5 units of `a`.
//! let clamped = b.clamp_within(2.5, a);
//! assert!((clamped.distance_to(a) - 2.5).abs() < 1e-5);
//! ```

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A position in logical units.
///
/// Values are plain `f32`; there is no invariant beyond being finite in
/// practice. Arithmetic operators work component-wise.
///
/// # Examples
///
/// ```
/// use sombrero_ui::geometry::Point2D;
///
/// let p = Point2D::new(10.0, 20.0) + Point2D::new(1.0, -2.0);
/// assert_eq!(p, Point2D::new(11.0, 18.0));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2D {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point2D {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offsets the point by the given deltas.
    ///
    /// ```
    /// use sombrero_ui::geometry::Point2D;
    ///
    /// let p = Point2D::new(10.0, 20.0).offset(5.0, -3.0);
    /// assert_eq!(p, Point2D::new(15.0, 17.0));
    /// ```
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The point halfway between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Clamps the point to lie inside the disc of `radius` around `anchor`.
    ///
    /// Points already inside (or on) the disc are returned unchanged; points
    /// outside are projected onto its rim along the line towards `anchor`.
    /// A non-positive radius collapses the disc onto `anchor`.
    ///
    /// ```
    /// use sombrero_ui::geometry::Point2D;
    ///
    /// let anchor = Point2D::new(100.0, 100.0);
    /// let inside = Point2D::new(103.0, 104.0);
    /// assert_eq!(inside.clamp_within(10.0, anchor), inside);
    ///
    /// let far = Point2D::new(100.0, 150.0);
    /// assert_eq!(far.clamp_within(10.0, anchor), Point2D::new(100.0, 110.0));
    /// ```
    pub fn clamp_within(self, radius: f32, anchor: Self) -> Self {
        if radius <= 0.0 {
            return anchor;
        }
        let distance = self.distance_to(anchor);
        if distance <= radius {
            return self;
        }
        let ratio = radius / distance;
        anchor + (self - anchor) * ratio
    }

    /// Converts the point to a `[x, y]` array.
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point2D, b: Point2D) -> f32 {
    a.distance_to(b)
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl AddAssign for Point2D {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point2D {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<[f32; 2]> for Point2D {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f32; 2] {
    fn from(point: Point2D) -> Self {
        point.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point2D::new(10.0, 20.0);
        let b = Point2D::new(5.0, 15.0);

        assert_eq!(a + b, Point2D::new(15.0, 35.0));
        assert_eq!(a - b, Point2D::new(5.0, 5.0));
        assert_eq!(a * 2.0, Point2D::new(20.0, 40.0));

        let mut c = a;
        c += b;
        c -= Point2D::new(1.0, 1.0);
        assert_eq!(c, Point2D::new(14.0, 34.0));
    }

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(distance(b, a), 5.0);
    }

    #[test]
    fn test_midpoint() {
        let a = Point2D::new(-10.0, 4.0);
        let b = Point2D::new(10.0, 8.0);
        assert_eq!(a.midpoint(b), Point2D::new(0.0, 6.0));
    }

    #[test]
    fn clamp_within_keeps_points_inside_disc() {
        let anchor = Point2D::new(50.0, 50.0);
        let on_rim = Point2D::new(60.0, 50.0);
        assert_eq!(on_rim.clamp_within(10.0, anchor), on_rim);
    }

    #[test]
    fn clamp_within_projects_onto_rim() {
        let anchor = Point2D::new(0.0, 0.0);
        let clamped = Point2D::new(30.0, 40.0).clamp_within(5.0, anchor);
        assert!((clamped.x - 3.0).abs() < 1e-5);
        assert!((clamped.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn clamp_within_zero_radius_returns_anchor() {
        let anchor = Point2D::new(7.0, 8.0);
        assert_eq!(Point2D::new(1.0, 1.0).clamp_within(0.0, anchor), anchor);
    }

    #[test]
    fn test_array_conversions() {
        let point: Point2D = [1.5, -2.0].into();
        let back: [f32; 2] = point.into();
        assert_eq!(back, [1.5, -2.0]);
    }
}
