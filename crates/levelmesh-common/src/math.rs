//! Math utilities for 2D level geometry

use glam::Vec2;

/// Tolerance used by the parametric intersection and containment tests.
pub const EPSILON: f32 = 1e-6;

/// Calculates the cross product of two 2D vectors (the z component of the
/// equivalent 3D cross product)
#[inline]
pub fn cross_2d(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Calculates the dot product of two 2D vectors
#[inline]
pub fn dot_2d(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Converts a floating point coordinate to an integer by rounding
#[inline]
pub fn float_to_int(value: f32) -> i32 {
    value.round() as i32
}

/// Squared distance between two points
#[inline]
pub fn dist_sqr(a: Vec2, b: Vec2) -> f32 {
    (b - a).length_squared()
}

/// Checks whether two points are within `epsilon` distance of each other
/// (squared-distance test, no square root)
#[inline]
pub fn close_enough(a: Vec2, b: Vec2, epsilon: f32) -> bool {
    dist_sqr(a, b) <= epsilon * epsilon
}

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Computes the bounds of a point set. Empty input collapses to a
    /// degenerate rectangle at the origin.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut bounds = match points.first() {
            Some(&p) => Self { min: p, max: p },
            None => Self {
                min: Vec2::ZERO,
                max: Vec2::ZERO,
            },
        };
        for &p in &points[1.min(points.len())..] {
            bounds.min = bounds.min.min(p);
            bounds.max = bounds.max.max(p);
        }
        bounds
    }

    /// True when the two rectangles intersect or touch.
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// The four corners as a counter-clockwise ring.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_2d() {
        assert_eq!(cross_2d(Vec2::X, Vec2::Y), 1.0);
        assert_eq!(cross_2d(Vec2::Y, Vec2::X), -1.0);
        assert_eq!(cross_2d(Vec2::X, Vec2::X), 0.0);
    }

    #[test]
    fn test_float_to_int_rounds_to_nearest() {
        assert_eq!(float_to_int(1.4), 1);
        assert_eq!(float_to_int(1.6), 2);
        assert_eq!(float_to_int(-1.5), -2);
        assert_eq!(float_to_int(0.0), 0);
    }

    #[test]
    fn test_close_enough() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(1.0, 1.005);
        assert!(close_enough(a, b, 0.01));
        assert!(!close_enough(a, b, 0.001));
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [
            Vec2::new(3.0, -1.0),
            Vec2::new(-2.0, 5.0),
            Vec2::new(0.0, 0.0),
        ];
        let b = Bounds::from_points(&points);
        assert_eq!(b.min, Vec2::new(-2.0, -1.0));
        assert_eq!(b.max, Vec2::new(3.0, 5.0));

        let empty = Bounds::from_points(&[]);
        assert_eq!(empty.min, Vec2::ZERO);
        assert_eq!(empty.max, Vec2::ZERO);
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = Bounds::new(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0));
        let c = Bounds::new(Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0));
        let d = Bounds::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0));

        assert!(a.overlaps(&b));
        // Touching counts as overlapping
        assert!(a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }
}
