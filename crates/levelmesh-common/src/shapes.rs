//! Shape value types used across the pipeline
//!
//! Rings and triangle soups are the currency of the pipeline; the
//! [`Shape`] sum type covers the level-content vocabulary (points, walls,
//! polylines, filled polygons) without a common base interface. Each
//! variant implements only the operations that are meaningful for it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::math::Bounds;

/// A closed polygon boundary stored as an ordered point sequence.
///
/// The last point is implicitly connected back to the first. Insertion
/// order defines winding. Rings with fewer than 3 points are degenerate
/// and rejected by the stages that require area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    points: Vec<Vec2>,
}

impl Ring {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn signed_area(&self) -> f32 {
        geometry::signed_area(&self.points)
    }

    pub fn area(&self) -> f32 {
        geometry::area(&self.points)
    }

    pub fn is_clockwise(&self) -> bool {
        geometry::is_clockwise(&self.points)
    }

    pub fn centroid(&self) -> Vec2 {
        geometry::centroid(&self.points)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.points)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        geometry::point_in_polygon(&self.points, p)
    }

    pub fn longest_side_angle(&self) -> f32 {
        geometry::longest_side_angle(&self.points)
    }

    /// Removes consecutive collinear points, returning a ring with the
    /// same boundary. The result may be degenerate (fewer than 3 points).
    pub fn without_collinear_points(&self) -> Ring {
        let n = self.points.len();
        if n < 3 {
            return self.clone();
        }
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            let cross = crate::math::cross_2d(cur - prev, next - cur);
            if cross.abs() > crate::math::EPSILON {
                kept.push(cur);
            }
        }
        Ring::new(kept)
    }
}

impl From<Vec<Vec2>> for Ring {
    fn from(points: Vec<Vec2>) -> Self {
        Ring::new(points)
    }
}

/// An unordered collection of rings, possibly disjoint or overlapping.
pub type PolygonSet = Vec<Ring>;

/// A flat triangle list: points grouped in runs of 3, each run one
/// triangle, wound counter-clockwise across the whole collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    points: Vec<Vec2>,
}

impl TriangleSoup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            points: Vec::with_capacity(triangles * 3),
        }
    }

    pub fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        self.points.push(a);
        self.points.push(b);
        self.points.push(c);
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn triangle_count(&self) -> usize {
        self.points.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn triangle(&self, i: usize) -> [Vec2; 3] {
        [self.points[i * 3], self.points[i * 3 + 1], self.points[i * 3 + 2]]
    }

    pub fn iter_triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }

    /// Appends another soup's triangles.
    pub fn extend(&mut self, other: &TriangleSoup) {
        self.points.extend_from_slice(&other.points);
    }

    /// Total area covered by the triangles.
    pub fn total_area(&self) -> f32 {
        self.iter_triangles()
            .map(|[a, b, c]| geometry::area(&[a, b, c]))
            .sum()
    }
}

/// An open segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleLine {
    pub a: Vec2,
    pub b: Vec2,
}

impl SimpleLine {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f32 {
        (self.b - self.a).length()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        geometry::closest_point_on_segment(p, self.a, self.b)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&[self.a, self.b])
    }
}

/// An open chain of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Vec2>,
}

impl Polyline {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| (w[1] - w[0]).length())
            .sum()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.points)
    }
}

/// Closed sum type over the level-content geometry vocabulary.
///
/// Only operations meaningful for every variant live here; the variant
/// types expose the rest directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Vec2),
    SimpleLine(SimpleLine),
    Polyline(Polyline),
    Polygon(Ring),
}

impl Shape {
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Point(p) => Bounds::new(*p, *p),
            Shape::SimpleLine(l) => l.bounds(),
            Shape::Polyline(l) => l.bounds(),
            Shape::Polygon(r) => r.bounds(),
        }
    }

    pub fn centroid(&self) -> Vec2 {
        match self {
            Shape::Point(p) => *p,
            Shape::SimpleLine(l) => l.midpoint(),
            Shape::Polyline(l) => geometry::centroid(&l.points),
            Shape::Polygon(r) => r.centroid(),
        }
    }

    /// Enclosed area. Only polygons enclose anything.
    pub fn area(&self) -> f32 {
        match self {
            Shape::Polygon(r) => r.area(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_basics() {
        let ring = Ring::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.area(), 16.0);
        assert!(!ring.is_clockwise());
        assert!(ring.contains(Vec2::new(2.0, 2.0)));
        assert!(!ring.contains(Vec2::new(5.0, 2.0)));
    }

    #[test]
    fn test_without_collinear_points() {
        let ring = Ring::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]);
        let cleaned = ring.without_collinear_points();
        assert_eq!(cleaned.len(), 4);
        assert_eq!(cleaned.area(), ring.area());

        // All points on one line collapses below 3 points
        let flat = Ring::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        ]);
        assert!(flat.without_collinear_points().len() < 3);
    }

    #[test]
    fn test_triangle_soup() {
        let mut soup = TriangleSoup::new();
        soup.push_triangle(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0));
        soup.push_triangle(Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0));
        assert_eq!(soup.triangle_count(), 2);
        assert!((soup.total_area() - 1.0).abs() < 1e-6);
        assert_eq!(soup.triangle(1)[2], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_shape_dispatch() {
        let point = Shape::Point(Vec2::new(3.0, 4.0));
        assert_eq!(point.centroid(), Vec2::new(3.0, 4.0));
        assert_eq!(point.area(), 0.0);

        let line = Shape::SimpleLine(SimpleLine::new(Vec2::ZERO, Vec2::new(4.0, 0.0)));
        assert_eq!(line.centroid(), Vec2::new(2.0, 0.0));

        let poly = Shape::Polygon(Ring::new(vec![
            Vec2::ZERO,
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]));
        assert_eq!(poly.area(), 4.0);
        assert!(poly.bounds().contains(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_polyline_length() {
        let line = Polyline::new(vec![Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(3.0, 4.0)]);
        assert_eq!(line.length(), 7.0);
    }
}
