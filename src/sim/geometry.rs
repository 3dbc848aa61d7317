//! Line segment geometry for track walls
//!
//! Walls, the start line and entity bounding-box edges are all plain
//! segments in world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Denominators smaller than this are treated as parallel segments
const PARALLEL_EPSILON: f32 = 1e-9;

/// A straight segment between two world points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Unit normal: the direction rotated 90° and normalized.
    /// Zero for a degenerate (zero-length) segment.
    pub fn normal(&self) -> Vec2 {
        let dir = self.direction();
        Vec2::new(-dir.y, dir.x).normalize_or_zero()
    }

    /// Unit normal flipped, if needed, to point at the side `point` is on
    pub fn normal_toward(&self, point: Vec2) -> Vec2 {
        let normal = self.normal();
        if (point - self.start).dot(normal) < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Intersection point with another segment, if any
    pub fn intersection(&self, other: &Segment) -> Option<Vec2> {
        segment_intersection(self.start, self.end, other.start, other.end)
    }
}

/// Parametric segment/segment intersection.
///
/// Solves `a0 + t(a1 - a0) = b0 + s(b1 - b0)` and reports a hit when both
/// parameters fall in [0, 1]. Parallel and degenerate inputs miss.
pub fn segment_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<Vec2> {
    let s1 = a1 - a0;
    let s2 = b1 - b0;

    let denom = -s2.x * s1.y + s1.x * s2.y;
    if denom.abs() < PARALLEL_EPSILON || !denom.is_finite() {
        return None;
    }

    let d = a0 - b0;
    let s = (-s1.y * d.x + s1.x * d.y) / denom;
    let t = (s2.x * d.y - s2.y * d.x) / denom;

    if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        Some(a0 + s1 * t)
    } else {
        None
    }
}

/// Reflect velocity off a surface with the given unit normal
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// The four edges of an axis-aligned box with its top-left corner at `origin`
pub fn box_edges(origin: Vec2, size: Vec2) -> [Segment; 4] {
    let top_left = origin;
    let top_right = origin + Vec2::new(size.x, 0.0);
    let bottom_right = origin + size;
    let bottom_left = origin + Vec2::new(0.0, size.y);
    [
        Segment::new(top_left, top_right),
        Segment::new(top_right, bottom_right),
        Segment::new(bottom_right, bottom_left),
        Segment::new(bottom_left, top_left),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_segments_intersect() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        let p = hit.expect("diagonals should cross");
        assert!((p - Vec2::new(5.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_disjoint_segments_miss() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(5.0, -1.0),
            Vec2::new(5.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_parallel_and_degenerate_segments_miss() {
        // Parallel
        assert!(
            segment_intersection(
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(10.0, 1.0),
            )
            .is_none()
        );
        // Collinear overlap is still a zero denominator
        assert!(
            segment_intersection(
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(5.0, 0.0),
                Vec2::new(15.0, 0.0),
            )
            .is_none()
        );
        // Zero-length wall
        let point = Vec2::new(3.0, 3.0);
        assert!(
            segment_intersection(Vec2::new(0.0, 3.0), Vec2::new(6.0, 3.0), point, point).is_none()
        );
    }

    #[test]
    fn test_normal_is_unit_perpendicular() {
        let wall = Segment::new(Vec2::new(25.0, -50.0), Vec2::new(25.0, 50.0));
        let n = wall.normal();
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!(n.dot(wall.direction()).abs() < 1e-4);
        assert_eq!(Segment::new(Vec2::ONE, Vec2::ONE).normal(), Vec2::ZERO);
    }

    #[test]
    fn test_normal_toward_picks_point_side() {
        let wall = Segment::new(Vec2::new(25.0, 50.0), Vec2::new(25.0, -50.0));
        let n = wall.normal_toward(Vec2::new(0.0, 0.0));
        assert!(n.x < 0.0);
        let n = wall.normal_toward(Vec2::new(40.0, 0.0));
        assert!(n.x > 0.0);
    }

    #[test]
    fn test_reflect() {
        let reflected = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 1e-4);
        assert!(reflected.y.abs() < 1e-4);
    }
}
