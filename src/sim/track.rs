//! Track geometry and the built-in course
//!
//! A `Track` is the static geometry one race is run on. A `Course` bundles
//! it with everything else a race needs to start: AI waypoints, spawn
//! points and the finish zone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;

/// Static race geometry. Never mutated once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub width: f32,
    pub height: f32,
    /// Wall segments bounding the drivable corridor (need not be closed)
    pub walls: Vec<Segment>,
    /// Checkpoints in visiting order; index 0 follows the last one
    pub checkpoints: Vec<Vec2>,
    pub start_line: Segment,
}

/// Goal area that ends the race
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinishZone {
    pub center: Vec2,
    pub radius: f32,
}

impl FinishZone {
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) < self.radius
    }
}

/// Everything needed to set up a race on one track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub track: Track,
    /// Path the AI follows, in order
    pub waypoints: Vec<Vec2>,
    /// Player's top-left starting corner
    pub player_start: Vec2,
    /// Origin of the opponent starting grid
    pub opponent_start: Vec2,
    pub finish: FinishZone,
}

impl Default for Course {
    fn default() -> Self {
        Self::winding_tube()
    }
}

impl Course {
    /// The standard 2000x4000 course: a long winding tube that funnels
    /// down into the egg-shaped finish zone near the bottom.
    pub fn winding_tube() -> Self {
        const W: f32 = 2000.0;
        const H: f32 = 4000.0;
        let mid = W / 2.0;

        let wall = |x0: f32, y0: f32, x1: f32, y1: f32| {
            Segment::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
        };

        let walls = vec![
            // Outer boundary
            wall(0.0, 0.0, W, 0.0),
            wall(W, 0.0, W, H),
            wall(W, H, 0.0, H),
            wall(0.0, H, 0.0, 0.0),
            // Entry tube
            wall(mid - 200.0, 0.0, mid - 200.0, 600.0),
            wall(mid + 200.0, 0.0, mid + 200.0, 600.0),
            // First bend
            wall(mid - 200.0, 600.0, 300.0, 800.0),
            wall(mid + 200.0, 600.0, W - 300.0, 800.0),
            wall(300.0, 800.0, 300.0, 1200.0),
            wall(W - 300.0, 800.0, W - 300.0, 1200.0),
            // Narrowing middle
            wall(300.0, 1200.0, mid - 150.0, 1600.0),
            wall(W - 300.0, 1200.0, mid + 150.0, 1600.0),
            wall(mid - 150.0, 1600.0, mid - 150.0, 2000.0),
            wall(mid + 150.0, 1600.0, mid + 150.0, 2000.0),
            // Second bend
            wall(mid - 150.0, 2000.0, W / 4.0, 2400.0),
            wall(mid + 150.0, 2000.0, W * 3.0 / 4.0, 2400.0),
            wall(W / 4.0, 2400.0, W / 4.0, 3000.0),
            wall(W * 3.0 / 4.0, 2400.0, W * 3.0 / 4.0, 3000.0),
            // Funnel to the egg
            wall(W / 4.0, 3000.0, mid - 200.0, 3500.0),
            wall(W * 3.0 / 4.0, 3000.0, mid + 200.0, 3500.0),
        ];

        let checkpoints = vec![
            Vec2::new(mid, 300.0),
            Vec2::new(mid, 700.0),
            Vec2::new(500.0, 1000.0),
            Vec2::new(W - 500.0, 1000.0),
            Vec2::new(mid, 1800.0),
            Vec2::new(W / 3.0, 2200.0),
            Vec2::new(W * 2.0 / 3.0, 2200.0),
            Vec2::new(mid, 2800.0),
            Vec2::new(mid, 3200.0),
        ];

        // AI path follows the checkpoints, then dives into the egg
        let mut waypoints = checkpoints.clone();
        waypoints.push(Vec2::new(mid, 3700.0));

        Self {
            track: Track {
                width: W,
                height: H,
                walls,
                checkpoints,
                start_line: wall(mid - 150.0, 150.0, mid + 150.0, 150.0),
            },
            waypoints,
            player_start: Vec2::new(mid - 10.0, 150.0),
            opponent_start: Vec2::new(mid + 20.0, 150.0),
            finish: FinishZone {
                center: Vec2::new(mid, H - 300.0),
                radius: 300.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding_tube_layout() {
        let course = Course::winding_tube();
        assert_eq!(course.track.walls.len(), 20);
        assert_eq!(course.track.checkpoints.len(), 9);
        assert_eq!(course.waypoints.len(), 10);
        assert!(course.finish.contains(Vec2::new(1000.0, 3700.0)));
        // Last checkpoint sits outside the finish zone
        assert!(!course.finish.contains(course.track.checkpoints[8]));
    }

    #[test]
    fn test_player_start_is_clear_of_walls() {
        use crate::sim::collision::box_wall_contact;
        use crate::sim::entity::Body;

        let course = Course::winding_tube();
        let body = Body::new(0, course.player_start, "green");
        assert!(
            course
                .track
                .walls
                .iter()
                .all(|w| box_wall_contact(&body, w).is_none())
        );
    }
}
