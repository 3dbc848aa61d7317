//! Collision detection and response
//!
//! Two passes run each tick:
//! - racer vs track walls: bounding-box edges tested against every wall
//!   segment, resolved by reflecting off the wall and losing energy
//! - racer vs racer: axis-aligned box overlap, separated along the axis of
//!   least penetration

use glam::Vec2;

use super::entity::Body;
use super::geometry::{Segment, box_edges, reflect};
use super::track::Track;
use crate::consts::*;

/// Result of one wall being hit
#[derive(Debug, Clone)]
pub struct WallHit {
    /// Index of the wall in `Track::walls`
    pub wall: usize,
    /// First intersection point found between the box and the wall
    pub point: Vec2,
    /// Wall normal used for the response (points at the racer)
    pub normal: Vec2,
}

/// Find where a body's bounding box touches a wall, if it does
pub fn box_wall_contact(body: &Body, wall: &Segment) -> Option<Vec2> {
    box_edges(body.position, body.size())
        .iter()
        .find_map(|edge| edge.intersection(wall))
}

/// Bounce a body off every wall its bounding box touches.
///
/// Each wall is resolved in turn against the then-current velocity and
/// position; simultaneous hits are not solved together.
pub fn check_track_collisions(body: &mut Body, track: &Track) -> Vec<WallHit> {
    let mut hits = Vec::new();

    for (index, wall) in track.walls.iter().enumerate() {
        let Some(point) = box_wall_contact(body, wall) else {
            continue;
        };

        let normal = wall.normal_toward(body.center());
        if normal == Vec2::ZERO {
            continue;
        }

        body.velocity = reflect(body.velocity, normal) * WALL_RESTITUTION;
        body.position += normal * WALL_PUSH_DISTANCE;

        hits.push(WallHit {
            wall: index,
            point,
            normal,
        });
    }

    hits
}

/// Overlap of two bodies' boxes on each axis, if they overlap
fn box_overlap(a: &Body, b: &Body) -> Option<Vec2> {
    let overlapping = a.position.x < b.position.x + b.width
        && a.position.x + a.width > b.position.x
        && a.position.y < b.position.y + b.height
        && a.position.y + a.height > b.position.y;

    if !overlapping {
        return None;
    }

    Some(Vec2::new(
        (a.position.x + a.width - b.position.x).min(b.position.x + b.width - a.position.x),
        (a.position.y + a.height - b.position.y).min(b.position.y + b.height - a.position.y),
    ))
}

/// Separate one overlapping pair. Returns whether they were touching.
fn resolve_pair(a: &mut Body, b: &mut Body) -> bool {
    let Some(overlap) = box_overlap(a, b) else {
        return false;
    };

    a.colliding = true;
    b.colliding = true;

    if overlap.x < overlap.y {
        let half = overlap.x / 2.0;
        if a.position.x < b.position.x {
            a.position.x -= half;
            b.position.x += half;
        } else {
            a.position.x += half;
            b.position.x -= half;
        }
        a.velocity.x *= -BUMP_RESTITUTION;
        b.velocity.x *= -BUMP_RESTITUTION;
    } else {
        let half = overlap.y / 2.0;
        if a.position.y < b.position.y {
            a.position.y -= half;
            b.position.y += half;
        } else {
            a.position.y += half;
            b.position.y -= half;
        }
        a.velocity.y *= -BUMP_RESTITUTION;
        b.velocity.y *= -BUMP_RESTITUTION;
    }

    true
}

/// Push apart every overlapping pair of bodies.
///
/// Clears each body's `colliding` flag first, then sets it on both members
/// of every pair found touching. Returns the number of touching pairs.
pub fn check_entity_collisions(bodies: &mut [&mut Body]) -> usize {
    for body in bodies.iter_mut() {
        body.colliding = false;
    }

    let mut contacts = 0;
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut *head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::integrate;

    fn racer(x: f32, y: f32) -> Body {
        Body::new(1, Vec2::new(x, y), "red").with_kinematics(0.0, 1000.0, 0.0)
    }

    fn wall_track(walls: Vec<Segment>) -> Track {
        Track {
            width: 200.0,
            height: 200.0,
            walls,
            checkpoints: Vec::new(),
            start_line: Segment::new(Vec2::ZERO, Vec2::ZERO),
        }
    }

    fn vertical_wall() -> Track {
        wall_track(vec![Segment::new(
            Vec2::new(25.0, -50.0),
            Vec2::new(25.0, 50.0),
        )])
    }

    #[test]
    fn test_head_on_wall_bounce() {
        let track = vertical_wall();
        let mut body = racer(5.0, 0.0);
        body.velocity = Vec2::new(10.0, 0.0);

        integrate(&mut body, 0.1);
        let before = body.velocity;
        let hits = check_track_collisions(&mut body, &track);

        assert_eq!(hits.len(), 1);
        assert!(body.velocity.x < 0.0);
        assert!((body.velocity.x.abs() - 0.7 * before.x).abs() < 1e-4);
        assert!(body.position.x < 25.0);
        assert!((body.position.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_keeps_seventy_percent_speed() {
        let track = vertical_wall();
        let mut body = racer(10.0, 0.0);
        body.velocity = Vec2::new(30.0, 40.0);
        let speed_before = body.velocity.length();
        let x_before = body.position.x;

        check_track_collisions(&mut body, &track);

        assert!((body.velocity.length() - 0.7 * speed_before).abs() < 1e-3);
        // Tangential component survives, normal component flips
        assert!((body.velocity - Vec2::new(-21.0, 28.0)).length() < 1e-3);
        assert!(body.position.x < x_before);
    }

    #[test]
    fn test_wall_winding_does_not_change_push_side() {
        // Same wall, opposite winding
        let track = wall_track(vec![Segment::new(
            Vec2::new(25.0, 50.0),
            Vec2::new(25.0, -50.0),
        )]);
        let mut body = racer(10.0, 0.0);
        body.velocity = Vec2::new(10.0, 0.0);
        check_track_collisions(&mut body, &track);
        assert!(body.position.x < 10.0);
        assert!(body.velocity.x < 0.0);
    }

    #[test]
    fn test_two_walls_resolve_cumulatively() {
        // Corner: vertical wall at x=25, horizontal wall at y=15
        let track = wall_track(vec![
            Segment::new(Vec2::new(25.0, -50.0), Vec2::new(25.0, 50.0)),
            Segment::new(Vec2::new(-50.0, 15.0), Vec2::new(50.0, 15.0)),
        ]);
        let mut body = racer(10.0, 0.0);
        body.velocity = Vec2::new(10.0, 10.0);

        let hits = check_track_collisions(&mut body, &track);

        assert_eq!(hits.len(), 2);
        assert!((body.velocity - Vec2::new(-4.9, -4.9)).length() < 1e-3);
    }

    #[test]
    fn test_no_contact_no_change() {
        let track = vertical_wall();
        let mut body = racer(-100.0, 0.0);
        body.velocity = Vec2::new(10.0, 0.0);
        assert!(check_track_collisions(&mut body, &track).is_empty());
        assert_eq!(body.velocity, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_degenerate_wall_is_ignored() {
        let track = wall_track(vec![Segment::new(
            Vec2::new(15.0, 10.0),
            Vec2::new(15.0, 10.0),
        )]);
        let mut body = racer(5.0, 0.0);
        body.velocity = Vec2::new(10.0, 0.0);
        assert!(check_track_collisions(&mut body, &track).is_empty());
    }

    #[test]
    fn test_entity_bump_separates_on_least_overlap_axis() {
        let mut a = racer(0.0, 0.0);
        let mut b = racer(15.0, 2.0);
        a.velocity = Vec2::new(10.0, 4.0);
        b.velocity = Vec2::new(-10.0, 0.0);

        let contacts = check_entity_collisions(&mut [&mut a, &mut b]);

        assert_eq!(contacts, 1);
        assert!(a.colliding && b.colliding);
        // x overlap 5 < y overlap 18: split 2.5 each way
        assert!((a.position.x + 2.5).abs() < 1e-4);
        assert!((b.position.x - 17.5).abs() < 1e-4);
        assert_eq!(a.velocity, Vec2::new(-5.0, 4.0));
        assert_eq!(b.velocity, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_entity_bump_mirrored_on_x() {
        // Same overlap as above with the pair swapped
        let mut a = racer(15.0, 2.0);
        let mut b = racer(0.0, 0.0);
        a.velocity = Vec2::new(-10.0, 0.0);
        b.velocity = Vec2::new(10.0, 4.0);

        assert_eq!(check_entity_collisions(&mut [&mut a, &mut b]), 1);
        assert!((a.position.x - 17.5).abs() < 1e-4);
        assert!((b.position.x + 2.5).abs() < 1e-4);
        assert_eq!(a.velocity, Vec2::new(5.0, 0.0));
        assert_eq!(b.velocity, Vec2::new(-5.0, 4.0));
    }

    #[test]
    fn test_entity_bump_separates_vertically() {
        // x overlap 18 > y overlap 5
        let mut a = racer(0.0, 0.0);
        let mut b = racer(2.0, 15.0);
        a.velocity = Vec2::new(3.0, 10.0);
        b.velocity = Vec2::new(0.0, -6.0);

        assert_eq!(check_entity_collisions(&mut [&mut a, &mut b]), 1);
        assert!((a.position.y + 2.5).abs() < 1e-4);
        assert!((b.position.y - 17.5).abs() < 1e-4);
        assert_eq!(a.position.x, 0.0);
        assert_eq!(a.velocity, Vec2::new(3.0, -5.0));
        assert_eq!(b.velocity, Vec2::new(0.0, 3.0));

        // Mirrored: upper body listed second
        let mut a = racer(2.0, 15.0);
        let mut b = racer(0.0, 0.0);
        check_entity_collisions(&mut [&mut a, &mut b]);
        assert!((a.position.y - 17.5).abs() < 1e-4);
        assert!((b.position.y + 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_colliding_flag_resets_each_pass() {
        let mut a = racer(0.0, 0.0);
        let mut b = racer(100.0, 100.0);
        a.colliding = true;
        b.colliding = true;
        assert_eq!(check_entity_collisions(&mut [&mut a, &mut b]), 0);
        assert!(!a.colliding && !b.colliding);
    }
}
