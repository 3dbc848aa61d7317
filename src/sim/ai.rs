//! AI opponents
//!
//! Every opponent follows waypoints except where its name says otherwise:
//! the roster is a fixed table mapping each name to a personality, a
//! starting offset, a waypoint ordering and kinematic overrides.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::entity::{Body, LapStats, SpeedEffects};
use crate::consts::*;
use crate::{heading_degrees, normalize_degrees, shortest_angle_delta};

/// Default opponent colors, cycled by grid slot
pub const DEFAULT_COLORS: [&str; 7] = ["red", "blue", "green", "yellow", "purple", "orange", "cyan"];

/// Behavior policy selected by an opponent's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Personality {
    /// Head straight for the current waypoint
    Default,
    /// Look ahead toward the next waypoint, corner tighter and faster
    Smart,
    /// Default steering on the waypoint list run backwards
    Reversed,
    /// Ignore waypoints and spin around a home point
    Spin,
    /// Lurch in random directions
    Erratic,
}

/// How a profile reorders the course waypoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathOrder {
    Forward,
    Reversed,
    Shuffled,
}

/// One roster entry
struct Profile {
    name: &'static str,
    personality: Personality,
    start_offset: Vec2,
    path: PathOrder,
    speed: Option<f32>,
    friction: Option<f32>,
    color: Option<&'static str>,
}

impl Profile {
    const fn plain(name: &'static str, personality: Personality) -> Self {
        Self {
            name,
            personality,
            start_offset: Vec2::ZERO,
            path: PathOrder::Forward,
            speed: None,
            friction: None,
            color: None,
        }
    }
}

/// Opponent roster, assigned cyclically by grid slot
const ROSTER: [Profile; 7] = [
    Profile::plain("Balaji", Personality::Smart),
    Profile::plain("Donovan", Personality::Smart),
    Profile::plain("Andy", Personality::Default),
    Profile {
        start_offset: Vec2::new(50.0, -30.0),
        path: PathOrder::Reversed,
        ..Profile::plain("Jake", Personality::Reversed)
    },
    Profile {
        start_offset: Vec2::new(20.0, 10.0),
        speed: Some(50.0),
        color: Some("#FF00FF"),
        ..Profile::plain("Dizzy", Personality::Spin)
    },
    Profile::plain("Backwards", Personality::Default),
    Profile {
        start_offset: Vec2::new(-30.0, 40.0),
        path: PathOrder::Shuffled,
        friction: Some(0.2),
        color: Some("#FFFF00"),
        ..Profile::plain("Confused", Personality::Erratic)
    },
];

/// Personality the roster assigns to a name (unknown names drive by default)
pub fn personality_for(name: &str) -> Personality {
    ROSTER
        .iter()
        .find(|p| p.name == name)
        .map_or(Personality::Default, |p| p.personality)
}

/// A computer-controlled racer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opponent {
    pub body: Body,
    pub name: String,
    pub personality: Personality,
    pub waypoints: Vec<Vec2>,
    pub current_waypoint: usize,
    /// Acceleration aggressiveness in [0.5, 1.0]
    pub difficulty: f32,
    pub laps: LapStats,
    pub effects: SpeedEffects,
    /// Center the spinning personality wanders around
    pub home: Vec2,
    /// Seconds of spinning, drives the orbit phase
    #[serde(default)]
    pub spin_time: f32,
}

impl Opponent {
    /// Create an opponent whose personality is looked up from its name
    pub fn new(id: u32, name: impl Into<String>, position: Vec2, waypoints: Vec<Vec2>) -> Self {
        let name = name.into();
        let body = Body::new(id, position, "red").with_kinematics(150.0, 200.0, 0.1);
        let home = body.center();
        Self {
            body,
            personality: personality_for(&name),
            name,
            waypoints,
            current_waypoint: 0,
            difficulty: 0.75,
            laps: LapStats::default(),
            effects: SpeedEffects::default(),
            home,
            spin_time: 0.0,
        }
    }
}

/// Steering tuning for the waypoint-following personalities
struct Steering {
    accel_base: f32,
    accel_per_difficulty: f32,
    turn_rate: f32,
    arrival_radius: f32,
    lookahead: f32,
}

const DEFAULT_STEERING: Steering = Steering {
    accel_base: 0.8,
    accel_per_difficulty: 0.4,
    turn_rate: AI_TURN_RATE,
    arrival_radius: AI_ARRIVAL_RADIUS,
    lookahead: 0.0,
};

const SMART_STEERING: Steering = Steering {
    accel_base: 1.0,
    accel_per_difficulty: 0.5,
    turn_rate: SMART_TURN_RATE,
    arrival_radius: SMART_ARRIVAL_RADIUS,
    lookahead: SMART_LOOKAHEAD,
};

/// Advance one opponent's policy by `dt` seconds.
///
/// Sets acceleration and rotation only; integration happens afterwards.
/// Returns true when the opponent finished a pass over its waypoints.
pub fn update_opponent<R: Rng>(ai: &mut Opponent, dt: f32, rng: &mut R) -> bool {
    match ai.personality {
        Personality::Spin => {
            spin(ai, dt);
            false
        }
        Personality::Erratic => {
            lurch(ai, rng);
            false
        }
        Personality::Smart => follow_waypoints(ai, dt, &SMART_STEERING),
        Personality::Default | Personality::Reversed => follow_waypoints(ai, dt, &DEFAULT_STEERING),
    }
}

fn follow_waypoints(ai: &mut Opponent, dt: f32, steering: &Steering) -> bool {
    let count = ai.waypoints.len();
    if count == 0 {
        return false;
    }
    ai.current_waypoint %= count;

    let current = ai.waypoints[ai.current_waypoint];
    let next = ai.waypoints[(ai.current_waypoint + 1) % count];
    let target = current.lerp(next, steering.lookahead);

    let center = ai.body.center();
    let dir = (target - center).normalize_or_zero();

    let accel = ai.body.speed * (steering.accel_base + ai.difficulty * steering.accel_per_difficulty);
    ai.body.acceleration = dir * accel;

    if dir != Vec2::ZERO {
        let delta = shortest_angle_delta(ai.body.rotation, heading_degrees(dir));
        let step = (steering.turn_rate * dt).min(delta.abs());
        ai.body.rotation += step.copysign(delta);
    }
    ai.body.rotation = normalize_degrees(ai.body.rotation);

    if center.distance(current) < steering.arrival_radius {
        ai.current_waypoint = (ai.current_waypoint + 1) % count;
        return ai.current_waypoint == 0;
    }
    false
}

fn spin(ai: &mut Opponent, dt: f32) {
    ai.body.rotation = normalize_degrees(ai.body.rotation + SPIN_RATE * dt);
    ai.spin_time += dt;

    let (sin, cos) = ai.spin_time.sin_cos();
    let mut accel = Vec2::new(sin, cos) * ai.body.speed * 0.2;

    let drift = ai.body.center() - ai.home;
    if drift.length() > SPIN_LEASH {
        accel -= drift.normalize_or_zero() * ai.body.speed * 0.5;
    }
    ai.body.acceleration = accel;
}

fn lurch<R: Rng>(ai: &mut Opponent, rng: &mut R) {
    if !rng.random_bool(ERRATIC_CHANCE) {
        return;
    }
    let speed = ai.body.speed;
    ai.body.acceleration = Vec2::new(
        rng.random_range(-speed..=speed),
        rng.random_range(-speed..=speed),
    );
    ai.body.rotation = rng.random_range(0.0..360.0);
}

/// Build `count` opponents on a two-wide starting grid behind `start`.
///
/// Names cycle through the roster. Kinematics are randomized per opponent
/// and then overridden where the roster says so.
pub fn generate_opponents<R: Rng>(
    count: usize,
    start: Vec2,
    waypoints: &[Vec2],
    colors: &[&str],
    difficulty: RangeInclusive<f32>,
    first_id: u32,
    rng: &mut R,
) -> Vec<Opponent> {
    let colors = if colors.is_empty() {
        &DEFAULT_COLORS[..]
    } else {
        colors
    };

    (0..count)
        .map(|i| {
            let profile = &ROSTER[i % ROSTER.len()];
            let row = (i / 2) as f32;
            let col = (i % 2) as f32;
            let position = start + profile.start_offset + Vec2::new(col, row) * GRID_SPACING;

            let mut path = waypoints.to_vec();
            match profile.path {
                PathOrder::Forward => {}
                PathOrder::Reversed => path.reverse(),
                PathOrder::Shuffled => path.shuffle(rng),
            }

            let speed: f32 = rng.random_range(150.0..200.0);
            let max_speed: f32 = rng.random_range(200.0..300.0);
            let friction: f32 = rng.random_range(0.1..0.2);

            let mut ai = Opponent::new(first_id + i as u32, profile.name, position, path);
            ai.body = ai.body.with_kinematics(
                profile.speed.unwrap_or(speed),
                max_speed,
                profile.friction.unwrap_or(friction),
            );
            ai.body.color = profile.color.unwrap_or(colors[i % colors.len()]).to_string();
            ai.difficulty = rng.random_range(difficulty.clone());
            ai
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn waypoints() -> Vec<Vec2> {
        vec![
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ]
    }

    /// Opponent whose center sits at `center`
    fn opponent(name: &str, center: Vec2) -> Opponent {
        Opponent::new(1, name, center - Vec2::splat(RACER_SIZE / 2.0), waypoints())
    }

    #[test]
    fn test_default_accelerates_toward_waypoint() {
        let mut ai = opponent("Andy", Vec2::ZERO);
        ai.difficulty = 0.5;
        update_opponent(&mut ai, 1.0 / 60.0, &mut rng());

        // 150 * (0.8 + 0.5 * 0.4) = 150
        assert!((ai.body.acceleration - Vec2::new(150.0, 0.0)).length() < 1e-3);
        assert_eq!(ai.current_waypoint, 0);
    }

    #[test]
    fn test_arrival_advances_exactly_one() {
        let mut ai = opponent("Andy", Vec2::new(90.0, 0.0));
        update_opponent(&mut ai, 1.0 / 60.0, &mut rng());
        assert_eq!(ai.current_waypoint, 1);
    }

    #[test]
    fn test_waypoint_index_wraps_and_reports_pass() {
        let mut ai = opponent("Andy", Vec2::new(5.0, 100.0));
        ai.current_waypoint = 2;
        assert!(update_opponent(&mut ai, 1.0 / 60.0, &mut rng()));
        assert_eq!(ai.current_waypoint, 0);
    }

    #[test]
    fn test_rotation_turns_shortest_way_at_capped_rate() {
        // Waypoint straight down (+y = 90°), heading 350° -> turn clockwise
        let mut ai = opponent("Andy", Vec2::new(100.0, -200.0));
        ai.body.rotation = 350.0;
        update_opponent(&mut ai, 0.1, &mut rng());
        assert!((ai.body.rotation - 14.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_does_not_overshoot() {
        let mut ai = opponent("Andy", Vec2::new(0.0, 0.0));
        ai.body.rotation = 5.0;
        update_opponent(&mut ai, 1.0, &mut rng());
        assert!(ai.body.rotation.abs() < 1e-3 || (ai.body.rotation - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_smart_uses_lookahead_and_tighter_arrival() {
        let mut ai = opponent("Balaji", Vec2::ZERO);
        update_opponent(&mut ai, 1.0 / 60.0, &mut rng());
        // Target = 0.8 * (100, 0) + 0.2 * (100, 100) = (100, 20)
        let expected = Vec2::new(100.0, 20.0).normalize();
        assert!((ai.body.acceleration.normalize() - expected).length() < 1e-4);

        // 25 units away: inside the default radius, outside the smart one
        let mut smart = opponent("Balaji", Vec2::new(75.0, 0.0));
        update_opponent(&mut smart, 1.0 / 60.0, &mut rng());
        assert_eq!(smart.current_waypoint, 0);
        let mut plain = opponent("Andy", Vec2::new(75.0, 0.0));
        update_opponent(&mut plain, 1.0 / 60.0, &mut rng());
        assert_eq!(plain.current_waypoint, 1);
    }

    #[test]
    fn test_no_waypoints_is_noop() {
        let mut ai = opponent("Andy", Vec2::ZERO);
        ai.waypoints.clear();
        ai.body.acceleration = Vec2::new(3.0, 4.0);
        assert!(!update_opponent(&mut ai, 0.1, &mut rng()));
        assert_eq!(ai.body.acceleration, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_spin_ignores_waypoints_and_stays_leashed() {
        let mut ai = opponent("Dizzy", Vec2::ZERO);
        update_opponent(&mut ai, 0.1, &mut rng());
        assert!((ai.body.rotation - 36.0).abs() < 1e-3);
        assert_eq!(ai.current_waypoint, 0);

        // Far from home: pulled back
        ai.body.position += Vec2::new(200.0, 0.0);
        update_opponent(&mut ai, 0.1, &mut rng());
        assert!(ai.body.acceleration.x < 0.0);
    }

    #[test]
    fn test_erratic_keeps_acceleration_until_triggered() {
        let mut ai = opponent("Confused", Vec2::ZERO);
        let mut rng = rng();
        let mut changes = 0;
        let mut last = ai.body.acceleration;
        for _ in 0..2000 {
            update_opponent(&mut ai, 1.0 / 60.0, &mut rng);
            if ai.body.acceleration != last {
                changes += 1;
                assert!(ai.body.acceleration.x.abs() <= ai.body.speed);
                assert!((0.0..360.0).contains(&ai.body.rotation));
                last = ai.body.acceleration;
            }
        }
        // ~5% of 2000 ticks
        assert!((40..200).contains(&changes), "changes = {changes}");
        assert_eq!(ai.current_waypoint, 0);
    }

    #[test]
    fn test_generate_cycles_roster_and_grid() {
        let wps = waypoints();
        let start = Vec2::new(1000.0, 150.0);
        let opponents = generate_opponents(9, start, &wps, &[], 0.5..=1.0, 10, &mut rng());

        assert_eq!(opponents.len(), 9);
        let names: Vec<_> = opponents.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            ["Balaji", "Donovan", "Andy", "Jake", "Dizzy", "Backwards", "Confused", "Balaji", "Donovan"]
        );
        assert_eq!(opponents[0].body.id, 10);

        // Grid: two per row, 30 apart
        assert_eq!(opponents[1].body.position, start + Vec2::new(30.0, 0.0));
        assert_eq!(opponents[2].body.position, start + Vec2::new(0.0, 30.0));
        // Jake: offset and running the course backwards
        assert_eq!(opponents[3].body.position, start + Vec2::new(80.0, 0.0));
        assert_eq!(opponents[3].personality, Personality::Reversed);
        assert_eq!(opponents[3].waypoints, wps.iter().rev().copied().collect::<Vec<_>>());
        // Dizzy and Confused tuning
        assert_eq!(opponents[4].body.speed, 50.0);
        assert_eq!(opponents[4].body.color, "#FF00FF");
        assert_eq!(opponents[6].body.friction, 0.2);
        assert_eq!(opponents[6].body.color, "#FFFF00");
        assert_eq!(opponents[6].waypoints.len(), wps.len());

        for o in &opponents {
            assert!((0.5..=1.0).contains(&o.difficulty));
            assert!((200.0..300.0).contains(&o.body.max_speed));
            assert_eq!(o.body.max_speed, o.body.base_max_speed);
        }
        assert_eq!(opponents[0].body.color, "red");
        assert_eq!(opponents[7].body.color, "red");
    }

    #[test]
    fn test_personality_lookup() {
        assert_eq!(personality_for("Dizzy"), Personality::Spin);
        assert_eq!(personality_for("Confused"), Personality::Erratic);
        assert_eq!(personality_for("Nobody"), Personality::Default);
    }

    #[test]
    fn test_constructor_follows_name_table() {
        assert_eq!(opponent("Dizzy", Vec2::ZERO).personality, Personality::Spin);
        assert_eq!(opponent("Jake", Vec2::ZERO).personality, Personality::Reversed);
        assert_eq!(opponent("Balaji", Vec2::ZERO).personality, Personality::Smart);
        assert_eq!(opponent("Stranger", Vec2::ZERO).personality, Personality::Default);

        // A spinning name never chases waypoints
        let mut dizzy = opponent("Dizzy", Vec2::new(90.0, 0.0));
        update_opponent(&mut dizzy, 1.0 / 60.0, &mut rng());
        assert_eq!(dizzy.current_waypoint, 0);
    }
}
