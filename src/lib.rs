//! Tube Racer - A top-down arcade racing simulation
//!
//! Core modules:
//! - `sim`: Simulation core (physics, collisions, checkpoints, AI, power-ups)
//! - `highscores`: In-memory finish-time leaderboard
//! - `settings`: Race configuration
//!
//! Rendering, input capture and page bootstrap live outside this crate. The
//! host feeds normalized control intents into [`sim::tick`] once per frame and
//! draws whatever [`sim::RaceState`] holds afterwards.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::Leaderboard;
pub use settings::{DifficultyPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Player turn rate for left/right input (degrees per second)
    pub const PLAYER_TURN_RATE: f32 = 150.0;
    /// Braking thrust relative to forward thrust
    pub const BRAKE_FACTOR: f32 = 0.5;

    /// Velocity kept after bouncing off a wall (30% energy loss)
    pub const WALL_RESTITUTION: f32 = 0.7;
    /// Distance an entity is pushed off a wall after a hit
    pub const WALL_PUSH_DISTANCE: f32 = 2.0;
    /// Velocity kept (and inverted) on the contact axis after a bump
    pub const BUMP_RESTITUTION: f32 = 0.5;

    /// Default AI turn rate (degrees per second)
    pub const AI_TURN_RATE: f32 = 240.0;
    /// Default AI waypoint arrival radius
    pub const AI_ARRIVAL_RADIUS: f32 = 30.0;
    /// Smart AI turn rate (degrees per second)
    pub const SMART_TURN_RATE: f32 = 360.0;
    /// Smart AI waypoint arrival radius
    pub const SMART_ARRIVAL_RADIUS: f32 = 20.0;
    /// Weight of the next waypoint in the smart AI steering target
    pub const SMART_LOOKAHEAD: f32 = 0.2;
    /// Spinning AI rotation rate (degrees per second)
    pub const SPIN_RATE: f32 = 360.0;
    /// Spinning AI wander radius around its home point
    pub const SPIN_LEASH: f32 = 40.0;
    /// Per-tick chance the erratic AI picks a new direction
    pub const ERRATIC_CHANCE: f64 = 0.05;

    /// Power-up pickup radius
    pub const POWERUP_RADIUS: f32 = 15.0;
    /// Time a collected power-up stays hidden (ms)
    pub const POWERUP_RESPAWN_MS: f32 = 10_000.0;
    /// Speed boost duration (ms)
    pub const BOOST_DURATION_MS: f32 = 3_000.0;
    /// Slowdown duration (ms)
    pub const SLOWDOWN_DURATION_MS: f32 = 5_000.0;
    /// Max speed multiplier while boosted
    pub const BOOST_SPEED_FACTOR: f32 = 1.5;
    /// Max speed multiplier while slowed
    pub const SLOWDOWN_SPEED_FACTOR: f32 = 0.5;

    /// Racer bounding box size
    pub const RACER_SIZE: f32 = 20.0;
    /// Spacing of the opponent starting grid
    pub const GRID_SPACING: f32 = 30.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed difference `to - from` in degrees, wrapped to (-180, 180]
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Unit heading vector for an angle in degrees (0 = +x, 90 = +y)
#[inline]
pub fn angle_to_vector(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, sin)
}

/// Heading angle in degrees for a direction vector
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}

/// Format milliseconds as `MM:SS.cc`
pub fn format_time(ms: f32) -> String {
    let ms = ms.max(0.0) as u64;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centis = (ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}
