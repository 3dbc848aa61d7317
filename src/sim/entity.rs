//! Racer data shared by the player and AI opponents

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Kinematic body every racer carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Heading in degrees, normalized to [0, 360)
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    /// Base acceleration magnitude
    pub speed: f32,
    /// Current velocity cap (changed by power-up effects)
    pub max_speed: f32,
    /// Nominal velocity cap restored when no effect is active
    pub base_max_speed: f32,
    /// Per-second velocity decay coefficient in [0, 1)
    pub friction: f32,
    /// Set by the entity/entity pass for the current tick
    #[serde(default)]
    pub colliding: bool,
}

impl Body {
    pub fn new(id: u32, position: Vec2, color: impl Into<String>) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            rotation: 0.0,
            width: RACER_SIZE,
            height: RACER_SIZE,
            color: color.into(),
            speed: 0.0,
            max_speed: 0.0,
            base_max_speed: 0.0,
            friction: 0.0,
            colliding: false,
        }
    }

    /// Set base acceleration, nominal max speed and friction
    pub fn with_kinematics(mut self, speed: f32, max_speed: f32, friction: f32) -> Self {
        self.speed = speed;
        self.max_speed = max_speed;
        self.base_max_speed = max_speed;
        self.friction = friction;
        self
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.size() / 2.0
    }
}

/// Directional intents from keyboard input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Lap bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LapStats {
    pub laps: u32,
    /// Completed lap durations (ms), oldest first
    pub lap_times: Vec<f32>,
    pub best_lap_time: Option<f32>,
    /// Time spent on the lap in progress (ms)
    pub current_lap_time: f32,
}

impl LapStats {
    /// Record the lap in progress and start a new one. Returns its duration.
    pub fn commit_lap(&mut self) -> f32 {
        let lap_time = self.current_lap_time;
        self.laps += 1;
        self.lap_times.push(lap_time);
        if self.best_lap_time.is_none_or(|best| lap_time < best) {
            self.best_lap_time = Some(lap_time);
        }
        self.current_lap_time = 0.0;
        lap_time
    }
}

/// Which speed regime a racer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedRegime {
    Boosted,
    Slowed,
    Nominal,
}

/// Remaining power-up effect time. At most one timer is non-zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeedEffects {
    /// Boost time remaining (ms)
    pub speed_boost_time: f32,
    /// Slowdown time remaining (ms)
    pub slow_down_time: f32,
}

impl SpeedEffects {
    /// Start a boost, cancelling any slowdown
    pub fn apply_boost(&mut self) {
        self.speed_boost_time = BOOST_DURATION_MS;
        self.slow_down_time = 0.0;
    }

    /// Start a slowdown, cancelling any boost
    pub fn apply_slowdown(&mut self) {
        self.slow_down_time = SLOWDOWN_DURATION_MS;
        self.speed_boost_time = 0.0;
    }

    pub fn regime(&self) -> SpeedRegime {
        if self.speed_boost_time > 0.0 {
            SpeedRegime::Boosted
        } else if self.slow_down_time > 0.0 {
            SpeedRegime::Slowed
        } else {
            SpeedRegime::Nominal
        }
    }

    /// Count down the active timer and set the body's max speed for its regime
    pub fn update(&mut self, body: &mut Body, dt: f32) -> SpeedRegime {
        let elapsed_ms = dt * 1000.0;
        let regime = self.regime();
        match regime {
            SpeedRegime::Boosted => {
                self.speed_boost_time = (self.speed_boost_time - elapsed_ms).max(0.0);
                body.max_speed = body.base_max_speed * BOOST_SPEED_FACTOR;
            }
            SpeedRegime::Slowed => {
                self.slow_down_time = (self.slow_down_time - elapsed_ms).max(0.0);
                body.max_speed = body.base_max_speed * SLOWDOWN_SPEED_FACTOR;
            }
            SpeedRegime::Nominal => {
                body.max_speed = body.base_max_speed;
            }
        }
        regime
    }
}

/// The human-controlled racer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub name: String,
    pub control: Controls,
    pub laps: LapStats,
    pub effects: SpeedEffects,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            body: Body::new(id, position, "#00ff00").with_kinematics(200.0, 300.0, 0.1),
            name: name.into(),
            control: Controls::default(),
            laps: LapStats::default(),
            effects: SpeedEffects::default(),
        }
    }
}
