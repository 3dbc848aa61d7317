//! Power-up pickups
//!
//! A fixed set of pickups is laid out at race start. Collecting one hides it
//! for a while and starts a timed speed effect on the collector; it then
//! reappears in the same spot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ai::Opponent;
use super::entity::{Body, Player, SpeedEffects};
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Boost,
    Slowdown,
}

impl PowerUpKind {
    /// Start this power-up's effect, replacing whichever effect was active
    pub fn apply(self, effects: &mut SpeedEffects) {
        match self {
            PowerUpKind::Boost => effects.apply_boost(),
            PowerUpKind::Slowdown => effects.apply_slowdown(),
        }
    }
}

/// A pickup on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub position: Vec2,
    pub kind: PowerUpKind,
    pub radius: f32,
    pub collected: bool,
    /// Time until it reappears (ms), only meaningful while collected
    pub respawn_time: f32,
}

impl PowerUp {
    pub fn new(id: u32, position: Vec2, kind: PowerUpKind) -> Self {
        Self {
            id,
            position,
            kind,
            radius: POWERUP_RADIUS,
            collected: false,
            respawn_time: 0.0,
        }
    }

    /// Whether a racer's body reaches this pickup
    pub fn touches(&self, body: &Body) -> bool {
        self.position.distance(body.center()) < self.radius + body.width / 2.0
    }

    fn collect(&mut self) {
        self.collected = true;
        self.respawn_time = POWERUP_RESPAWN_MS;
    }

    /// Count down a collected pickup. Returns true when it becomes available.
    pub fn update_respawn(&mut self, dt: f32) -> bool {
        if !self.collected {
            return false;
        }
        self.respawn_time -= dt * 1000.0;
        if self.respawn_time <= 0.0 {
            self.collected = false;
            self.respawn_time = 0.0;
            return true;
        }
        false
    }
}

/// Who picked a power-up up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collector {
    Player,
    /// Index into the opponent list
    Opponent(usize),
}

/// Something that happened to a power-up this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpEvent {
    Collected {
        id: u32,
        kind: PowerUpKind,
        by: Collector,
    },
    Respawned {
        id: u32,
    },
}

/// Run pickup detection and respawn timers for one tick.
///
/// The player is tested first, then opponents in list order; the first
/// racer found touching an available pickup gets it.
pub fn update_power_ups(
    power_ups: &mut [PowerUp],
    player: &mut Player,
    opponents: &mut [Opponent],
    dt: f32,
) -> Vec<PowerUpEvent> {
    let mut events = Vec::new();

    for power_up in power_ups.iter_mut() {
        if power_up.collected {
            if power_up.update_respawn(dt) {
                log::debug!("Power-up {} respawned", power_up.id);
                events.push(PowerUpEvent::Respawned { id: power_up.id });
            }
            continue;
        }

        let collector = if power_up.touches(&player.body) {
            Some(Collector::Player)
        } else {
            opponents
                .iter()
                .position(|o| power_up.touches(&o.body))
                .map(Collector::Opponent)
        };

        let Some(by) = collector else {
            continue;
        };

        power_up.collect();
        let effects = match by {
            Collector::Player => &mut player.effects,
            Collector::Opponent(i) => &mut opponents[i].effects,
        };
        power_up.kind.apply(effects);

        log::debug!("Power-up {} ({:?}) collected by {:?}", power_up.id, power_up.kind, by);
        events.push(PowerUpEvent::Collected {
            id: power_up.id,
            kind: power_up.kind,
            by,
        });
    }

    events
}

/// Lay out one pickup between each pair of consecutive checkpoints,
/// alternating boost and slowdown, with a little random scatter.
pub fn generate_power_ups<R: Rng>(checkpoints: &[Vec2], first_id: u32, rng: &mut R) -> Vec<PowerUp> {
    const SCATTER: f32 = 40.0;

    checkpoints
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let jitter = Vec2::new(
                rng.random_range(-SCATTER..=SCATTER),
                rng.random_range(-SCATTER..=SCATTER),
            );
            let kind = if i % 2 == 0 {
                PowerUpKind::Boost
            } else {
                PowerUpKind::Slowdown
            };
            PowerUp::new(first_id + i as u32, (pair[0] + pair[1]) / 2.0 + jitter, kind)
        })
        .collect()
}
