//! Race simulation module
//!
//! All gameplay logic lives here:
//! - Driven by a caller-supplied `dt`, one tick per frame
//! - Seeded RNG only
//! - Stable iteration order (player first, then opponents by grid slot)
//! - No rendering or platform dependencies

pub mod ai;
pub mod checkpoint;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod physics;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod track;

pub use ai::{Opponent, Personality, generate_opponents, update_opponent};
pub use checkpoint::{CheckpointEvent, CheckpointTracker};
pub use collision::{WallHit, check_entity_collisions, check_track_collisions};
pub use entity::{Body, Controls, LapStats, Player, SpeedEffects, SpeedRegime};
pub use geometry::{Segment, reflect, segment_intersection};
pub use physics::{apply_joystick_control, apply_player_controls, integrate};
pub use powerup::{Collector, PowerUp, PowerUpEvent, PowerUpKind, generate_power_ups, update_power_ups};
pub use state::{Countdown, FrameClock, HudSnapshot, RaceEvent, RacePhase, RaceState, Standing};
pub use tick::{Joystick, TickInput, tick};
pub use track::{Course, FinishZone, Track};
