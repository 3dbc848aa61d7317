//! Per-frame race tick
//!
//! Advances the race context by one frame: intents, physics, collisions,
//! pickups, then checkpoint and finish bookkeeping.

use glam::Vec2;

use super::ai::update_opponent;
use super::checkpoint::CheckpointEvent;
use super::collision::{check_entity_collisions, check_track_collisions};
use super::entity::{Body, Controls};
use super::physics::{apply_joystick_control, apply_player_controls, integrate};
use super::powerup::update_power_ups;
use super::state::{RaceEvent, RacePhase, RaceState};
use crate::heading_degrees;

/// Joystick reading: heading in degrees and force in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joystick {
    pub angle: Option<f32>,
    pub force: Option<f32>,
}

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard directions
    pub controls: Controls,
    /// Joystick drag, takes priority over the keyboard while present
    pub joystick: Option<Joystick>,
    /// Idle/demo mode - autopilot drives the player
    pub idle_mode: bool,
}

/// Distance from a target at which the autopilot starts easing off
const AUTOPILOT_EASE_DISTANCE: f32 = 200.0;

/// Joystick vector that seeks `target`: steer toward the velocity that
/// would carry the body straight at it, so sideways drift bleeds off.
fn autopilot(body: &Body, target: Vec2) -> Joystick {
    let to_target = target - body.center();
    let distance = to_target.length();
    if distance < f32::EPSILON {
        return Joystick::default();
    }

    let desired_speed = body.max_speed * (distance / AUTOPILOT_EASE_DISTANCE).min(1.0);
    let desired = to_target / distance * desired_speed;
    let steer = desired - body.velocity;
    if steer.length_squared() < f32::EPSILON {
        return Joystick::default();
    }

    Joystick {
        angle: Some(heading_degrees(steer)),
        force: Some((steer.length() / body.speed.max(1.0)).min(1.0)),
    }
}

/// Advance the race by one frame of `dt` seconds
pub fn tick(state: &mut RaceState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.settings.frame_dt_limit())
    } else {
        0.0
    };

    match state.phase {
        RacePhase::Ready => {
            state.advance_countdown(dt);
            return;
        }
        RacePhase::Racing => {}
        RacePhase::Title | RacePhase::NameEntry | RacePhase::Finished | RacePhase::GameOver => return,
    }

    let elapsed_ms = dt * 1000.0;
    state.elapsed += elapsed_ms;
    state.player.laps.current_lap_time += elapsed_ms;
    for opponent in &mut state.opponents {
        opponent.laps.current_lap_time += elapsed_ms;
    }

    // Player intent
    state.player.control = input.controls;
    let joystick = if input.idle_mode {
        state.player_target().map(|target| autopilot(&state.player.body, target))
    } else {
        input.joystick
    };
    match joystick {
        Some(stick) => apply_joystick_control(&mut state.player, stick.angle, stick.force),
        None => apply_player_controls(&mut state.player, dt),
    }

    // Opponent intents
    for (index, opponent) in state.opponents.iter_mut().enumerate() {
        if update_opponent(opponent, dt, &mut state.rng) {
            let lap_time = opponent.laps.commit_lap();
            log::debug!(
                "{} completed lap {} in {}",
                opponent.name,
                opponent.laps.laps,
                crate::format_time(lap_time)
            );
            state.events.push(RaceEvent::OpponentLap {
                opponent: index,
                laps: opponent.laps.laps,
            });
        }
    }

    // Speed effects, then motion
    state.player.effects.update(&mut state.player.body, dt);
    integrate(&mut state.player.body, dt);
    for opponent in &mut state.opponents {
        opponent.effects.update(&mut opponent.body, dt);
        integrate(&mut opponent.body, dt);
    }

    // Walls
    let track = &state.course.track;
    check_track_collisions(&mut state.player.body, track);
    for opponent in &mut state.opponents {
        check_track_collisions(&mut opponent.body, track);
    }

    if state.settings.entity_bumping {
        let mut bodies: Vec<&mut Body> = std::iter::once(&mut state.player.body)
            .chain(state.opponents.iter_mut().map(|o| &mut o.body))
            .collect();
        check_entity_collisions(&mut bodies);
    }

    // Pickups
    let pickups = update_power_ups(&mut state.power_ups, &mut state.player, &mut state.opponents, dt);
    state.events.extend(pickups.into_iter().map(RaceEvent::PowerUp));

    // Checkpoints
    let center = state.player.body.center();
    let radius = state.settings.checkpoint_radius;
    match state.checkpoints.update(center, &state.course.track.checkpoints, radius) {
        CheckpointEvent::None => {}
        CheckpointEvent::Passed(index) => {
            state.events.push(RaceEvent::CheckpointPassed { index });
        }
        CheckpointEvent::LapCompleted => {
            let time = state.player.laps.commit_lap();
            let lap = state.player.laps.laps;
            log::info!("Lap {} completed in {}", lap, crate::format_time(time));
            state.events.push(RaceEvent::LapCompleted { lap, time });
        }
        CheckpointEvent::LapRejected => {
            state.events.push(RaceEvent::LapRejected);
        }
    }

    // Finish zone only counts after a full circuit
    if state.checkpoints.circuit_complete() && state.course.finish.contains(center) {
        state.finish_race();
        return;
    }

    if state
        .settings
        .time_limit_ms()
        .is_some_and(|limit| state.elapsed >= limit)
    {
        state.game_over();
    }
}
