//! Entity integration and player control mapping

use super::entity::{Body, Player};
use crate::consts::*;
use crate::{angle_to_vector, normalize_degrees};

/// Advance a body by `dt` seconds.
///
/// Order matters: acceleration, linear friction, speed cap, then position.
/// The friction term is `1 - friction * dt`, so it inverts velocity if
/// `friction * dt > 1`; callers keep `dt` bounded (see `FrameClock`).
pub fn integrate(body: &mut Body, dt: f32) {
    body.velocity += body.acceleration * dt;

    body.velocity *= 1.0 - body.friction * dt;

    let speed = body.velocity.length();
    if speed > body.max_speed && speed > 0.0 {
        body.velocity *= body.max_speed / speed;
    }

    body.position += body.velocity * dt;
}

/// Map the player's keyboard intents to acceleration and rotation
pub fn apply_player_controls(player: &mut Player, dt: f32) {
    let body = &mut player.body;
    let control = player.control;

    body.acceleration = glam::Vec2::ZERO;

    if control.forward {
        body.acceleration = angle_to_vector(body.rotation) * body.speed;
    }
    if control.back {
        body.acceleration = -angle_to_vector(body.rotation) * body.speed * BRAKE_FACTOR;
    }

    if control.left {
        body.rotation -= PLAYER_TURN_RATE * dt;
    }
    if control.right {
        body.rotation += PLAYER_TURN_RATE * dt;
    }

    body.rotation = normalize_degrees(body.rotation);
}

/// Point the player along a joystick angle (degrees) and thrust with a
/// force in [0, 1]. Missing angle or force leaves the player untouched.
pub fn apply_joystick_control(player: &mut Player, angle: Option<f32>, force: Option<f32>) {
    let (Some(angle), Some(force)) = (angle, force) else {
        return;
    };

    let body = &mut player.body;
    body.rotation = normalize_degrees(angle);
    let force = force.clamp(0.0, 1.0);
    body.acceleration = angle_to_vector(body.rotation) * body.speed * force;
}
