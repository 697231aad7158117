//! Defender pursuit
//!
//! Each defender picks a receiver (their man, or whoever is nearest), aims a
//! fixed distance ahead of them along the direction of play, and closes at a
//! damped speed. Defenders do not avoid each other.

use glam::Vec3;

use super::state::{Assignment, Defender, Receiver};

/// Receiver a defender chases this tick
///
/// Man assignments win; otherwise the nearest receiver, first one on ties.
pub fn select_target(defender: &Defender, receivers: &[Receiver]) -> Option<usize> {
    if let Assignment::Man { receiver } = defender.assignment {
        if receiver < receivers.len() {
            return Some(receiver);
        }
    }

    let mut nearest = None;
    let mut nearest_dist = f32::INFINITY;
    for (i, r) in receivers.iter().enumerate() {
        let dist = r.agent.pos.distance(defender.agent.pos);
        if dist < nearest_dist {
            nearest_dist = dist;
            nearest = Some(i);
        }
    }
    nearest
}

/// Aim point `lead` units ahead of `target` along the direction of play
#[inline]
pub fn lead_point(target: Vec3, direction: f32, lead: f32) -> Vec3 {
    target + Vec3::new(0.0, 0.0, direction * lead)
}

/// One damped step from `pos` toward `goal`
#[inline]
pub fn step_toward(pos: Vec3, goal: Vec3, speed: f32, damping: f32, dt: f32) -> Vec3 {
    pos + (goal - pos).normalize_or_zero() * speed * dt * damping
}

/// Move every defender one tick
pub fn update_defenders(
    defenders: &mut [Defender],
    receivers: &[Receiver],
    direction: f32,
    lead: f32,
    damping: f32,
    dt: f32,
) {
    for d in defenders.iter_mut() {
        let Some(target) = select_target(d, receivers) else {
            continue;
        };
        let aim = lead_point(receivers[target].agent.pos, direction, lead);
        d.agent.pos = step_toward(d.agent.pos, aim, d.agent.speed, damping, dt);
    }
}
