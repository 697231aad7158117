//! Ball flight
//!
//! A pass is aimed at where the receiver is at release (no leading, no
//! homing). Flight time comes from ground distance and pass speed, floored at
//! a minimum; vertical speed is solved from the peak height at half the
//! flight time. After release the ball is integrated under constant gravity.

use glam::Vec3;

use super::state::{BallState, Flight, GameState, PlayPhase};
use crate::error::PassRejected;
use crate::flatten;
use crate::tuning::PassParams;

/// Launch velocity and planned flight time for a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSolution {
    pub velocity: Vec3,
    pub travel_time: f32,
}

/// Solve a pass from `launch` to `target`
pub fn solve_launch(launch: Vec3, target: Vec3, params: &PassParams) -> LaunchSolution {
    let ground = flatten(target - launch);
    let distance = ground.length();
    let travel_time = (distance / params.pass_speed).max(params.min_travel_time);

    let horizontal = ground / travel_time;
    let vy = 2.0 * (params.peak_height - launch.y) / travel_time;

    LaunchSolution {
        velocity: Vec3::new(horizontal.x, vy, horizontal.z),
        travel_time,
    }
}

/// Throw to the selected receiver
///
/// Rejections leave the state untouched.
pub fn attempt_pass(state: &mut GameState) -> Result<LaunchSolution, PassRejected> {
    if state.phase != PlayPhase::Active {
        return Err(PassRejected::NotActive);
    }
    if state.ball.state != BallState::HeldByQb {
        return Err(PassRejected::BallNotHeld);
    }
    let index = state.selected_receiver;
    let Some(target) = state.receivers.get(index) else {
        return Err(PassRejected::NoReceiver { index });
    };

    let launch = state.ball.pos;
    let solution = solve_launch(launch, target.agent.pos, &state.tuning.pass_params());
    log::debug!(
        "Pass to R{}: {:.2}s, velocity {:?}",
        index + 1,
        solution.travel_time,
        solution.velocity
    );

    state.ball.state = BallState::InFlight(Flight {
        launched_at: state.time,
        velocity: solution.velocity,
        target: index,
        travel_time: solution.travel_time,
    });
    state.message(format!("PASS to R{}", index + 1), 900);
    Ok(solution)
}

/// What the ball ran into this tick, before any player touched it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEvent {
    /// Hit the turf
    Grounded,
    /// Came down in the end zone the offense attacks
    EndZone,
    /// Sailed past a sideline or end line
    OutOfBounds,
}

/// Integrate the ball one tick: position first, then gravity on velocity
pub fn integrate(pos: &mut Vec3, velocity: &mut Vec3, gravity: f32, dt: f32) {
    *pos += *velocity * dt;
    velocity.y += gravity * dt;
}

/// Advance a ball in flight and report anything it hit
pub fn step_flight(state: &mut GameState, dt: f32) -> Option<FlightEvent> {
    let gravity = state.tuning.gravity;
    let BallState::InFlight(flight) = &mut state.ball.state else {
        return None;
    };
    integrate(&mut state.ball.pos, &mut flight.velocity, gravity, dt);

    let pos = state.ball.pos;
    if pos.y < state.tuning.ground_threshold {
        Some(FlightEvent::Grounded)
    } else if state.in_end_zone(pos, state.offense) && pos.y < state.tuning.end_zone_ceiling {
        Some(FlightEvent::EndZone)
    } else if state.out_of_bounds(pos) {
        Some(FlightEvent::OutOfBounds)
    } else {
        None
    }
}
