//! Gridiron Rush - An arcade passing-play football game
//!
//! Core modules:
//! - `sim`: Simulation (routes, pursuit, ball flight, play resolution)
//! - `playbook`: Formations, routes and defensive calls
//! - `tuning`: Data-driven game balance
//! - `presenter`: Boundary to whatever draws the field

pub mod error;
pub mod playbook;
pub mod presenter;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, PassRejected};
pub use playbook::{Playbook, PlayCall};
pub use presenter::Presenter;
pub use tuning::Tuning;

use glam::Vec3;

/// Fixed gameplay constants that are not worth tuning
pub mod consts {
    /// Height every player is held at above the turf (world units)
    pub const GROUND_OFFSET: f32 = 1.2;
    /// Ball hold point above the quarterback
    pub const BALL_HOLD_HEIGHT: f32 = 1.8;
    /// Ball hold point behind the quarterback, against the direction of play
    pub const BALL_HOLD_BACK: f32 = 3.0;
    /// Ball carried above a player's head after a catch or pick
    pub const BALL_CARRY_HEIGHT: f32 = 3.0;
    /// Quarterback line-up depth behind midfield (yards)
    pub const QB_DEPTH_YARDS: f32 = 40.0;
    /// Quarterback must stay this far off the sideline (world units)
    pub const QB_SIDELINE_MARGIN: f32 = 3.0;
    /// Quarterback must stay this far off each end line (yards)
    pub const QB_END_MARGIN_YARDS: f32 = 8.0;
    /// End zone depth (yards)
    pub const END_ZONE_YARDS: f32 = 10.0;
    /// Longest interception return (yards)
    pub const MAX_RETURN_YARDS: f32 = 30.0;
}

/// Project a vector onto the ground plane
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
