//! Error types
//!
//! Nothing in the simulation is fatal. Config errors surface at load time,
//! pass rejections become on-screen notices.

use thiserror::Error;

/// Failure loading tuning or a playbook from JSON
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Play {play:?} has {receivers} receivers but {routes} routes")]
    RouteCount {
        play: String,
        receivers: usize,
        routes: usize,
    },

    #[error("Playbook has no plays")]
    EmptyPlaybook,
}

/// Why a pass attempt was ignored
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassRejected {
    #[error("no play is live")]
    NotActive,

    #[error("ball is not in the quarterback's hands")]
    BallNotHeld,

    #[error("no receiver at slot {index}")]
    NoReceiver { index: usize },
}

impl PassRejected {
    /// Notice shown to the player, if this rejection is worth one
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            PassRejected::NotActive => Some("Start a play first"),
            PassRejected::BallNotHeld => None,
            PassRejected::NoReceiver { .. } => Some("No receiver"),
        }
    }
}
