//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and inputs the
//! game plays out the same way:
//! - Fixed update order within a frame
//! - Injected randomness only
//! - Stable iteration order (receivers and defenders by slot)
//! - No rendering or platform dependencies

pub mod clock;
pub mod flight;
pub mod pursuit;
pub mod random;
pub mod resolve;
pub mod route;
pub mod state;
pub mod tick;

pub use flight::{FlightEvent, LaunchSolution, attempt_pass, solve_launch};
pub use random::{RandomSource, ScriptedRandom, SimRng};
pub use route::{Route, RouteFollower};
pub use state::{
    Agent, Assignment, Ball, BallState, Defender, Flight, GameEvent, GameState, PlayOutcome,
    PlayPhase, Receiver, Score, TOUCHDOWN_POINTS, Team,
};
pub use tick::{MoveIntent, TickInput, call_play, select_receiver, select_team, tick};
