//! Frame step
//!
//! One call advances the whole game: commands first, then players, then the
//! ball, then anything scheduled. The order is fixed so a seed plus the same
//! inputs replays the same game.

use glam::Vec3;

use super::clock;
use super::flight;
use super::pursuit::update_defenders;
use super::random::RandomSource;
use super::resolve;
use super::route::update_receivers;
use super::state::{GameEvent, GameState, PlayPhase, Team};
use crate::consts::{QB_END_MARGIN_YARDS, QB_SIDELINE_MARGIN};

/// Held movement keys, relative to the offense's direction of play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// Toward the goal the offense attacks
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// (lateral, downfield) in -1..=1, before the team's direction is applied
    fn axes(&self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        (axis(self.left, self.right), axis(self.back, self.forward))
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Snap the ball
    pub start_play: bool,
    /// Zero the score and reset the field
    pub reset_all: bool,
    /// Receiver slot for the next pass (0-based)
    pub select_receiver: Option<usize>,
    /// Throw to the selected receiver
    pub attempt_pass: bool,
    pub select_team: Option<Team>,
    /// Play name from the playbook
    pub call_play: Option<String>,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut impl RandomSource) {
    let dt = dt.clamp(0.0, state.tuning.max_frame_dt);
    state.time += dt as f64;

    apply_commands(state, input);
    move_qb(state, input.movement, dt);

    if state.phase == PlayPhase::Active {
        let smoothing = state.tuning.route_smoothing;
        update_receivers(&mut state.receivers, smoothing, dt);

        let direction = state.offense.direction();
        let lead = state.tuning.yards(state.tuning.lead_distance);
        let damping = state.tuning.pursuit_damping;
        update_defenders(
            &mut state.defenders,
            &state.receivers,
            direction,
            lead,
            damping,
            dt,
        );
    }

    step_ball(state, dt, rng);
    clock::run_scheduled(state);
}

fn apply_commands(state: &mut GameState, input: &TickInput) {
    if input.reset_all {
        clock::reset_all(state);
    }
    if let Some(team) = input.select_team {
        select_team(state, team);
    }
    if let Some(name) = &input.call_play {
        call_play(state, name);
    }
    if input.start_play {
        clock::start_play(state);
    }
    if let Some(index) = input.select_receiver {
        select_receiver(state, index);
    }
    if input.attempt_pass {
        if let Err(rejected) = flight::attempt_pass(state) {
            log::debug!("Pass rejected: {}", rejected);
            if let Some(text) = rejected.notice() {
                state.message(text, 1000);
            }
        }
    }
}

/// Change the side on offense
///
/// During a live play the switch waits for the next line-up, so the play in
/// progress keeps its direction and scoring side.
pub fn select_team(state: &mut GameState, team: Team) {
    state.message(format!("Selected team: {}", team.as_str()), 1400);

    if state.phase == PlayPhase::Active {
        log::info!("{} takes over after this play", team.as_str());
        state.pending_offense = Some(team);
        return;
    }

    state.pending_offense = None;
    state.offense = team;
    state.events.push(GameEvent::TeamSelected(team));
    log::info!("Offense is now {}", team.as_str());
    state.spawn_play();
}

/// Switch to a play from the playbook
///
/// Only between plays; returns whether the call took.
pub fn call_play(state: &mut GameState, name: &str) -> bool {
    if state.phase == PlayPhase::Active {
        state.message("Play in progress", 1000);
        return false;
    }
    let Some(index) = state.playbook.index_of(name) else {
        log::debug!("Unknown play {:?}", name);
        state.message("Unknown play", 1000);
        return false;
    };

    state.play_index = index;
    clock::stand_down(state);
    state.take_pending_offense();
    state.spawn_play();
    let call = state.play_call();
    let text = format!("{}: {}", call.family, call.name);
    log::info!("Play call {} ({})", text, call.defense.as_str());
    state.message(text, 1200);
    true
}

/// Pick the receiver slot the next pass goes to
///
/// Any slot is stored; a missing receiver is reported when the pass is thrown.
pub fn select_receiver(state: &mut GameState, index: usize) {
    state.selected_receiver = index;
    state.message(format!("Selected receiver {}", index + 1), 800);
}

fn move_qb(state: &mut GameState, intent: MoveIntent, dt: f32) {
    let (lateral, downfield) = intent.axes();
    if lateral == 0.0 && downfield == 0.0 {
        return;
    }

    let dir = state.offense.direction();
    let step = state.qb.speed * dt;
    let max_x = state.tuning.half_width() - QB_SIDELINE_MARGIN;
    let max_z = state.tuning.half_length() - state.tuning.yards(QB_END_MARGIN_YARDS);

    let pos = state.qb.pos + Vec3::new(lateral * dir * step, 0.0, downfield * dir * step);
    state.qb.pos = Vec3::new(pos.x.clamp(-max_x, max_x), pos.y, pos.z.clamp(-max_z, max_z));
}

fn step_ball(state: &mut GameState, dt: f32, rng: &mut impl RandomSource) {
    if state.phase != PlayPhase::Active || state.ball.in_flight().is_none() {
        state.track_ball_holder();
        return;
    }

    match flight::step_flight(state, dt) {
        Some(event) => {
            resolve::resolve_flight_event(state, event);
        }
        None => {
            resolve::check_catch_or_intercept(state, rng);
        }
    }
}
