//! Play outcomes
//!
//! Runs after the ball has moved. A ball that hit something on its own
//! (turf, end zone, boundary) ends the play directly; otherwise defenders near
//! the ball get a shot at the pick before the target gets a shot at the catch.

use glam::Vec3;

use super::clock;
use super::flight::FlightEvent;
use super::random::{RandomSource, interception_chance};
use super::state::{BallState, GameState, PlayOutcome};
use crate::consts::{BALL_CARRY_HEIGHT, MAX_RETURN_YARDS};

/// End the play for a ball that came down without a player touching it
pub fn resolve_flight_event(state: &mut GameState, event: FlightEvent) -> PlayOutcome {
    match event {
        FlightEvent::Grounded | FlightEvent::OutOfBounds => {
            state.ball.state = BallState::Loose;
            let text = if event == FlightEvent::Grounded {
                "Incomplete pass"
            } else {
                "Incomplete - out of bounds"
            };
            state.message(text, 900);
            let outcome = PlayOutcome::Incomplete;
            let delay = state.tuning.incomplete_reset_delay;
            clock::resolve_play(state, outcome, delay);
            outcome
        }
        FlightEvent::EndZone => {
            let target = match state.ball.state {
                BallState::InFlight(flight) => flight.target,
                _ => state.selected_receiver,
            };
            state.ball.state = BallState::Loose;
            let team = state.offense;
            state.award_touchdown(team);
            state.message(format!("TOUCHDOWN! {} gets 7", team.as_str()), 3000);
            let outcome = PlayOutcome::Caught {
                receiver: target,
                touchdown: true,
            };
            let delay = state.tuning.touchdown_reset_delay;
            clock::resolve_play(state, outcome, delay);
            outcome
        }
    }
}

/// Check defenders and the target against the ball in flight
///
/// Returns the outcome when the play ended this tick.
pub fn check_catch_or_intercept(
    state: &mut GameState,
    rng: &mut impl RandomSource,
) -> Option<PlayOutcome> {
    let flight = *state.ball.in_flight()?;
    let ball = state.ball.pos;
    let base = state.tuning.interception_base;
    let jitter = state.tuning.interception_jitter;

    let pick_radius = state.tuning.yards(state.tuning.interception_radius);
    for i in 0..state.defenders.len() {
        if state.defenders[i].agent.pos.distance(ball) >= pick_radius {
            continue;
        }
        let chance = interception_chance(base, jitter, rng.next_unit());
        if rng.next_unit() < chance {
            state.message("INTERCEPTION!", 2000);
            return Some(intercept(state, i, rng));
        }
        state.message("Defender close, but failed to intercept", 800);
    }

    let target = state.receivers.get(flight.target)?.agent.pos;
    if target.distance(ball) >= state.tuning.yards(state.tuning.catch_radius) {
        return None;
    }

    let contest_radius = state.tuning.yards(state.tuning.contest_radius);
    let contested = state
        .defenders
        .iter()
        .any(|d| d.agent.pos.distance(target) < contest_radius);

    // An open receiver catches without a draw
    if !contested || rng.next_unit() > base {
        Some(catch(state, flight.target))
    } else {
        let defender = rng.pick(state.defenders.len());
        state.message("INTERCEPTION at catch!", 1400);
        Some(intercept(state, defender, rng))
    }
}

fn catch(state: &mut GameState, receiver: usize) -> PlayOutcome {
    let pos = state.receivers[receiver].agent.pos;
    state.ball.state = BallState::HeldByReceiver { receiver };
    state.ball.pos = pos + Vec3::Y * BALL_CARRY_HEIGHT;
    state.message(format!("CATCH! R{}", receiver + 1), 1400);

    let team = state.offense;
    let touchdown = state.in_end_zone(pos, team);
    if touchdown {
        state.award_touchdown(team);
        state.message(format!("TOUCHDOWN! {} scores 7", team.as_str()), 3000);
    } else {
        state.message("First down / tackle - play over", 1800);
    }

    let outcome = PlayOutcome::Caught {
        receiver,
        touchdown,
    };
    let delay = state.tuning.reset_delay;
    clock::resolve_play(state, outcome, delay);
    outcome
}

fn intercept(state: &mut GameState, defender: usize, rng: &mut impl RandomSource) -> PlayOutcome {
    let team = state.offense.opponent();
    let return_dist = rng.next_unit() * state.tuning.yards(MAX_RETURN_YARDS);

    let agent = &mut state.defenders[defender].agent;
    agent.pos.z += team.direction() * return_dist;
    let pos = agent.pos;

    state.ball.state = BallState::HeldByDefender { defender };
    state.ball.pos = pos + Vec3::Y * BALL_CARRY_HEIGHT;

    let touchdown = state.in_end_zone(pos, team);
    if touchdown {
        state.award_touchdown(team);
        state.message(
            format!("INTERCEPTION RETURN TD! {} gets 7", team.as_str()),
            3000,
        );
    } else {
        state.message("Interception - play over", 2000);
    }

    let outcome = PlayOutcome::Intercepted {
        defender,
        touchdown,
    };
    let delay = state.tuning.reset_delay;
    clock::resolve_play(state, outcome, delay);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{ScriptedRandom, SimRng};
    use crate::sim::state::{Flight, GameEvent, PlayPhase, Team};

    /// Snap, then put the ball in the air next to receiver `target`
    fn ball_near_receiver(target: usize) -> GameState {
        let mut state = GameState::new(7);
        clock::start_play(&mut state);
        let pos = state.receivers[target].agent.pos;
        state.ball.pos = pos + Vec3::new(0.0, 2.0, 0.0);
        state.ball.state = BallState::InFlight(Flight {
            launched_at: 0.0,
            velocity: Vec3::ZERO,
            target,
            travel_time: 0.5,
        });
        state
    }

    /// Move every defender far from the ball
    fn clear_defenders(state: &mut GameState) {
        for (i, d) in state.defenders.iter_mut().enumerate() {
            d.agent.pos = Vec3::new(-100.0 + i as f32 * 10.0, 1.2, 250.0);
        }
    }

    fn messages(state: &mut GameState) -> Vec<String> {
        state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_open_receiver_always_catches() {
        for draw in [0.0f32, 0.3, 0.99] {
            let mut state = ball_near_receiver(1);
            clear_defenders(&mut state);
            let mut rng = ScriptedRandom::new([draw]);

            let outcome = check_catch_or_intercept(&mut state, &mut rng);
            assert_eq!(
                outcome,
                Some(PlayOutcome::Caught {
                    receiver: 1,
                    touchdown: false
                })
            );
            assert_eq!(rng.taken(), 0);
            assert_eq!(state.ball.state, BallState::HeldByReceiver { receiver: 1 });
            assert!(matches!(state.phase, PlayPhase::Resolved(_)));
            assert_eq!(state.score.home, 0);
        }
    }

    #[test]
    fn test_ball_out_of_reach_keeps_flying() {
        let mut state = ball_near_receiver(0);
        clear_defenders(&mut state);
        state.ball.pos.z += 50.0;
        let mut rng = ScriptedRandom::new([0.0]);
        assert_eq!(check_catch_or_intercept(&mut state, &mut rng), None);
        assert_eq!(state.phase, PlayPhase::Active);
        assert!(state.ball.in_flight().is_some());
    }

    #[test]
    fn test_defender_at_ball_picks_it_off() {
        let mut state = ball_near_receiver(0);
        clear_defenders(&mut state);
        state.defenders[2].agent.pos = state.ball.pos;
        // chance draw, pick draw (0.1 < 0.35), return draw
        let mut rng = ScriptedRandom::new([0.0, 0.1, 0.5]);

        let outcome = check_catch_or_intercept(&mut state, &mut rng);
        assert_eq!(
            outcome,
            Some(PlayOutcome::Intercepted {
                defender: 2,
                touchdown: false
            })
        );
        assert_eq!(state.ball.state, BallState::HeldByDefender { defender: 2 });
        assert!(messages(&mut state).contains(&"INTERCEPTION!".to_string()));
    }

    #[test]
    fn test_failed_pick_still_allows_catch() {
        let mut state = ball_near_receiver(0);
        clear_defenders(&mut state);
        // Close enough to try for the pick; the contest draw then goes to the receiver
        state.defenders[0].agent.pos = state.ball.pos + Vec3::new(0.0, 10.0, 0.0);
        let mut rng = ScriptedRandom::new([0.0, 0.9]);

        let outcome = check_catch_or_intercept(&mut state, &mut rng);
        assert!(matches!(outcome, Some(PlayOutcome::Caught { .. })));
        assert!(
            messages(&mut state).contains(&"Defender close, but failed to intercept".to_string())
        );
    }

    #[test]
    fn test_contested_catch_low_draw_turns_over() {
        let mut state = ball_near_receiver(0);
        clear_defenders(&mut state);
        let target = state.receivers[0].agent.pos;
        // Inside the contest radius, outside the pick radius of the ball
        state.defenders[3].agent.pos = target + Vec3::new(13.0, -2.0, 0.0);
        // contest draw 0.2 <= 0.35, pick index 0.9 -> defender 3, return draw 0
        let mut rng = ScriptedRandom::new([0.2, 0.9, 0.0]);

        let outcome = check_catch_or_intercept(&mut state, &mut rng);
        assert_eq!(
            outcome,
            Some(PlayOutcome::Intercepted {
                defender: 3,
                touchdown: false
            })
        );
        assert!(messages(&mut state).contains(&"INTERCEPTION at catch!".to_string()));
    }

    #[test]
    fn test_contested_catch_high_draw_completes() {
        let mut state = ball_near_receiver(0);
        clear_defenders(&mut state);
        let target = state.receivers[0].agent.pos;
        state.defenders[3].agent.pos = target + Vec3::new(13.0, -2.0, 0.0);
        let mut rng = ScriptedRandom::new([0.6]);

        let outcome = check_catch_or_intercept(&mut state, &mut rng);
        assert!(matches!(outcome, Some(PlayOutcome::Caught { receiver: 0, .. })));
    }

    #[test]
    fn test_catch_in_end_zone_scores_seven() {
        let mut state = ball_near_receiver(2);
        clear_defenders(&mut state);
        state.receivers[2].agent.pos = Vec3::new(0.0, 1.2, 290.0);
        state.ball.pos = Vec3::new(0.0, 3.0, 290.0);
        let mut rng = ScriptedRandom::new([0.5]);

        let outcome = check_catch_or_intercept(&mut state, &mut rng);
        assert_eq!(
            outcome,
            Some(PlayOutcome::Caught {
                receiver: 2,
                touchdown: true
            })
        );
        assert_eq!(state.score.home, 7);
        assert_eq!(state.score.away, 0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Scoreboard { home: 7, away: 0 }));
    }

    #[test]
    fn test_pick_return_scores_for_defense() {
        let mut state = ball_near_receiver(0);
        clear_defenders(&mut state);
        // Home offense attacks +z, so the away return runs toward -z
        state.defenders[1].agent.pos = Vec3::new(0.0, 1.2, -250.0);
        state.ball.pos = Vec3::new(0.0, 3.0, -250.0);
        // chance draw, pick draw, full 30 yard return
        let mut rng = ScriptedRandom::new([0.0, 0.0, 0.99]);

        let outcome = check_catch_or_intercept(&mut state, &mut rng);
        assert_eq!(
            outcome,
            Some(PlayOutcome::Intercepted {
                defender: 1,
                touchdown: true
            })
        );
        assert!(state.defenders[1].agent.pos.z < -280.0);
        assert_eq!(state.score.away, 7);
        assert_eq!(state.score.home, 0);
        assert!(
            messages(&mut state).contains(&"INTERCEPTION RETURN TD! AWAY gets 7".to_string())
        );
    }

    #[test]
    fn test_away_offense_pick_returns_toward_plus_z() {
        let mut state = GameState::new(7);
        state.offense = Team::Away;
        state.spawn_play();
        clock::start_play(&mut state);
        let before = state.defenders[0].agent.pos;
        state.ball.pos = before;
        state.ball.state = BallState::InFlight(Flight {
            launched_at: 0.0,
            velocity: Vec3::ZERO,
            target: 0,
            travel_time: 0.5,
        });
        let mut rng = ScriptedRandom::new([0.0, 0.0, 0.5]);
        check_catch_or_intercept(&mut state, &mut rng);
        assert!((state.defenders[0].agent.pos.z - (before.z + 60.0)).abs() < 1e-3);
    }

    #[test]
    fn test_grounded_ball_is_incomplete() {
        let mut state = ball_near_receiver(0);
        let outcome = resolve_flight_event(&mut state, FlightEvent::Grounded);
        assert_eq!(outcome, PlayOutcome::Incomplete);
        assert_eq!(state.ball.state, BallState::Loose);
        assert_eq!(state.phase, PlayPhase::Resolved(PlayOutcome::Incomplete));
        assert!((state.scheduled[0].at - 0.8).abs() < 1e-6);
        assert!(messages(&mut state).contains(&"Incomplete pass".to_string()));
    }

    #[test]
    fn test_end_zone_arrival_scores_for_offense() {
        let mut state = ball_near_receiver(3);
        let outcome = resolve_flight_event(&mut state, FlightEvent::EndZone);
        assert_eq!(
            outcome,
            PlayOutcome::Caught {
                receiver: 3,
                touchdown: true
            }
        );
        assert_eq!(state.score.home, 7);
        assert!((state.scheduled[0].at - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_bounds_scores_nothing() {
        let mut state = ball_near_receiver(0);
        let outcome = resolve_flight_event(&mut state, FlightEvent::OutOfBounds);
        assert_eq!(outcome, PlayOutcome::Incomplete);
        assert_eq!(state.score.home + state.score.away, 0);
    }

    #[test]
    fn test_seeded_outcomes_replay() {
        let run = |seed: u64| {
            let mut state = ball_near_receiver(0);
            let target = state.receivers[0].agent.pos;
            for (i, d) in state.defenders.iter_mut().enumerate() {
                d.agent.pos = target + Vec3::new(2.0 * i as f32, 0.0, 1.0);
            }
            let mut rng = SimRng::seeded(seed);
            let outcome = check_catch_or_intercept(&mut state, &mut rng);
            (outcome, state.score, state.defenders[0].agent.pos)
        };
        for seed in 0..20 {
            assert_eq!(run(seed), run(seed));
        }
    }

    #[test]
    fn test_score_only_moves_by_touchdowns() {
        for seed in 0..50 {
            let mut state = ball_near_receiver(0);
            let target = state.receivers[0].agent.pos;
            state.defenders[0].agent.pos = target + Vec3::new(1.0, 0.0, 0.0);
            let mut rng = SimRng::seeded(seed);
            let outcome = check_catch_or_intercept(&mut state, &mut rng);
            let total = state.score.home + state.score.away;
            match outcome {
                Some(o) if o.is_touchdown() => assert_eq!(total, 7),
                _ => assert_eq!(total, 0),
            }
        }
    }

    #[test]
    fn test_held_ball_not_resolved() {
        let mut state = GameState::new(1);
        clock::start_play(&mut state);
        let mut rng = ScriptedRandom::new([0.0]);
        assert_eq!(check_catch_or_intercept(&mut state, &mut rng), None);
        assert_eq!(rng.taken(), 0);
    }
}
