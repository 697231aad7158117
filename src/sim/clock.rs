//! Play clock
//!
//! The only writer of `GameState::phase`. Resets are scheduled entries tagged
//! with the play they belong to; one that fires after a newer snap is dropped.

use super::state::{
    GameEvent, GameState, PlayOutcome, PlayPhase, ScheduledAction, ScheduledEvent,
};

/// Line everyone up and snap the ball
pub fn start_play(state: &mut GameState) {
    state.line_up_next();
    state.play_id += 1;
    state.phase = PlayPhase::Active;
    log::info!(
        "Play {} started: {} ({})",
        state.play_id,
        state.play_call().name,
        state.play_call().defense.as_str()
    );
    state.message("Play started", 1000);
}

/// End the live play and schedule the field reset
pub fn resolve_play(state: &mut GameState, outcome: PlayOutcome, reset_delay: f32) {
    if state.phase != PlayPhase::Active {
        log::debug!("Ignoring {:?}, no live play", outcome);
        return;
    }

    state.phase = PlayPhase::Resolved(outcome);
    state.scheduled.push(ScheduledEvent {
        at: state.time + reset_delay as f64,
        action: ScheduledAction::ResetPlay {
            play_id: state.play_id,
        },
    });
    state.events.push(GameEvent::PlayResolved(outcome));
    log::info!("Play {} over: {:?}", state.play_id, outcome);
}

/// Fire every scheduled entry that is due
pub fn run_scheduled(state: &mut GameState) {
    let now = state.time;
    let (due, pending): (Vec<_>, Vec<_>) = state.scheduled.drain(..).partition(|e| e.at <= now);
    state.scheduled = pending;

    for event in due {
        match event.action {
            ScheduledAction::ResetPlay { play_id } => {
                let current = play_id == state.play_id
                    && matches!(state.phase, PlayPhase::Resolved(_));
                if current {
                    state.line_up_next();
                    state.phase = PlayPhase::Idle;
                    log::debug!("Field reset after play {}", play_id);
                } else {
                    log::debug!("Dropping stale reset for play {}", play_id);
                }
            }
        }
    }
}

/// Zero the score and put everyone back on their spots
pub fn reset_all(state: &mut GameState) {
    state.line_up_next();
    state.score = Default::default();
    state.phase = PlayPhase::Idle;
    // Invalidate anything still scheduled for the old play
    state.play_id += 1;
    state.scheduled.clear();
    state.publish_score();
    state.message("Game reset", 2000);
    log::info!("Game reset");
}

/// Drop back to idle without a snap (used when the play call changes)
pub fn stand_down(state: &mut GameState) {
    if state.phase != PlayPhase::Active {
        state.phase = PlayPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BallState, Team};

    #[test]
    fn test_start_play_goes_active() {
        let mut state = GameState::new(1);
        start_play(&mut state);
        assert_eq!(state.phase, PlayPhase::Active);
        assert_eq!(state.play_id, 1);
        assert_eq!(state.ball.state, BallState::HeldByQb);
    }

    #[test]
    fn test_resolve_schedules_reset() {
        let mut state = GameState::new(1);
        start_play(&mut state);
        state.time = 2.0;
        resolve_play(&mut state, PlayOutcome::Incomplete, 0.8);

        assert_eq!(state.phase, PlayPhase::Resolved(PlayOutcome::Incomplete));
        assert_eq!(state.scheduled.len(), 1);
        assert!((state.scheduled[0].at - 2.8).abs() < 1e-6);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PlayResolved(PlayOutcome::Incomplete)));
    }

    #[test]
    fn test_resolve_ignored_when_not_active() {
        let mut state = GameState::new(1);
        resolve_play(&mut state, PlayOutcome::Incomplete, 0.8);
        assert_eq!(state.phase, PlayPhase::Idle);
        assert!(state.scheduled.is_empty());
    }

    #[test]
    fn test_reset_fires_when_due() {
        let mut state = GameState::new(1);
        start_play(&mut state);
        state.receivers[0].agent.pos.z += 50.0;
        resolve_play(&mut state, PlayOutcome::Incomplete, 1.5);

        state.time = 1.0;
        run_scheduled(&mut state);
        assert!(matches!(state.phase, PlayPhase::Resolved(_)));

        state.time = 1.5;
        run_scheduled(&mut state);
        assert_eq!(state.phase, PlayPhase::Idle);
        assert_eq!(state.receivers[0].agent.pos, state.receivers[0].agent.spot);
        assert!(state.scheduled.is_empty());
    }

    #[test]
    fn test_stale_reset_does_not_touch_new_play() {
        let mut state = GameState::new(1);
        start_play(&mut state);
        resolve_play(&mut state, PlayOutcome::Incomplete, 1.5);

        // Snap again before the reset fires
        state.time = 0.5;
        start_play(&mut state);
        state.receivers[1].agent.pos.z += 30.0;

        state.time = 2.0;
        run_scheduled(&mut state);
        assert_eq!(state.phase, PlayPhase::Active);
        assert_ne!(state.receivers[1].agent.pos, state.receivers[1].agent.spot);
    }

    #[test]
    fn test_reset_all_zeroes_score_and_cancels_resets() {
        let mut state = GameState::new(1);
        state.award_touchdown(Team::Home);
        state.award_touchdown(Team::Away);
        start_play(&mut state);
        resolve_play(&mut state, PlayOutcome::Incomplete, 1.5);
        state.drain_events();

        reset_all(&mut state);
        assert_eq!(state.score.home, 0);
        assert_eq!(state.score.away, 0);
        assert_eq!(state.phase, PlayPhase::Idle);
        assert!(state.scheduled.is_empty());
        assert!(state
            .drain_events()
            .contains(&GameEvent::Scoreboard { home: 0, away: 0 }));
    }

    #[test]
    fn test_reset_takes_pending_offense() {
        let mut state = GameState::new(1);
        start_play(&mut state);
        state.pending_offense = Some(Team::Away);
        resolve_play(&mut state, PlayOutcome::Incomplete, 0.8);
        assert_eq!(state.offense, Team::Home);

        state.time = 1.0;
        run_scheduled(&mut state);
        assert_eq!(state.phase, PlayPhase::Idle);
        assert_eq!(state.offense, Team::Away);
        assert_eq!(state.pending_offense, None);
        assert!(state.receivers.iter().all(|r| r.agent.team == Team::Away));
        assert!(state.defenders.iter().all(|d| d.agent.team == Team::Home));
        assert!(state.drain_events().contains(&GameEvent::TeamSelected(Team::Away)));
    }

    #[test]
    fn test_stand_down_keeps_live_play() {
        let mut state = GameState::new(1);
        start_play(&mut state);
        stand_down(&mut state);
        assert_eq!(state.phase, PlayPhase::Active);

        resolve_play(&mut state, PlayOutcome::Incomplete, 1.0);
        stand_down(&mut state);
        assert_eq!(state.phase, PlayPhase::Idle);
    }
}
