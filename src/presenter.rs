//! Presentation boundary
//!
//! The simulation never draws. Each frame the driver hands the state and the
//! drained events to `present`, which fans them out to a `Presenter`.

use glam::Vec3;

use crate::sim::{GameEvent, GameState, Team};

/// Role of a drawn player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Quarterback,
    Receiver,
    Defender,
}

/// Anything that can show the game
pub trait Presenter {
    /// Called once before any draw in a frame
    fn begin_frame(&mut self) {}

    fn draw_agent(&mut self, kind: AgentKind, team: Team, position: Vec3);
    fn draw_ball(&mut self, position: Vec3);
    fn show_message(&mut self, text: &str, duration_ms: u32);
    fn update_scoreboard(&mut self, home: u32, away: u32);
    /// The offense changed; recolour whatever marks the quarterback
    fn set_team_color(&mut self, team: Team);
}

/// RGB colours, 0xRRGGBB
pub mod palette {
    use crate::sim::Team;

    pub const HOME: u32 = 0x0a4fff;
    pub const AWAY: u32 = 0xff1000;
    /// Quarterback before any team is picked
    pub const QB_DEFAULT: u32 = 0xffff00;
    pub const DEFENDER: u32 = 0x0a0a0a;
    pub const BALL: u32 = 0x7a3b1a;
    pub const FIELD: u32 = 0x057a2a;
    pub const LINE: u32 = 0xffffff;

    pub fn team(team: Team) -> u32 {
        match team {
            Team::Home => HOME,
            Team::Away => AWAY,
        }
    }

    /// CSS `#rrggbb` form
    pub fn css(color: u32) -> String {
        format!("#{:06x}", color & 0xff_ffff)
    }
}

/// Draw one frame and forward this frame's events
pub fn present(state: &GameState, events: &[GameEvent], presenter: &mut impl Presenter) {
    for event in events {
        match event {
            GameEvent::Message { text, duration_ms } => presenter.show_message(text, *duration_ms),
            GameEvent::Scoreboard { home, away } => presenter.update_scoreboard(*home, *away),
            GameEvent::TeamSelected(team) => presenter.set_team_color(*team),
            GameEvent::PlayResolved(_) => {}
        }
    }

    presenter.begin_frame();
    presenter.draw_agent(AgentKind::Quarterback, state.qb.team, state.qb.pos);
    for r in &state.receivers {
        presenter.draw_agent(AgentKind::Receiver, r.agent.team, r.agent.pos);
    }
    for d in &state.defenders {
        presenter.draw_agent(AgentKind::Defender, d.agent.team, d.agent.pos);
    }
    presenter.draw_ball(state.ball.pos);
}

/// Presenter that writes notices and score changes to the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub frames: u64,
}

impl Presenter for LogPresenter {
    fn begin_frame(&mut self) {
        self.frames += 1;
    }

    fn draw_agent(&mut self, _kind: AgentKind, _team: Team, _position: Vec3) {}

    fn draw_ball(&mut self, position: Vec3) {
        log::trace!("ball at {:.1?}", position);
    }

    fn show_message(&mut self, text: &str, duration_ms: u32) {
        log::info!("[{}ms] {}", duration_ms, text);
    }

    fn update_scoreboard(&mut self, home: u32, away: u32) {
        log::info!("HOME {} - AWAY {}", home, away);
    }

    fn set_team_color(&mut self, team: Team) {
        log::info!("{} on offense", team.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        frames: u32,
        agents: Vec<(AgentKind, Team, Vec3)>,
        ball: Option<Vec3>,
        messages: Vec<(String, u32)>,
        score: Option<(u32, u32)>,
        team: Option<Team>,
    }

    impl Presenter for Recorder {
        fn begin_frame(&mut self) {
            self.frames += 1;
            self.agents.clear();
        }

        fn draw_agent(&mut self, kind: AgentKind, team: Team, position: Vec3) {
            self.agents.push((kind, team, position));
        }

        fn draw_ball(&mut self, position: Vec3) {
            self.ball = Some(position);
        }

        fn show_message(&mut self, text: &str, duration_ms: u32) {
            self.messages.push((text.to_string(), duration_ms));
        }

        fn update_scoreboard(&mut self, home: u32, away: u32) {
            self.score = Some((home, away));
        }

        fn set_team_color(&mut self, team: Team) {
            self.team = Some(team);
        }
    }

    #[test]
    fn test_frame_draws_everyone() {
        let state = GameState::new(1);
        let mut rec = Recorder::default();
        present(&state, &[], &mut rec);

        assert_eq!(rec.frames, 1);
        assert_eq!(rec.agents.len(), 1 + 4 + 4);
        assert_eq!(rec.agents[0], (AgentKind::Quarterback, Team::Home, state.qb.pos));
        assert!(rec.agents[1..5].iter().all(|a| a.0 == AgentKind::Receiver));
        assert!(rec.agents[5..].iter().all(|a| a.0 == AgentKind::Defender && a.1 == Team::Away));
        assert_eq!(rec.ball, Some(state.ball.pos));
    }

    #[test]
    fn test_events_forwarded() {
        let mut state = GameState::new(1);
        state.message("Play started", 1000);
        state.award_touchdown(Team::Away);
        state.events.push(GameEvent::TeamSelected(Team::Away));
        let events = state.drain_events();

        let mut rec = Recorder::default();
        present(&state, &events, &mut rec);
        assert_eq!(rec.messages, vec![("Play started".to_string(), 1000)]);
        assert_eq!(rec.score, Some((0, 7)));
        assert_eq!(rec.team, Some(Team::Away));
    }

    #[test]
    fn test_palette_css() {
        assert_eq!(palette::css(palette::team(Team::Home)), "#0a4fff");
        assert_eq!(palette::css(palette::DEFENDER), "#0a0a0a");
    }
}
