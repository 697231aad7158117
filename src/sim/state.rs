//! Game state and core simulation types
//!
//! Everything one session needs lives in `GameState`. Only `clock` writes
//! `phase`; the subsystems read it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::route::{Route, RouteFollower};
use crate::consts::{BALL_CARRY_HEIGHT, BALL_HOLD_BACK, BALL_HOLD_HEIGHT};
use crate::playbook::{PlayCall, Playbook};
use crate::tuning::Tuning;

/// Side of the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Team {
    /// Attacks toward +z
    #[default]
    Home,
    /// Attacks toward -z
    Away,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Home => "HOME",
            Team::Away => "AWAY",
        }
    }

    /// Case-insensitive "home" or "away"
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" => Some(Team::Home),
            "away" => Some(Team::Away),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Team {
        match self {
            Team::Home => Team::Away,
            Team::Away => Team::Home,
        }
    }

    /// Sign of z this team attacks toward
    pub fn direction(&self) -> f32 {
        match self {
            Team::Home => 1.0,
            Team::Away => -1.0,
        }
    }
}

/// State every player on the field shares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec3,
    /// Line-up spot for the current play call
    pub spot: Vec3,
    /// World units per second
    pub speed: f32,
    pub team: Team,
}

impl Agent {
    fn line_up(&mut self) {
        self.pos = self.spot;
    }
}

/// A pass catcher running a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receiver {
    pub agent: Agent,
    pub follower: RouteFollower,
}

/// How a defender picks who to chase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assignment {
    /// Chase the nearest receiver
    Zone,
    /// Shadow one receiver (index into `GameState::receivers`)
    Man { receiver: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defender {
    pub agent: Agent,
    pub assignment: Assignment,
}

/// A pass in the air
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Sim time of release (seconds)
    pub launched_at: f64,
    pub velocity: Vec3,
    /// Receiver index the pass was thrown to
    pub target: usize,
    /// Planned time to reach the target (seconds)
    pub travel_time: f32,
}

/// Who has the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    HeldByQb,
    HeldByReceiver { receiver: usize },
    HeldByDefender { defender: usize },
    /// Dead ball lying where the play ended
    Loose,
    InFlight(Flight),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub state: BallState,
}

impl Ball {
    pub fn in_flight(&self) -> Option<&Flight> {
        match &self.state {
            BallState::InFlight(flight) => Some(flight),
            _ => None,
        }
    }
}

/// How a play ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayOutcome {
    Incomplete,
    /// Pass completed; `touchdown` when it ended in the end zone
    Caught { receiver: usize, touchdown: bool },
    /// Pass picked off; `touchdown` when the return reached the end zone
    Intercepted { defender: usize, touchdown: bool },
}

impl PlayOutcome {
    pub fn is_touchdown(&self) -> bool {
        matches!(
            self,
            PlayOutcome::Caught { touchdown: true, .. }
                | PlayOutcome::Intercepted { touchdown: true, .. }
        )
    }
}

/// Play clock phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayPhase {
    /// Lined up, waiting for the snap
    Idle,
    /// Ball is live
    Active,
    /// Play over, field resets when the scheduled reset fires
    Resolved(PlayOutcome),
}

/// Points for a touchdown (the only way to score)
pub const TOUCHDOWN_POINTS: u32 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn award_touchdown(&mut self, team: Team) {
        match team {
            Team::Home => self.home += TOUCHDOWN_POINTS,
            Team::Away => self.away += TOUCHDOWN_POINTS,
        }
    }

    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Message { text: String, duration_ms: u32 },
    Scoreboard { home: u32, away: u32 },
    TeamSelected(Team),
    PlayResolved(PlayOutcome),
}

/// Deferred work consumed by the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Put everyone back on their spots once play `play_id` is over
    ResetPlay { play_id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Sim time to fire at (seconds)
    pub at: f64,
    pub action: ScheduledAction,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for the outcome RNG
    pub seed: u64,
    pub tuning: Tuning,
    pub playbook: Playbook,
    /// Index of the current call in `playbook.plays`
    pub play_index: usize,
    pub offense: Team,
    /// Side picked during a live play, taken at the next line-up
    pub pending_offense: Option<Team>,
    pub phase: PlayPhase,
    /// Bumped on every snap and full reset
    pub play_id: u32,
    /// Simulation time (seconds)
    pub time: f64,
    pub qb: Agent,
    pub receivers: Vec<Receiver>,
    pub defenders: Vec<Defender>,
    pub ball: Ball,
    /// Receiver slot the next pass goes to
    pub selected_receiver: usize,
    pub score: Score,
    pub scheduled: Vec<ScheduledEvent>,
    /// Outbound events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning and the standard playbook
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Playbook::standard())
    }

    pub fn with_config(seed: u64, tuning: Tuning, playbook: Playbook) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Falling back to default tuning: {}", e);
                Tuning::default()
            }
        };
        let playbook = match playbook.validate() {
            Ok(()) => playbook,
            Err(e) => {
                log::warn!("Falling back to standard playbook: {}", e);
                Playbook::standard()
            }
        };
        let qb = Agent {
            id: 0,
            pos: Vec3::ZERO,
            spot: Vec3::ZERO,
            speed: tuning.yards(tuning.qb_speed),
            team: Team::Home,
        };
        let mut state = Self {
            seed,
            tuning,
            playbook,
            play_index: 0,
            offense: Team::Home,
            pending_offense: None,
            phase: PlayPhase::Idle,
            play_id: 0,
            time: 0.0,
            qb,
            receivers: Vec::new(),
            defenders: Vec::new(),
            ball: Ball {
                pos: Vec3::ZERO,
                state: BallState::HeldByQb,
            },
            selected_receiver: 0,
            score: Score::default(),
            scheduled: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        state.spawn_play();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The play currently called
    pub fn play_call(&self) -> &PlayCall {
        // Validated in `with_config`, so there is always at least one play
        &self.playbook.plays[self.play_index.min(self.playbook.plays.len() - 1)]
    }

    /// Build receivers and defenders for the current call and line them up
    pub fn spawn_play(&mut self) {
        let lineup = self.play_call().lineup(&self.tuning, self.offense);
        let defense = self.offense.opponent();
        let route_speed = self.tuning.yards(self.tuning.route_speed);
        let defender_speed = self.tuning.yards(self.tuning.defender_speed);

        self.qb.spot = lineup.qb;
        self.qb.team = self.offense;

        let receivers: Vec<(Vec3, Route)> = lineup.receivers;
        self.receivers.clear();
        for (spot, route) in receivers {
            let agent = Agent {
                id: self.next_entity_id(),
                pos: spot,
                spot,
                speed: route_speed,
                team: self.offense,
            };
            self.receivers.push(Receiver {
                agent,
                follower: RouteFollower::new(route),
            });
        }

        self.defenders.clear();
        for (spot, man) in lineup.defenders {
            let agent = Agent {
                id: self.next_entity_id(),
                pos: spot,
                spot,
                speed: defender_speed,
                team: defense,
            };
            let assignment = match man {
                Some(receiver) => Assignment::Man { receiver },
                None => Assignment::Zone,
            };
            self.defenders.push(Defender { agent, assignment });
        }

        self.line_up();
    }

    /// Return every player to their spot and the ball to the quarterback
    pub fn line_up(&mut self) {
        self.qb.line_up();
        for r in &mut self.receivers {
            r.agent.line_up();
            r.follower.reset();
        }
        for d in &mut self.defenders {
            d.agent.line_up();
        }
        self.ball.state = BallState::HeldByQb;
        self.ball.pos = self.ball_hold_point();
    }

    /// Switch to the side picked during the last play, if any
    ///
    /// Returns whether the offense changed; the caller re-spawns the formation.
    pub fn take_pending_offense(&mut self) -> bool {
        match self.pending_offense.take() {
            Some(team) if team != self.offense => {
                self.offense = team;
                self.events.push(GameEvent::TeamSelected(team));
                log::info!("Offense is now {}", team.as_str());
                true
            }
            _ => false,
        }
    }

    /// Line up for the next snap, re-spawning if the offense changed
    pub fn line_up_next(&mut self) {
        if self.take_pending_offense() {
            self.spawn_play();
        } else {
            self.line_up();
        }
    }

    /// Where the quarterback carries the ball
    pub fn ball_hold_point(&self) -> Vec3 {
        self.qb.pos
            + Vec3::new(
                0.0,
                BALL_HOLD_HEIGHT,
                -self.offense.direction() * BALL_HOLD_BACK,
            )
    }

    /// Keep a held ball with whoever holds it
    pub fn track_ball_holder(&mut self) {
        let carry = Vec3::new(0.0, BALL_CARRY_HEIGHT, 0.0);
        match self.ball.state {
            BallState::HeldByQb => self.ball.pos = self.ball_hold_point(),
            BallState::HeldByReceiver { receiver } => {
                if let Some(r) = self.receivers.get(receiver) {
                    self.ball.pos = r.agent.pos + carry;
                }
            }
            BallState::HeldByDefender { defender } => {
                if let Some(d) = self.defenders.get(defender) {
                    self.ball.pos = d.agent.pos + carry;
                }
            }
            BallState::Loose | BallState::InFlight(_) => {}
        }
    }

    /// Has `pos` crossed the goal line `team` attacks?
    pub fn in_end_zone(&self, pos: Vec3, team: Team) -> bool {
        team.direction() * pos.z > self.tuning.goal_line()
    }

    /// Is `pos` outside the sidelines or end lines?
    pub fn out_of_bounds(&self, pos: Vec3) -> bool {
        pos.x.abs() > self.tuning.half_width() || pos.z.abs() > self.tuning.half_length()
    }

    /// Queue an on-screen notice
    pub fn message(&mut self, text: impl Into<String>, duration_ms: u32) {
        self.events.push(GameEvent::Message {
            text: text.into(),
            duration_ms,
        });
    }

    /// Add 7 for `team` and publish the new score
    pub fn award_touchdown(&mut self, team: Team) {
        self.score.award_touchdown(team);
        log::info!(
            "Touchdown {} (home {} - away {})",
            team.as_str(),
            self.score.home,
            self.score.away
        );
        self.publish_score();
    }

    pub fn publish_score(&mut self) {
        self.events.push(GameEvent::Scoreboard {
            home: self.score.home,
            away: self.score.away,
        });
    }

    /// Take all pending outbound events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
