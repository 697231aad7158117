//! Play calls: formations, routes and defensive looks
//!
//! Offsets are in yards. `x` is lateral, `z` is downfield from the snap spot
//! (positive toward the goal the offense attacks). Routes are relative to the
//! receiver's own line-up spot.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{GROUND_OFFSET, QB_DEPTH_YARDS};
use crate::error::ConfigError;
use crate::sim::{Route, Team};
use crate::tuning::Tuning;

/// A point on the field relative to the snap spot (yards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub x: f32,
    pub z: f32,
}

const fn spot(x: f32, z: f32) -> Spot {
    Spot { x, z }
}

/// Where the offense lines up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub qb: Spot,
    pub receivers: Vec<Spot>,
}

/// Zone shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coverage {
    /// Four defenders level across the field
    Spread,
    Cover1,
    Cover2,
    Cover3,
}

const SPREAD: &[Spot] = &[spot(-10.0, 10.0), spot(-3.0, 10.0), spot(3.0, 10.0), spot(10.0, 10.0)];
const COVER_1: &[Spot] = &[spot(-15.0, 12.0), spot(0.0, 15.0), spot(15.0, 12.0)];
const COVER_2: &[Spot] = &[spot(-20.0, 12.0), spot(0.0, 25.0), spot(20.0, 12.0)];
const COVER_3: &[Spot] = &[spot(-20.0, 22.0), spot(0.0, 12.0), spot(20.0, 22.0)];

impl Coverage {
    /// Defender line-up spots for this shell
    pub fn spots(&self) -> &'static [Spot] {
        match self {
            Coverage::Spread => SPREAD,
            Coverage::Cover1 => COVER_1,
            Coverage::Cover2 => COVER_2,
            Coverage::Cover3 => COVER_3,
        }
    }
}

/// The defensive call that comes with a play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseCall {
    /// Defenders start in a shell and chase whoever is nearest
    Zone(Coverage),
    /// One defender per receiver, shadowing that receiver
    Man,
}

impl DefenseCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefenseCall::Zone(Coverage::Spread) => "Spread",
            DefenseCall::Zone(Coverage::Cover1) => "Cover 1",
            DefenseCall::Zone(Coverage::Cover2) => "Cover 2",
            DefenseCall::Zone(Coverage::Cover3) => "Cover 3",
            DefenseCall::Man => "Man",
        }
    }
}

/// Man defenders line up this far off their receiver (yards)
const MAN_CUSHION_YARDS: f32 = 5.0;

/// One entry in the playbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayCall {
    /// Menu grouping, e.g. "Shotgun"
    pub family: String,
    pub name: String,
    pub formation: Formation,
    /// One route per receiver, in formation order
    pub routes: Vec<Vec<Spot>>,
    pub defense: DefenseCall,
}

/// World-space starting positions for one play
#[derive(Debug, Clone)]
pub struct Lineup {
    pub qb: Vec3,
    pub receivers: Vec<(Vec3, Route)>,
    /// Defender spot and, for man coverage, the receiver index it shadows
    pub defenders: Vec<(Vec3, Option<usize>)>,
}

/// Snap spot for an offense (world units)
pub fn snap_spot(tuning: &Tuning, offense: Team) -> Vec3 {
    Vec3::new(
        0.0,
        GROUND_OFFSET,
        -offense.direction() * tuning.yards(QB_DEPTH_YARDS),
    )
}

impl PlayCall {
    /// Resolve offsets into world positions for the given offense
    pub fn lineup(&self, tuning: &Tuning, offense: Team) -> Lineup {
        let snap = snap_spot(tuning, offense);
        let dir = offense.direction();
        let to_world = |base: Vec3, s: Spot| {
            base + Vec3::new(tuning.yards(s.x), 0.0, dir * tuning.yards(s.z))
        };

        let qb = to_world(snap, self.formation.qb);

        let receivers: Vec<(Vec3, Route)> = self
            .formation
            .receivers
            .iter()
            .zip(&self.routes)
            .map(|(&s, route)| {
                let start = to_world(snap, s);
                let waypoints = route.iter().map(|&w| to_world(start, w));
                (start, Route::new(start, waypoints))
            })
            .collect();

        let defenders = match self.defense {
            DefenseCall::Zone(coverage) => coverage
                .spots()
                .iter()
                .map(|&s| (to_world(snap, s), None))
                .collect(),
            DefenseCall::Man => receivers
                .iter()
                .enumerate()
                .map(|(i, (start, _))| (to_world(*start, spot(0.0, MAN_CUSHION_YARDS)), Some(i)))
                .collect(),
        };

        Lineup {
            qb,
            receivers,
            defenders,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.formation.receivers.is_empty() {
            return Err(ConfigError::Invalid {
                field: "formation.receivers",
                reason: format!("play {:?} has no receivers", self.name),
            });
        }
        if self.formation.receivers.len() != self.routes.len() {
            return Err(ConfigError::RouteCount {
                play: self.name.clone(),
                receivers: self.formation.receivers.len(),
                routes: self.routes.len(),
            });
        }
        if self.routes.iter().any(|r| r.is_empty()) {
            return Err(ConfigError::Invalid {
                field: "routes",
                reason: format!("play {:?} has an empty route", self.name),
            });
        }
        Ok(())
    }
}

/// Every play the offense can call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playbook {
    pub plays: Vec<PlayCall>,
}

impl Default for Playbook {
    fn default() -> Self {
        Self::standard()
    }
}

impl Playbook {
    /// Built-in plays
    pub fn standard() -> Self {
        let shotgun_trips = Formation {
            qb: spot(0.0, 0.0),
            receivers: vec![spot(-12.0, 6.0), spot(0.0, 6.0), spot(12.0, 6.0)],
        };

        Self {
            plays: vec![
                PlayCall {
                    family: "Shotgun".into(),
                    name: "Spread Mix".into(),
                    formation: Formation {
                        qb: spot(0.0, 0.0),
                        receivers: vec![
                            spot(-12.0, 6.0),
                            spot(-4.0, 6.0),
                            spot(4.0, 6.0),
                            spot(12.0, 6.0),
                        ],
                    },
                    routes: vec![
                        // go
                        vec![spot(0.0, 20.0), spot(0.0, 60.0)],
                        // slant
                        vec![spot(8.0, 30.0), spot(20.0, 50.0)],
                        // out
                        vec![spot(25.0, 20.0), spot(35.0, 20.0)],
                        // post
                        vec![spot(0.0, 30.0), spot(10.0, 60.0)],
                    ],
                    defense: DefenseCall::Zone(Coverage::Spread),
                },
                PlayCall {
                    family: "Shotgun".into(),
                    name: "Slants".into(),
                    formation: shotgun_trips.clone(),
                    routes: vec![
                        vec![spot(2.0, 5.0), spot(7.0, 25.0)],
                        vec![spot(0.0, 5.0), spot(5.0, 30.0)],
                        vec![spot(-2.0, 5.0), spot(3.0, 27.0)],
                    ],
                    defense: DefenseCall::Zone(Coverage::Cover2),
                },
                PlayCall {
                    family: "Shotgun".into(),
                    name: "Streaks".into(),
                    formation: shotgun_trips,
                    routes: vec![
                        vec![spot(0.0, 55.0)],
                        vec![spot(0.0, 55.0)],
                        vec![spot(0.0, 55.0)],
                    ],
                    defense: DefenseCall::Zone(Coverage::Cover3),
                },
                PlayCall {
                    family: "I-Form".into(),
                    name: "Cross".into(),
                    formation: Formation {
                        qb: spot(0.0, 0.0),
                        receivers: vec![spot(-10.0, 5.0), spot(10.0, 5.0), spot(0.0, 2.0)],
                    },
                    routes: vec![
                        vec![spot(5.0, 10.0), spot(-5.0, 25.0)],
                        vec![spot(-5.0, 10.0), spot(10.0, 25.0)],
                        vec![spot(0.0, 7.0), spot(0.0, 27.0)],
                    ],
                    defense: DefenseCall::Man,
                },
            ],
        }
    }

    /// Parse and validate a playbook from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let book: Playbook = serde_json::from_str(json)?;
        book.validate()?;
        Ok(book)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plays.is_empty() {
            return Err(ConfigError::EmptyPlaybook);
        }
        self.plays.iter().try_for_each(PlayCall::validate)
    }

    /// Look up a play by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&PlayCall> {
        self.index_of(name).map(|i| &self.plays[i])
    }

    /// Index of a play by name (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.plays.iter().position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Plays grouped by family, in book order
    pub fn families(&self) -> Vec<(&str, Vec<&PlayCall>)> {
        let mut groups: Vec<(&str, Vec<&PlayCall>)> = Vec::new();
        for play in &self.plays {
            match groups.iter_mut().find(|(family, _)| *family == play.family) {
                Some((_, plays)) => plays.push(play),
                None => groups.push((play.family.as_str(), vec![play])),
            }
        }
        groups
    }
}

/// Load the playbook from the page's `playbook` JSON block
#[cfg(target_arch = "wasm32")]
pub fn load_from_page() -> Playbook {
    match crate::tuning::page_json("playbook").map(|json| Playbook::from_json(&json)) {
        Some(Ok(book)) => {
            log::info!("Loaded {} plays from page", book.plays.len());
            book
        }
        Some(Err(e)) => {
            log::warn!("Ignoring page playbook: {}", e);
            Playbook::standard()
        }
        None => Playbook::standard(),
    }
}
