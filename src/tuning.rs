//! Game balance and field dimensions
//!
//! Distances are in yards unless the name says otherwise; the simulation works
//! in world units (`yards * yard_scale`). Loaded from inline JSON on the web
//! page when present, defaults otherwise.

use serde::{Deserialize, Serialize};

use crate::consts::END_ZONE_YARDS;
use crate::error::ConfigError;

/// Tunable constants for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    /// Field length including both end zones (yards)
    pub field_length: f32,
    /// Field width (yards)
    pub field_width: f32,
    /// World units per yard
    pub yard_scale: f32,

    // === Passing ===
    /// Vertical acceleration on the ball (world units/s², negative is down)
    pub gravity: f32,
    /// Pass speed along the ground (yards/s)
    pub pass_speed: f32,
    /// Arc peak height (yards)
    pub pass_height: f32,
    /// Shortest allowed flight time (seconds)
    pub min_travel_time: f32,
    /// Ball below this height is on the ground (world units)
    pub ground_threshold: f32,
    /// Ball must be below this height to count in the end zone (world units)
    pub end_zone_ceiling: f32,

    // === Players ===
    pub qb_speed: f32,
    pub route_speed: f32,
    pub defender_speed: f32,
    /// How far ahead of a receiver defenders aim (yards)
    pub lead_distance: f32,
    /// Fraction of full speed defenders actually close at
    pub pursuit_damping: f32,
    /// Per-frame blend toward the route point (1.0 = snap)
    pub route_smoothing: f32,

    // === Outcomes ===
    pub interception_base: f32,
    pub interception_jitter: f32,
    /// Defender-to-ball distance that allows a pick attempt (yards)
    pub interception_radius: f32,
    /// Receiver-to-ball distance that allows a catch (yards)
    pub catch_radius: f32,
    /// Defender-to-receiver distance that contests a catch (yards)
    pub contest_radius: f32,

    // === Clock ===
    /// Delay before the field resets after a catch or pick (seconds)
    pub reset_delay: f32,
    pub incomplete_reset_delay: f32,
    pub touchdown_reset_delay: f32,
    /// Longest frame the simulation will take in one step (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_length: 160.0,
            field_width: 53.3,
            yard_scale: 4.0,

            gravity: -30.0,
            pass_speed: 85.0,
            pass_height: 8.0,
            min_travel_time: 0.5,
            ground_threshold: 0.8,
            end_zone_ceiling: 6.0,

            qb_speed: 10.0,
            route_speed: 8.0,
            defender_speed: 9.0,
            lead_distance: 12.0,
            pursuit_damping: 0.8,
            route_smoothing: 0.12,

            interception_base: 0.35,
            interception_jitter: 0.2,
            interception_radius: 3.0,
            catch_radius: 3.0,
            contest_radius: 4.0,

            reset_delay: 1.5,
            incomplete_reset_delay: 0.8,
            touchdown_reset_delay: 1.4,
            max_frame_dt: 0.04,
        }
    }
}

impl Tuning {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_length", self.field_length),
            ("field_width", self.field_width),
            ("yard_scale", self.yard_scale),
            ("pass_speed", self.pass_speed),
            ("min_travel_time", self.min_travel_time),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        if self.field_length <= 2.0 * END_ZONE_YARDS {
            return Err(ConfigError::Invalid {
                field: "field_length",
                reason: "no room between the end zones".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.interception_base) {
            return Err(ConfigError::Invalid {
                field: "interception_base",
                reason: format!("must be a probability, got {}", self.interception_base),
            });
        }

        if !(0.0..=1.0).contains(&self.route_smoothing) || self.route_smoothing == 0.0 {
            return Err(ConfigError::Invalid {
                field: "route_smoothing",
                reason: "must be in (0, 1]".to_string(),
            });
        }

        Ok(())
    }

    /// Convert yards to world units
    #[inline]
    pub fn yards(&self, yards: f32) -> f32 {
        yards * self.yard_scale
    }

    /// Half the field length in world units (distance from midfield to an end line)
    pub fn half_length(&self) -> f32 {
        self.yards(self.field_length) / 2.0
    }

    /// Half the field width in world units
    pub fn half_width(&self) -> f32 {
        self.yards(self.field_width) / 2.0
    }

    /// Distance from midfield to either goal line (world units)
    pub fn goal_line(&self) -> f32 {
        self.half_length() - self.yards(END_ZONE_YARDS)
    }

    /// Ball launch parameters in world units
    pub fn pass_params(&self) -> PassParams {
        PassParams {
            pass_speed: self.yards(self.pass_speed),
            peak_height: self.yards(self.pass_height),
            min_travel_time: self.min_travel_time,
        }
    }
}

/// Inputs to the launch solve, all in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassParams {
    pub pass_speed: f32,
    pub peak_height: f32,
    pub min_travel_time: f32,
}

/// Text of an inline `<script type="application/json" id=...>` block, if non-empty
#[cfg(target_arch = "wasm32")]
pub(crate) fn page_json(id: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.text_content())
        .filter(|json| !json.trim().is_empty())
}

/// Load tuning from the page's `tuning` JSON block
#[cfg(target_arch = "wasm32")]
pub fn load_from_page() -> Tuning {
    match page_json("tuning").map(|json| Tuning::from_json(&json)) {
        Some(Ok(tuning)) => {
            log::info!("Loaded tuning from page");
            tuning
        }
        Some(Err(e)) => {
            log::warn!("Ignoring page tuning: {}", e);
            Tuning::default()
        }
        None => {
            log::info!("Using default tuning");
            Tuning::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_goal_line_defaults() {
        let t = Tuning::default();
        // 160 yards * 4 / 2 - 10 yards * 4
        assert!((t.goal_line() - 280.0).abs() < 1e-4);
        assert!((t.half_width() - 106.6).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "pass_speed": 40.0, "gravity": -12.0 }"#).unwrap();
        assert_eq!(t.pass_speed, 40.0);
        assert_eq!(t.gravity, -12.0);
        assert_eq!(t.route_speed, 8.0);
        assert_eq!(t.max_frame_dt, 0.04);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "interception_base": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "interception_base",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_pass_speed() {
        let err = Tuning::from_json(r#"{ "pass_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pass_speed", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ pass_speed"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_pass_params_scaled() {
        let p = Tuning::default().pass_params();
        assert_eq!(p.pass_speed, 340.0);
        assert_eq!(p.peak_height, 32.0);
        assert_eq!(p.min_travel_time, 0.5);
    }
}
