//! Director tuning and difficulty presets
//!
//! Every constant the controller uses lives here so a host can ship balance
//! changes as a JSON file. Missing fields fall back to `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Standard,
    Sharp,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Standard => "Standard",
            Difficulty::Sharp => "Sharp",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "standard" | "medium" | "normal" => Some(Difficulty::Standard),
            "sharp" | "hard" => Some(Difficulty::Sharp),
            _ => None,
        }
    }

    /// Seconds between target re-evaluations
    pub fn reaction_delay(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.22,
            Difficulty::Standard => REACTION_DELAY,
            Difficulty::Sharp => 0.08,
        }
    }

    /// (base, max) aim error in pixels
    pub fn aim_error(&self) -> (f32, f32) {
        match self {
            Difficulty::Relaxed => (8.0, 60.0),
            Difficulty::Standard => (AIM_ERROR_BASE, AIM_ERROR_MAX),
            Difficulty::Sharp => (2.0, 20.0),
        }
    }

    /// Filtered-target smoothing rate
    pub fn smoothing_hz(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 6.0,
            Difficulty::Standard => SMOOTHING_HZ,
            Difficulty::Sharp => 12.0,
        }
    }
}

/// Controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorTuning {
    /// Preset the values were derived from (informational)
    pub difficulty: Difficulty,

    // === Timing ===
    pub reaction_delay: f32,
    pub max_dt: f32,

    // === Steering ===
    pub smoothing_hz: f32,
    pub dead_zone_frac_x: f32,
    pub dead_zone_frac_y: f32,
    pub move_range_x: f32,
    pub move_range_y: f32,
    pub response_time: f32,
    pub min_response_blend: f32,
    pub max_response_blend: f32,
    pub ball_row_offset: f32,
    pub vertical_follow: f32,
    pub defend_row_lift: f32,
    pub support_drift: f32,
    /// Keep AI targets inside their own lane
    pub lane_discipline: bool,

    // === Aim error ===
    pub aim_error_base: f32,
    pub aim_error_max: f32,
    pub aim_error_per_pixel: f32,
    pub aim_error_per_speed: f32,
    pub aim_error_ease: f32,

    // === Lane jitter ===
    pub lane_jitter_max: f32,
    pub lane_jitter_decay: f32,

    // === Threat selection ===
    pub min_threat_speed: f32,
    pub away_penalty: f32,
    pub intercept_time_weight: f32,
    pub max_intercept_time: f32,

    // === Attack planning ===
    pub brick_row_weight: f32,
    pub brick_hp_weight: f32,
    pub brick_center_weight: f32,
    pub human_lane_penalty: f32,
    pub human_avoid_radius: f32,
    pub serve_max_slope: f32,
    pub serve_jitter: f32,
    pub retarget_interval: f32,
    pub serve_offset_interval: f32,

    // === Serving ===
    pub serve_delay_min: f32,
    pub serve_delay_max: f32,
    pub release_cooldown: f32,

    // === Overlap ===
    pub overlap_gap: f32,
}

impl Default for DirectorTuning {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Standard,

            reaction_delay: REACTION_DELAY,
            max_dt: MAX_STEER_DT,

            smoothing_hz: SMOOTHING_HZ,
            dead_zone_frac_x: DEAD_ZONE_FRAC_X,
            dead_zone_frac_y: DEAD_ZONE_FRAC_Y,
            move_range_x: MOVE_RANGE_X,
            move_range_y: MOVE_RANGE_Y,
            response_time: RESPONSE_TIME,
            min_response_blend: MIN_RESPONSE_BLEND,
            max_response_blend: MAX_RESPONSE_BLEND,
            ball_row_offset: BALL_ROW_OFFSET,
            vertical_follow: VERTICAL_FOLLOW,
            defend_row_lift: DEFEND_ROW_LIFT,
            support_drift: SUPPORT_DRIFT,
            lane_discipline: true,

            aim_error_base: AIM_ERROR_BASE,
            aim_error_max: AIM_ERROR_MAX,
            aim_error_per_pixel: AIM_ERROR_PER_PIXEL,
            aim_error_per_speed: AIM_ERROR_PER_SPEED,
            aim_error_ease: AIM_ERROR_EASE,

            lane_jitter_max: LANE_JITTER_MAX,
            lane_jitter_decay: LANE_JITTER_DECAY,

            min_threat_speed: MIN_THREAT_SPEED,
            away_penalty: AWAY_PENALTY,
            intercept_time_weight: INTERCEPT_TIME_WEIGHT,
            max_intercept_time: MAX_INTERCEPT_TIME,

            brick_row_weight: BRICK_ROW_WEIGHT,
            brick_hp_weight: BRICK_HP_WEIGHT,
            brick_center_weight: BRICK_CENTER_WEIGHT,
            human_lane_penalty: HUMAN_LANE_PENALTY,
            human_avoid_radius: HUMAN_AVOID_RADIUS,
            serve_max_slope: SERVE_MAX_SLOPE,
            serve_jitter: SERVE_JITTER,
            retarget_interval: RETARGET_INTERVAL,
            serve_offset_interval: SERVE_OFFSET_INTERVAL,

            serve_delay_min: SERVE_DELAY_MIN,
            serve_delay_max: SERVE_DELAY_MAX,
            release_cooldown: RELEASE_COOLDOWN,

            overlap_gap: OVERLAP_GAP,
        }
    }
}

impl DirectorTuning {
    /// Create tuning from a difficulty preset
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.apply_preset(preset);
        tuning
    }

    /// Apply a difficulty preset (updates latency, aim and smoothing)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.reaction_delay = preset.reaction_delay();
        (self.aim_error_base, self.aim_error_max) = preset.aim_error();
        self.smoothing_hz = preset.smoothing_hz();
    }

    /// Parse tuning from JSON; fields not present keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Self::from_json_over(json, &Self::default())
    }

    /// Parse tuning from JSON layered over `base`; fields not present keep
    /// their `base` values
    pub fn from_json_over(json: &str, base: &Self) -> Result<Self, serde_json::Error> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(overrides);
        }
        serde_json::from_value::<Self>(merged).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::load_over(path, Self::default())
    }

    /// Load a JSON file layered over `base`, falling back to `base` on any failure
    pub fn load_over(path: impl AsRef<Path>, base: Self) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json_over(&json, &base) {
                Ok(tuning) => {
                    log::info!("Loaded director tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}; keeping base tuning", path.display(), e);
                    base
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}; keeping base tuning", path.display(), e);
                base
            }
        }
    }

    /// Repair values that would make the controller divide by zero or go NaN
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();

        fn finite_non_negative(value: f32, fallback: f32) -> f32 {
            if value.is_finite() { value.abs() } else { fallback }
        }

        self.reaction_delay = finite_non_negative(self.reaction_delay, d.reaction_delay);
        self.max_dt = finite_non_negative(self.max_dt, d.max_dt).max(1e-4);
        self.smoothing_hz = finite_non_negative(self.smoothing_hz, d.smoothing_hz);
        self.dead_zone_frac_x = finite_non_negative(self.dead_zone_frac_x, d.dead_zone_frac_x);
        self.dead_zone_frac_y = finite_non_negative(self.dead_zone_frac_y, d.dead_zone_frac_y);
        self.move_range_x = finite_non_negative(self.move_range_x, d.move_range_x).max(1.0);
        self.move_range_y = finite_non_negative(self.move_range_y, d.move_range_y).max(1.0);
        self.response_time = finite_non_negative(self.response_time, d.response_time).max(1e-3);
        self.min_response_blend =
            finite_non_negative(self.min_response_blend, d.min_response_blend).min(1.0);
        self.max_response_blend =
            finite_non_negative(self.max_response_blend, d.max_response_blend).min(1.0);
        if self.min_response_blend > self.max_response_blend {
            std::mem::swap(&mut self.min_response_blend, &mut self.max_response_blend);
        }
        self.ball_row_offset = finite_non_negative(self.ball_row_offset, d.ball_row_offset);
        self.vertical_follow =
            finite_non_negative(self.vertical_follow, d.vertical_follow).min(1.0);
        self.defend_row_lift = finite_non_negative(self.defend_row_lift, d.defend_row_lift);
        self.support_drift = finite_non_negative(self.support_drift, d.support_drift).min(1.0);

        self.aim_error_base = finite_non_negative(self.aim_error_base, d.aim_error_base);
        self.aim_error_max = finite_non_negative(self.aim_error_max, d.aim_error_max);
        if self.aim_error_base > self.aim_error_max {
            std::mem::swap(&mut self.aim_error_base, &mut self.aim_error_max);
        }
        self.aim_error_per_pixel =
            finite_non_negative(self.aim_error_per_pixel, d.aim_error_per_pixel);
        self.aim_error_per_speed =
            finite_non_negative(self.aim_error_per_speed, d.aim_error_per_speed);
        self.aim_error_ease = finite_non_negative(self.aim_error_ease, d.aim_error_ease).min(1.0);

        self.lane_jitter_max = finite_non_negative(self.lane_jitter_max, d.lane_jitter_max);
        self.lane_jitter_decay = finite_non_negative(self.lane_jitter_decay, d.lane_jitter_decay);

        self.min_threat_speed = finite_non_negative(self.min_threat_speed, d.min_threat_speed);
        self.away_penalty = finite_non_negative(self.away_penalty, d.away_penalty);
        self.intercept_time_weight =
            finite_non_negative(self.intercept_time_weight, d.intercept_time_weight);
        self.max_intercept_time =
            finite_non_negative(self.max_intercept_time, d.max_intercept_time);

        self.brick_row_weight = finite_non_negative(self.brick_row_weight, d.brick_row_weight);
        self.brick_hp_weight = finite_non_negative(self.brick_hp_weight, d.brick_hp_weight);
        self.brick_center_weight =
            finite_non_negative(self.brick_center_weight, d.brick_center_weight);
        self.human_lane_penalty =
            finite_non_negative(self.human_lane_penalty, d.human_lane_penalty);
        self.human_avoid_radius =
            finite_non_negative(self.human_avoid_radius, d.human_avoid_radius);
        self.serve_max_slope = finite_non_negative(self.serve_max_slope, d.serve_max_slope);
        self.serve_jitter = finite_non_negative(self.serve_jitter, d.serve_jitter);
        self.retarget_interval = finite_non_negative(self.retarget_interval, d.retarget_interval);
        self.serve_offset_interval =
            finite_non_negative(self.serve_offset_interval, d.serve_offset_interval);

        self.serve_delay_min = finite_non_negative(self.serve_delay_min, d.serve_delay_min);
        self.serve_delay_max = finite_non_negative(self.serve_delay_max, d.serve_delay_max);
        if self.serve_delay_min > self.serve_delay_max {
            std::mem::swap(&mut self.serve_delay_min, &mut self.serve_delay_max);
        }
        self.release_cooldown = finite_non_negative(self.release_cooldown, d.release_cooldown);

        self.overlap_gap = finite_non_negative(self.overlap_gap, d.overlap_gap);
        self
    }
}
