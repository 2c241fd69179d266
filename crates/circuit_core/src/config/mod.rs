//! # Circuit Configuration
//!
//! All tuning constants in one place. The points and participation tables
//! live in `data/` as YAML and are loaded through `crate::data`.
//!
//! ```rust
//! use circuit_core::config::CircuitConfig;
//!
//! let config = CircuitConfig::default();
//! let quiet = CircuitConfig::without_injuries();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};

/// Point-level match engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Per-match form factor range (default 0.9..=1.1)
    pub form_min: f64,
    pub form_max: f64,
    /// Serve power multiplier range (default 0.5..=1.3)
    pub serve_power_min: f64,
    pub serve_power_max: f64,
    /// catch_score above this is a miss (default 1.2)
    pub miss_threshold: f64,
    /// catch_score above this (and not a miss) is a weak return (default 1.0)
    pub weak_threshold: f64,
    /// Power multiplier carried after a weak return (default 0.9)
    pub weak_return_multiplier: f64,
    /// Stamina cost of a catch is round(opponent_power / divisor) (default 3)
    pub stamina_cost_divisor: f64,
    /// Rally length bound; the player due to hit at the bound loses the point
    pub max_rally_shots: u32,
    /// Deuces played before the next point decides the game (default 3, at most 50)
    pub deuce_limit: u8,
    /// Record point-level events for presentation
    pub record_events: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            form_min: 0.9,
            form_max: 1.1,
            serve_power_min: 0.5,
            serve_power_max: 1.3,
            miss_threshold: 1.2,
            weak_threshold: 1.0,
            weak_return_multiplier: 0.9,
            stamina_cost_divisor: 3.0,
            max_rally_shots: 120,
            deuce_limit: 3,
            record_events: false,
        }
    }
}

/// ELO parameters. K = k_numerator / (matches_played + k_offset)^k_exponent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub k_numerator: f64,
    pub k_offset: f64,
    pub k_exponent: f64,
    pub scale: f64,
    pub top_tier_modifier: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_numerator: 250.0,
            k_offset: 5.0,
            k_exponent: 0.4,
            scale: 400.0,
            top_tier_modifier: 1.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopmentConfig {
    /// Weeks at which progression/regression caps go back to 0
    pub cap_reset_weeks: [u32; 2],
    /// Progression only below this age
    pub progression_age_limit: u32,
    /// Development stops at this age
    pub max_age: u32,
    pub regression_start_age: u32,
    pub regression_span_years: f64,
    /// Weekly chances are divided by this
    pub weekly_divisor: f64,
    pub bonus_multiplier: f64,
    pub archetype_multiplier: f64,
}

impl Default for DevelopmentConfig {
    fn default() -> Self {
        Self {
            cap_reset_weeks: [1, 27],
            progression_age_limit: 28,
            max_age: 40,
            regression_start_age: 30,
            regression_span_years: 7.0,
            weekly_divisor: 12.0,
            bonus_multiplier: 1.1,
            archetype_multiplier: 1.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementConfig {
    pub forced_age: u32,
    /// Players older than this retire when ranked worse than `veteran_rank_cutoff`
    pub veteran_age: u32,
    pub veteran_rank_cutoff: u32,
    pub stochastic_age: u32,
    /// Retirement chance per year above `stochastic_age`
    pub stochastic_rate_per_year: f64,
}

impl Default for RetirementConfig {
    fn default() -> Self {
        Self {
            forced_age: 40,
            veteran_age: 32,
            veteran_rank_cutoff: 128,
            stochastic_age: 35,
            stochastic_rate_per_year: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryConfig {
    pub chance_per_match: f64,
    pub min_weeks: u32,
    pub max_weeks: u32,
}

impl Default for InjuryConfig {
    fn default() -> Self {
        Self { chance_per_match: 0.004, min_weeks: 1, max_weeks: 6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    pub weeks_per_season: u32,
    /// Tournament history entries at least this many weeks old are dropped
    pub history_window_weeks: u32,
    /// Roster is topped up to this size at each season boundary
    pub target_roster_size: usize,
    /// Oldest age that still counts as "next gen" (under 20)
    pub next_gen_max_age: u32,
    pub matches: MatchConfig,
    pub rating: RatingConfig,
    pub development: DevelopmentConfig,
    pub retirement: RetirementConfig,
    pub injuries: InjuryConfig,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            weeks_per_season: 52,
            history_window_weeks: 52,
            target_roster_size: 300,
            next_gen_max_age: 19,
            matches: MatchConfig::default(),
            rating: RatingConfig::default(),
            development: DevelopmentConfig::default(),
            retirement: RetirementConfig::default(),
            injuries: InjuryConfig::default(),
        }
    }
}

impl CircuitConfig {
    /// Injuries disabled, so every draw sees the full roster.
    pub fn without_injuries() -> Self {
        let mut cfg = Self::default();
        cfg.injuries.chance_per_match = 0.0;
        cfg
    }

    /// Point-level events recorded for every match.
    pub fn with_events() -> Self {
        let mut cfg = Self::default();
        cfg.matches.record_events = true;
        cfg
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|e| CircuitError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.matches;
        if m.form_min <= 0.0 || m.form_min > m.form_max {
            return Err(CircuitError::InvalidConfig(format!(
                "form range {}..={} is empty or non-positive",
                m.form_min, m.form_max
            )));
        }
        if m.serve_power_min <= 0.0 || m.serve_power_min > m.serve_power_max {
            return Err(CircuitError::InvalidConfig(format!(
                "serve power range {}..={} is empty or non-positive",
                m.serve_power_min, m.serve_power_max
            )));
        }
        if m.max_rally_shots == 0 {
            return Err(CircuitError::InvalidConfig("max_rally_shots must be > 0".into()));
        }
        if m.deuce_limit > 50 {
            return Err(CircuitError::InvalidConfig(format!(
                "deuce_limit {} is above 50",
                m.deuce_limit
            )));
        }
        if m.stamina_cost_divisor <= 0.0 {
            return Err(CircuitError::InvalidConfig("stamina_cost_divisor must be > 0".into()));
        }
        if self.weeks_per_season == 0 {
            return Err(CircuitError::InvalidConfig("weeks_per_season must be > 0".into()));
        }
        if self.injuries.min_weeks == 0 || self.injuries.min_weeks > self.injuries.max_weeks {
            return Err(CircuitError::InvalidConfig(format!(
                "injury duration {}..={} is invalid",
                self.injuries.min_weeks, self.injuries.max_weeks
            )));
        }
        if !(0.0..=1.0).contains(&self.injuries.chance_per_match) {
            return Err(CircuitError::InvalidConfig("injury chance must be in 0..=1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = CircuitConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.development.cap_reset_weeks, [1, 27]);
        assert!((cfg.rating.k_numerator - 250.0).abs() < f64::EPSILON);
        assert!(!cfg.matches.record_events);
    }

    #[test]
    fn test_unbounded_deuce_rejected() {
        let mut cfg = CircuitConfig::default();
        cfg.matches.deuce_limit = 200;
        assert!(cfg.validate().is_err());
        cfg.matches.deuce_limit = 0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(CircuitConfig::without_injuries().injuries.chance_per_match, 0.0);
        assert!(CircuitConfig::with_events().matches.record_events);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let cfg = CircuitConfig::from_yaml_str("target_roster_size: 128\nmatches:\n  max_rally_shots: 50\n")
            .unwrap();
        assert_eq!(cfg.target_roster_size, 128);
        assert_eq!(cfg.matches.max_rally_shots, 50);
        assert!((cfg.matches.form_max - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_form_range_rejected() {
        let mut cfg = CircuitConfig::default();
        cfg.matches.form_min = 1.2;
        assert!(matches!(cfg.validate(), Err(CircuitError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_serialization() {
        let cfg = CircuitConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = CircuitConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.target_roster_size, cfg.target_roster_size);
    }
}
