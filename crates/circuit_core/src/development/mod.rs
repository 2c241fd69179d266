//! Player Development Model
//!
//! Weekly stochastic skill progression and regression.
//!
//! | Age      | Branch       | Weekly chance per skill                                   |
//! |----------|--------------|-----------------------------------------------------------|
//! | < 28     | progression  | age_factor × difficulty(value) × potential / 12 (× bonus) |
//! | 28 .. 40 | regression   | clamp((age − 30) / 7, 0, 1) / 12                          |
//! | ≥ 40     | none         | -                                                         |
//!
//! Each skill can move at most 5 times per direction per half-season.

pub mod retirement;

pub use retirement::{retirement_reason, RetirementReason};

use rand::Rng;

use crate::config::DevelopmentConfig;
use crate::models::{Player, Skill, SKILL_CAP_LIMIT};
use crate::state::Roster;

/// Step function of age, peaking at 1.3 for 20 and under.
pub fn age_factor(age: u32) -> f64 {
    match age {
        0..=20 => 1.3,
        21..=22 => 1.15,
        23..=24 => 1.0,
        25..=26 => 0.75,
        27..=28 => 0.5,
        _ => 0.0,
    }
}

/// Higher skills are harder to raise.
pub fn skill_difficulty_factor(value: u8) -> f64 {
    (1.15 * (-0.045 * (value as f64 - 25.0)).exp()).clamp(0.01, 1.0)
}

pub fn progression_chance(player: &Player, skill: Skill, cfg: &DevelopmentConfig) -> f64 {
    let value = player.skills.get(skill);
    let mut chance = age_factor(player.age) * skill_difficulty_factor(value) * player.potential_factor
        / cfg.weekly_divisor;
    if player.bonus == skill {
        chance *= cfg.bonus_multiplier;
    }
    if player.is_archetype_skill(skill) {
        chance *= cfg.archetype_multiplier;
    }
    chance.clamp(0.0, 1.0)
}

/// Zero until past `regression_start_age`.
pub fn regression_chance(age: u32, cfg: &DevelopmentConfig) -> f64 {
    if age <= cfg.regression_start_age {
        return 0.0;
    }
    let years = (age - cfg.regression_start_age) as f64;
    (years / cfg.regression_span_years).clamp(0.0, 1.0) / cfg.weekly_divisor
}

pub fn is_cap_reset_week(week: u32, cfg: &DevelopmentConfig) -> bool {
    cfg.cap_reset_weeks.contains(&week)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillDelta {
    pub gains: u32,
    pub losses: u32,
}

impl std::ops::AddAssign for SkillDelta {
    fn add_assign(&mut self, other: Self) {
        self.gains += other.gains;
        self.losses += other.losses;
    }
}

/// One week of development for one player.
pub fn develop_player<R: Rng + ?Sized>(
    player: &mut Player,
    cfg: &DevelopmentConfig,
    rng: &mut R,
) -> SkillDelta {
    let mut delta = SkillDelta::default();
    if player.retired || player.age >= cfg.max_age {
        return delta;
    }

    for skill in Skill::ALL {
        let cap = player.cap(skill);
        if player.age < cfg.progression_age_limit {
            if cap.progcap >= SKILL_CAP_LIMIT {
                continue;
            }
            let chance = progression_chance(player, skill, cfg);
            if rng.gen::<f64>() < chance {
                let value = player.skills.get(skill);
                if value < 100 {
                    player.skills.set(skill, value + 1);
                    delta.gains += 1;
                }
                player.cap_mut(skill).progcap += 1;
            }
        } else {
            if cap.regcap >= SKILL_CAP_LIMIT {
                continue;
            }
            let chance = regression_chance(player.age, cfg);
            if chance > 0.0 && rng.gen::<f64>() < chance {
                let value = player.skills.get(skill);
                if value > 0 {
                    player.skills.set(skill, value - 1);
                    delta.losses += 1;
                }
                player.cap_mut(skill).regcap += 1;
            }
        }
    }
    delta
}

/// Weekly pass over the roster; resets caps first on checkpoint weeks.
pub fn weekly_development<R: Rng + ?Sized>(
    roster: &mut Roster,
    week: u32,
    cfg: &DevelopmentConfig,
    rng: &mut R,
) -> SkillDelta {
    let reset = is_cap_reset_week(week, cfg);
    let mut total = SkillDelta::default();
    for player in roster.iter_mut().filter(|p| !p.retired) {
        if reset {
            player.reset_skill_caps();
        }
        total += develop_player(player, cfg, rng);
    }
    if reset {
        log::debug!("Skill caps reset at week {}", week);
    }
    total
}
