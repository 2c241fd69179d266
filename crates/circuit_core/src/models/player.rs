//! Player record
//!
//! The persisted player as the rest of the circuit sees it. Everything a match
//! needs is derived from this record (see `match_sim::view`), never written
//! into it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tournament::{Category, RoundReached, Surface};

pub type PlayerId = u32;

/// Lowest rating a player can fall to.
pub const ELO_FLOOR: f64 = 1000.0;

/// Per-half-season limit for both progression and regression counters.
pub const SKILL_CAP_LIMIT: u8 = 5;

/// Skill attributes, each stored in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Serve,
    Forehand,
    Backhand,
    Speed,
    Stamina,
    Straight,
    Cross,
    Dropshot,
    Volley,
}

impl Skill {
    pub const ALL: [Skill; 9] = [
        Skill::Serve,
        Skill::Forehand,
        Skill::Backhand,
        Skill::Speed,
        Skill::Stamina,
        Skill::Straight,
        Skill::Cross,
        Skill::Dropshot,
        Skill::Volley,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Serve => "serve",
            Skill::Forehand => "forehand",
            Skill::Backhand => "backhand",
            Skill::Speed => "speed",
            Skill::Stamina => "stamina",
            Skill::Straight => "straight",
            Skill::Cross => "cross",
            Skill::Dropshot => "dropshot",
            Skill::Volley => "volley",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skills {
    pub serve: u8,
    pub forehand: u8,
    pub backhand: u8,
    pub speed: u8,
    pub stamina: u8,
    pub straight: u8,
    pub cross: u8,
    pub dropshot: u8,
    pub volley: u8,
}

impl Skills {
    /// Every skill set to the same value (clamped to 100).
    pub fn uniform(value: u8) -> Self {
        let v = value.min(100);
        Self {
            serve: v,
            forehand: v,
            backhand: v,
            speed: v,
            stamina: v,
            straight: v,
            cross: v,
            dropshot: v,
            volley: v,
        }
    }

    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Serve => self.serve,
            Skill::Forehand => self.forehand,
            Skill::Backhand => self.backhand,
            Skill::Speed => self.speed,
            Skill::Stamina => self.stamina,
            Skill::Straight => self.straight,
            Skill::Cross => self.cross,
            Skill::Dropshot => self.dropshot,
            Skill::Volley => self.volley,
        }
    }

    pub fn set(&mut self, skill: Skill, value: u8) {
        let v = value.min(100);
        match skill {
            Skill::Serve => self.serve = v,
            Skill::Forehand => self.forehand = v,
            Skill::Backhand => self.backhand = v,
            Skill::Speed => self.speed = v,
            Skill::Stamina => self.stamina = v,
            Skill::Straight => self.straight = v,
            Skill::Cross => self.cross = v,
            Skill::Dropshot => self.dropshot = v,
            Skill::Volley => self.volley = v,
        }
    }

    pub fn average(&self) -> f64 {
        let total: u32 = Skill::ALL.iter().map(|s| self.get(*s) as u32).sum();
        total as f64 / Skill::ALL.len() as f64
    }

    /// The three highest skills, ties broken by declaration order.
    pub fn dominant(&self) -> [Skill; 3] {
        let mut ordered = Skill::ALL;
        ordered.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        [ordered[0], ordered[1], ordered[2]]
    }
}

/// Progression/regression counters for one skill in the current half-season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillCap {
    pub progcap: u8,
    pub regcap: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceModifiers {
    pub clay: f64,
    pub grass: f64,
    pub hard: f64,
    pub indoor: f64,
}

impl Default for SurfaceModifiers {
    fn default() -> Self {
        Self { clay: 1.0, grass: 1.0, hard: 1.0, indoor: 1.0 }
    }
}

impl SurfaceModifiers {
    pub fn get(&self, surface: Surface) -> f64 {
        match surface {
            Surface::Clay => self.clay,
            Surface::Grass => self.grass,
            Surface::Hard => self.hard,
            Surface::Indoor => self.indoor,
        }
    }
}

/// Shot selection weights, summing to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotTendencies {
    pub cross_tend: u8,
    pub straight_tend: u8,
    pub dropshot_tend: u8,
    pub volley_tend: u8,
}

impl Default for ShotTendencies {
    fn default() -> Self {
        Self { cross_tend: 45, straight_tend: 35, dropshot_tend: 10, volley_tend: 10 }
    }
}

impl ShotTendencies {
    pub fn total(&self) -> u32 {
        self.cross_tend as u32
            + self.straight_tend as u32
            + self.dropshot_tend as u32
            + self.volley_tend as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hand {
    #[default]
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub weeks_remaining: u32,
}

/// One tournament appearance inside the trailing history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tournament: String,
    pub category: Category,
    pub year: u32,
    pub week: u32,
    pub round: RoundReached,
    pub points: u32,
    pub surface: Surface,
}

impl HistoryEntry {
    pub fn same_instance(&self, name: &str, year: u32, week: u32) -> bool {
        self.tournament == name && self.year == year && self.week == week
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentWin {
    pub name: String,
    pub category: Category,
    pub year: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub age: u32,
    pub skills: Skills,
    #[serde(default)]
    pub skill_caps: BTreeMap<Skill, SkillCap>,
    pub potential_factor: f64,
    #[serde(default)]
    pub surface_modifiers: SurfaceModifiers,
    pub elo_rating: f64,
    pub highest_elo: f64,
    pub rank: u32,
    #[serde(default)]
    pub highest_rank: Option<u32>,
    pub points: f64,
    pub matches_played: u32,
    #[serde(default)]
    pub tournament_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub tournament_wins: Vec<TournamentWin>,
    pub archetype_key: [Skill; 3],
    pub bonus: Skill,
    #[serde(default)]
    pub tendencies: ShotTendencies,
    #[serde(default)]
    pub hand: Hand,
    #[serde(default)]
    pub injury: Option<Injury>,
    #[serde(default)]
    pub retired: bool,
}

impl Player {
    /// Fresh entrant with neutral rating. Archetype is derived from `skills`.
    pub fn new(id: PlayerId, name: impl Into<String>, age: u32, skills: Skills) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            skills,
            skill_caps: BTreeMap::new(),
            potential_factor: 1.0,
            surface_modifiers: SurfaceModifiers::default(),
            elo_rating: ELO_FLOOR,
            highest_elo: ELO_FLOOR,
            rank: u32::MAX,
            highest_rank: None,
            points: ELO_FLOOR,
            matches_played: 0,
            tournament_history: Vec::new(),
            tournament_wins: Vec::new(),
            archetype_key: skills.dominant(),
            bonus: Skill::Serve,
            tendencies: ShotTendencies::default(),
            hand: Hand::Right,
            injury: None,
            retired: false,
        }
    }

    pub fn is_injured(&self) -> bool {
        self.injury.map(|i| i.weeks_remaining > 0).unwrap_or(false)
    }

    /// Active and fit enough to enter a draw.
    pub fn is_available(&self) -> bool {
        !self.retired && !self.is_injured()
    }

    pub fn cap(&self, skill: Skill) -> SkillCap {
        self.skill_caps.get(&skill).copied().unwrap_or_default()
    }

    pub fn cap_mut(&mut self, skill: Skill) -> &mut SkillCap {
        self.skill_caps.entry(skill).or_default()
    }

    pub fn reset_skill_caps(&mut self) {
        for cap in self.skill_caps.values_mut() {
            *cap = SkillCap::default();
        }
    }

    pub fn is_archetype_skill(&self, skill: Skill) -> bool {
        self.archetype_key.contains(&skill)
    }

    /// Heals one week. Returns true when the injury cleared this week.
    pub fn heal_week(&mut self) -> bool {
        match self.injury.as_mut() {
            Some(injury) if injury.weeks_remaining > 1 => {
                injury.weeks_remaining -= 1;
                false
            }
            Some(_) => {
                self.injury = None;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_clamps_to_100() {
        let mut skills = Skills::default();
        skills.set(Skill::Serve, 150);
        assert_eq!(skills.get(Skill::Serve), 100);
    }

    #[test]
    fn test_dominant_skills() {
        let mut skills = Skills::uniform(40);
        skills.serve = 90;
        skills.volley = 80;
        skills.speed = 70;
        assert_eq!(skills.dominant(), [Skill::Serve, Skill::Volley, Skill::Speed]);
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new(7, "Test", 18, Skills::uniform(50));
        assert_eq!(player.elo_rating, ELO_FLOOR);
        assert_eq!(player.tendencies.total(), 100);
        assert!(player.is_available());
        assert_eq!(player.cap(Skill::Cross), SkillCap::default());
    }

    #[test]
    fn test_injury_heals() {
        let mut player = Player::new(1, "Hurt", 25, Skills::uniform(50));
        player.injury = Some(Injury { weeks_remaining: 2 });
        assert!(!player.is_available());
        assert!(!player.heal_week());
        assert!(player.heal_week());
        assert!(player.is_available());
    }
}
