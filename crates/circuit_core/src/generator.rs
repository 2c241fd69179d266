//! Player generation
//!
//! The circuit only asks for new entrants through [`PlayerGenerator`]; names,
//! nationalities and the like belong to whoever implements it. The bundled
//! [`RandomPlayerGenerator`] is enough for roster top-ups and the fallback
//! dataset.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::models::{Hand, Player, PlayerId, ShotTendencies, Skill, Skills, SurfaceModifiers};

pub trait PlayerGenerator: Send + Sync {
    /// Builds a fresh, unranked entrant with the given id.
    fn generate(&self, id: PlayerId, rng: &mut dyn RngCore) -> Player;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomPlayerGenerator {
    pub min_age: u32,
    pub max_age: u32,
    pub min_skill: u8,
    pub max_skill: u8,
    pub min_potential: f64,
    pub max_potential: f64,
    /// Spread of each surface multiplier around 1.0
    pub surface_spread: f64,
    pub left_handed_chance: f64,
}

impl Default for RandomPlayerGenerator {
    fn default() -> Self {
        Self {
            min_age: 16,
            max_age: 19,
            min_skill: 15,
            max_skill: 55,
            min_potential: 0.7,
            max_potential: 1.4,
            surface_spread: 0.1,
            left_handed_chance: 0.15,
        }
    }
}

impl PlayerGenerator for RandomPlayerGenerator {
    fn generate(&self, id: PlayerId, rng: &mut dyn RngCore) -> Player {
        let mut skills = Skills::default();
        let (lo, hi) = (self.min_skill.min(self.max_skill), self.max_skill.max(self.min_skill));
        for skill in Skill::ALL {
            skills.set(skill, rng.gen_range(lo..=hi));
        }

        let age = rng.gen_range(self.min_age.min(self.max_age)..=self.max_age.max(self.min_age));
        let mut player = Player::new(id, format!("Player {}", id), age, skills);
        player.bonus = Skill::ALL[rng.gen_range(0..Skill::ALL.len())];
        player.potential_factor = rng.gen_range(self.min_potential..=self.max_potential);
        player.tendencies = random_tendencies(rng);
        player.hand = if rng.gen_bool(self.left_handed_chance.clamp(0.0, 1.0)) {
            Hand::Left
        } else {
            Hand::Right
        };
        let spread = self.surface_spread.abs();
        let mut surface = || 1.0 + rng.gen_range(-spread..=spread);
        player.surface_modifiers = SurfaceModifiers {
            clay: surface(),
            grass: surface(),
            hard: surface(),
            indoor: surface(),
        };
        player
    }
}

/// Four weights summing to exactly 100.
pub fn random_tendencies<R: Rng + ?Sized>(rng: &mut R) -> ShotTendencies {
    let raw: [u32; 4] = [
        rng.gen_range(30..=60),
        rng.gen_range(20..=45),
        rng.gen_range(2..=15),
        rng.gen_range(2..=15),
    ];
    let total: u32 = raw.iter().sum();
    let mut scaled = raw.map(|w| w * 100 / total);
    let assigned: u32 = scaled.iter().sum();
    scaled[0] += 100 - assigned;
    ShotTendencies {
        cross_tend: scaled[0] as u8,
        straight_tend: scaled[1] as u8,
        dropshot_tend: scaled[2] as u8,
        volley_tend: scaled[3] as u8,
    }
}

/// `count` players with consecutive ids starting at `first_id`.
pub fn generate_roster(
    generator: &dyn PlayerGenerator,
    first_id: PlayerId,
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<Player> {
    (0..count as PlayerId).map(|offset| generator.generate(first_id + offset, rng)).collect()
}
