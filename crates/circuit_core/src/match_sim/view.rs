//! Per-match effective player view
//!
//! Base skills × surface multiplier × form, floored and clamped to 0..=100.
//! A view is a copy built at the start of a match and dropped at the end;
//! nothing in it is ever written back to the `Player` it came from.

use rand::Rng;

use crate::config::MatchConfig;
use crate::models::{Hand, Player, PlayerId, ShotTendencies, Skill, Skills, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveView {
    pub id: PlayerId,
    pub name: String,
    pub skills: Skills,
    pub hand: Hand,
    pub tendencies: ShotTendencies,
    pub form: f64,
}

impl EffectiveView {
    pub fn new(player: &Player, surface: Surface, form: f64) -> Self {
        let multiplier = player.surface_modifiers.get(surface) * form;
        let mut skills = Skills::default();
        for skill in Skill::ALL {
            let scaled = (player.skills.get(skill) as f64 * multiplier).floor();
            skills.set(skill, scaled.clamp(0.0, 100.0) as u8);
        }
        Self {
            id: player.id,
            name: player.name.clone(),
            skills,
            hand: player.hand,
            tendencies: player.tendencies,
            form,
        }
    }

    /// View with a fresh form draw from the configured range.
    pub fn draw<R: Rng + ?Sized>(
        player: &Player,
        surface: Surface,
        cfg: &MatchConfig,
        rng: &mut R,
    ) -> Self {
        let form = rng.gen_range(cfg.form_min..=cfg.form_max);
        Self::new(player, surface, form)
    }

    pub fn skill(&self, skill: Skill) -> u8 {
        self.skills.get(skill)
    }
}
