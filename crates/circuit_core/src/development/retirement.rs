//! Career end
//!
//! Checked once per season after players age:
//! - forced at `forced_age` (40)
//! - older than `veteran_age` (32) and ranked worse than `veteran_rank_cutoff` (128)
//! - 20% per year above `stochastic_age` (35)

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RetirementConfig;
use crate::models::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetirementReason {
    Age,
    Ranking,
    Choice,
}

pub fn retirement_reason<R: Rng + ?Sized>(
    player: &Player,
    cfg: &RetirementConfig,
    rng: &mut R,
) -> Option<RetirementReason> {
    if player.retired {
        return None;
    }
    if player.age >= cfg.forced_age {
        return Some(RetirementReason::Age);
    }
    if player.age > cfg.veteran_age && player.rank > cfg.veteran_rank_cutoff {
        return Some(RetirementReason::Ranking);
    }
    if player.age > cfg.stochastic_age {
        let years = (player.age - cfg.stochastic_age) as f64;
        let chance = (years * cfg.stochastic_rate_per_year).clamp(0.0, 1.0);
        if rng.gen_bool(chance) {
            return Some(RetirementReason::Choice);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skills;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(age: u32, rank: u32) -> Player {
        let mut p = Player::new(1, "P", age, Skills::uniform(50));
        p.rank = rank;
        p
    }

    #[test]
    fn test_forced_and_ranking_rules() {
        let cfg = RetirementConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(retirement_reason(&player(40, 1), &cfg, &mut rng), Some(RetirementReason::Age));
        assert_eq!(
            retirement_reason(&player(33, 129), &cfg, &mut rng),
            Some(RetirementReason::Ranking)
        );
        assert_eq!(retirement_reason(&player(32, 500), &cfg, &mut rng), None);
        assert_eq!(retirement_reason(&player(33, 128), &cfg, &mut rng), None);
    }

    #[test]
    fn test_young_players_never_retire() {
        let cfg = RetirementConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1000 {
            assert_eq!(retirement_reason(&player(25, 900), &cfg, &mut rng), None);
        }
    }

    #[test]
    fn test_stochastic_rate_grows_with_age() {
        let cfg = RetirementConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let trials = 4000;
        let at_36 = (0..trials)
            .filter(|_| retirement_reason(&player(36, 10), &cfg, &mut rng).is_some())
            .count();
        let at_39 = (0..trials)
            .filter(|_| retirement_reason(&player(39, 10), &cfg, &mut rng).is_some())
            .count();
        let rate_36 = at_36 as f64 / trials as f64;
        let rate_39 = at_39 as f64 / trials as f64;
        assert!((rate_36 - 0.2).abs() < 0.05, "rate at 36 was {}", rate_36);
        assert!((rate_39 - 0.8).abs() < 0.05, "rate at 39 was {}", rate_39);
    }
}
