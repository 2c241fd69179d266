//! ELO update with dynamic K-factor
//!
//! K = 250 / (matches_played + 5)^0.4, computed per player from its own match
//! count, times 1.1 for Grand Slam matches. Ratings never drop below 1000.

use serde::{Deserialize, Serialize};

use crate::config::RatingConfig;
use crate::models::{Category, ELO_FLOOR};

/// Logistic expected score of `rating` against `opponent`.
pub fn expected_score(rating: f64, opponent: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / scale))
}

pub fn k_factor(matches_played: u32, cfg: &RatingConfig) -> f64 {
    cfg.k_numerator / (matches_played as f64 + cfg.k_offset).powf(cfg.k_exponent)
}

pub fn tournament_modifier(category: Category, cfg: &RatingConfig) -> f64 {
    if category.is_top_tier() {
        cfg.top_tier_modifier
    } else {
        1.0
    }
}

/// Both sides of one rating update. Raw deltas are before flooring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub winner_delta: f64,
    pub loser_delta: f64,
    pub winner_rating: f64,
    pub loser_rating: f64,
}

/// Pure rating computation for a decided match.
pub fn rate_match(
    winner_rating: f64,
    winner_matches: u32,
    loser_rating: f64,
    loser_matches: u32,
    category: Category,
    cfg: &RatingConfig,
) -> RatingChange {
    let modifier = tournament_modifier(category, cfg);
    let k_winner = k_factor(winner_matches, cfg);
    let k_loser = k_factor(loser_matches, cfg);

    let expected_winner = expected_score(winner_rating, loser_rating, cfg.scale);
    let expected_loser = expected_score(loser_rating, winner_rating, cfg.scale);

    let winner_delta = modifier * k_winner * (1.0 - expected_winner);
    let loser_delta = modifier * k_loser * (0.0 - expected_loser);

    RatingChange {
        winner_delta,
        loser_delta,
        winner_rating: (winner_rating + winner_delta).max(ELO_FLOOR),
        loser_rating: (loser_rating + loser_delta).max(ELO_FLOOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        assert!((expected_score(1500.0, 1500.0, 400.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_score_higher_rated() {
        let e = expected_score(1700.0, 1500.0, 400.0);
        assert!(e > 0.7 && e < 0.8);
    }

    #[test]
    fn test_k_factor_decreases_with_experience() {
        let cfg = RatingConfig::default();
        let rookie = k_factor(0, &cfg);
        let veteran = k_factor(500, &cfg);
        assert!((rookie - 250.0 / 5f64.powf(0.4)).abs() < 1e-9);
        assert!(veteran < rookie);
    }

    #[test]
    fn test_equal_players_zero_sum() {
        let cfg = RatingConfig::default();
        let change = rate_match(1600.0, 40, 1600.0, 40, Category::Atp250, &cfg);
        assert!((change.winner_delta + change.loser_delta).abs() < 1e-9);
        assert!(change.winner_delta > 0.0);
    }

    #[test]
    fn test_top_tier_modifier() {
        let cfg = RatingConfig::default();
        let normal = rate_match(1500.0, 10, 1500.0, 10, Category::Masters1000, &cfg);
        let slam = rate_match(1500.0, 10, 1500.0, 10, Category::GrandSlam, &cfg);
        let exhibition = rate_match(1500.0, 10, 1500.0, 10, Category::Special, &cfg);
        assert!((slam.winner_delta / normal.winner_delta - 1.1).abs() < 1e-9);
        assert!((exhibition.winner_delta - normal.winner_delta).abs() < 1e-9);
    }

    #[test]
    fn test_floor_applied() {
        let cfg = RatingConfig::default();
        let change = rate_match(1400.0, 0, 1000.0, 0, Category::Itf, &cfg);
        assert!(change.loser_delta < 0.0);
        assert_eq!(change.loser_rating, ELO_FLOOR);
    }

    #[test]
    fn test_upset_gains_more() {
        let cfg = RatingConfig::default();
        let upset = rate_match(1300.0, 20, 1700.0, 20, Category::Atp500, &cfg);
        let expected = rate_match(1700.0, 20, 1300.0, 20, Category::Atp500, &cfg);
        assert!(upset.winner_delta > expected.winner_delta);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: ratings never fall below the floor
            #[test]
            fn prop_floor_holds(
                winner in 1000.0f64..3000.0,
                loser in 1000.0f64..3000.0,
                wm in 0u32..2000,
                lm in 0u32..2000
            ) {
                let change = rate_match(winner, wm, loser, lm, Category::GrandSlam, &RatingConfig::default());
                prop_assert!(change.winner_rating >= ELO_FLOOR);
                prop_assert!(change.loser_rating >= ELO_FLOOR);
                prop_assert!(change.winner_delta >= 0.0);
            }

            /// Property: same experience means the raw deltas cancel
            #[test]
            fn prop_zero_sum_with_equal_k(
                winner in 1000.0f64..3000.0,
                loser in 1000.0f64..3000.0,
                played in 0u32..2000
            ) {
                let change = rate_match(winner, played, loser, played, Category::Atp250, &RatingConfig::default());
                prop_assert!((change.winner_delta + change.loser_delta).abs() < 1e-9);
            }
        }
    }
}
