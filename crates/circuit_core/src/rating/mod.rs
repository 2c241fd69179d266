//! Rating System
//!
//! - `elo`: expected score, dynamic K-factor, floored update
//! - `points`: championship points and trailing-window cleanup
//! - `ranking`: combined rank over the active roster

pub mod elo;
pub mod points;
pub mod ranking;

pub use elo::{expected_score, k_factor, rate_match, tournament_modifier, RatingChange};
pub use points::{absolute_week, championship_points, prune_history};
pub use ranking::{compute_rankings, update_rankings, RankingRow};

use crate::config::RatingConfig;
use crate::data::PointsTable;
use crate::models::{Category, Player};

/// Computes and commits one match's rating update to both players.
///
/// Only `elo_rating`, `matches_played` and `highest_elo` are written.
pub fn apply_match_rating(
    winner: &mut Player,
    loser: &mut Player,
    category: Category,
    cfg: &RatingConfig,
    table: &PointsTable,
) -> RatingChange {
    let change = rate_match(
        winner.elo_rating,
        winner.matches_played,
        loser.elo_rating,
        loser.matches_played,
        category,
        cfg,
    );
    commit_rating(winner, change.winner_rating, table);
    commit_rating(loser, change.loser_rating, table);
    change
}

fn commit_rating(player: &mut Player, rating: f64, table: &PointsTable) {
    player.elo_rating = rating;
    player.matches_played += 1;
    let combined = rating + championship_points(player, table) as f64;
    if combined > player.highest_elo {
        player.highest_elo = combined;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_points_table;
    use crate::models::{Skills, ELO_FLOOR};

    #[test]
    fn test_apply_updates_persisted_fields() {
        let mut a = Player::new(1, "A", 22, Skills::uniform(60));
        let mut b = Player::new(2, "B", 22, Skills::uniform(60));
        a.elo_rating = 1500.0;
        b.elo_rating = 1500.0;
        let change = apply_match_rating(
            &mut a,
            &mut b,
            Category::Atp250,
            &RatingConfig::default(),
            default_points_table(),
        );
        assert_eq!(a.matches_played, 1);
        assert_eq!(b.matches_played, 1);
        assert!(a.elo_rating > 1500.0);
        assert!(b.elo_rating < 1500.0);
        assert!((a.elo_rating - 1500.0 + (b.elo_rating - 1500.0)).abs() < 1e-9);
        assert!((a.highest_elo - a.elo_rating).abs() < 1e-9);
        assert!(change.winner_delta > 0.0);
    }

    #[test]
    fn test_rating_never_below_floor() {
        let cfg = RatingConfig::default();
        let table = default_points_table();
        let mut strong = Player::new(1, "Strong", 25, Skills::uniform(90));
        let mut weak = Player::new(2, "Weak", 25, Skills::uniform(10));
        for _ in 0..200 {
            apply_match_rating(&mut strong, &mut weak, Category::Itf, &cfg, table);
            assert!(weak.elo_rating >= ELO_FLOOR);
        }
        for _ in 0..50 {
            apply_match_rating(&mut weak, &mut strong, Category::Special, &cfg, table);
            assert!(strong.elo_rating >= ELO_FLOOR);
        }
    }
}
