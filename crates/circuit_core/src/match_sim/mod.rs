//! # Match Simulator
//!
//! Point-level simulation of one match between two immutable player views.
//! The simulator never touches a `Player`; the scheduler commits ratings and
//! history afterwards from the returned [`MatchResult`].
//!
//! ```rust,ignore
//! let result = simulate_match(&p1, &p2, Surface::Clay, Category::Atp500, &cfg, &mut rng);
//! println!("{} {}", result.winner, result.score);
//! ```

pub mod point;
pub mod rally;
pub mod scoring;
pub mod view;

pub use point::{PointEnd, ShotEvent};
pub use rally::{CatchResult, Direction, Side, Stroke};
pub use scoring::Scoreboard;
pub use view::EffectiveView;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::models::{Category, Player, PlayerId, Surface};
use point::{play_point, PointContext};
use scoring::Transition;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: PlayerId,
    pub loser: PlayerId,
    /// Player1's games first
    pub score: String,
    pub sets: Vec<(u8, u8)>,
    pub points_won: [u32; 2],
    pub log: Vec<String>,
    #[serde(default)]
    pub events: Vec<ShotEvent>,
}

pub fn simulate_match<R: Rng + ?Sized>(
    player1: &Player,
    player2: &Player,
    surface: Surface,
    category: Category,
    cfg: &MatchConfig,
    rng: &mut R,
) -> MatchResult {
    let v1 = EffectiveView::draw(player1, surface, cfg, rng);
    let v2 = EffectiveView::draw(player2, surface, cfg, rng);
    simulate_views(&v1, &v2, category.sets_to_win(), cfg, rng)
}

/// Runs a match between prepared views.
pub fn simulate_views<R: Rng + ?Sized>(
    v1: &EffectiveView,
    v2: &EffectiveView,
    sets_to_win: u8,
    cfg: &MatchConfig,
    rng: &mut R,
) -> MatchResult {
    let views = [v1, v2];
    let mut board = Scoreboard::new(sets_to_win, cfg.deuce_limit);
    let mut log = Vec::new();
    let mut events = Vec::new();
    let mut points_won = [0u32; 2];
    let mut server = if rng.gen_bool(0.5) { 0 } else { 1 };
    let mut point_no = 0u32;

    let winner = loop {
        let receiver = 1 - server;
        let ctx = PointContext {
            set: board.current_set(),
            point: point_no,
            court: if point_no % 2 == 0 { Side::Right } else { Side::Left },
        };
        let recorder = if cfg.record_events { Some(&mut events) } else { None };
        let result = play_point(views[server], views[receiver], &ctx, cfg, rng, recorder);
        let scorer = if result.server_won { server } else { receiver };
        points_won[scorer] += 1;
        point_no += 1;

        let set_number = board.current_set();
        match board.point_won(scorer) {
            Transition::None => {}
            Transition::Game { winner } => {
                let games = board.games();
                log.push(format!(
                    "Game {}: set {} {}-{}",
                    views[winner].name, set_number, games[0], games[1]
                ));
            }
            Transition::Set { winner } => {
                log.push(set_line(&board, views[winner], set_number));
            }
            Transition::Match { winner } => {
                log.push(set_line(&board, views[winner], set_number));
                break winner;
            }
        }
        server = receiver;
    };

    let loser = 1 - winner;
    let score = board.score_string();
    log.push(format!("{} def. {} {}", views[winner].name, views[loser].name, score));
    log::debug!(
        "match {} vs {}: {} won {} in {} points",
        v1.name,
        v2.name,
        views[winner].name,
        score,
        point_no
    );

    MatchResult {
        winner: views[winner].id,
        loser: views[loser].id,
        score,
        sets: board.completed_sets().to_vec(),
        points_won,
        log,
        events,
    }
}

fn set_line(board: &Scoreboard, winner: &EffectiveView, set_number: usize) -> String {
    let (g1, g2) = board.completed_sets().last().copied().unwrap_or((0, 0));
    let sets = board.sets_won();
    format!(
        "Set {} to {} {}-{} (sets {}-{})",
        set_number, winner.name, g1, g2, sets[0], sets[1]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skills;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(id: PlayerId, level: u8) -> Player {
        Player::new(id, format!("Player {}", id), 24, Skills::uniform(level))
    }

    #[test]
    fn test_strong_beats_zero_skill() {
        let strong = player(1, 100);
        let weak = player(2, 0);
        let cfg = MatchConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trials = 200;
        let wins = (0..trials)
            .filter(|_| {
                simulate_match(&strong, &weak, Surface::Hard, Category::Atp250, &cfg, &mut rng)
                    .winner
                    == 1
            })
            .count();
        assert!(wins as f64 / trials as f64 >= 0.95, "strong won {}/{}", wins, trials);
    }

    #[test]
    fn test_score_string_matches_sets() {
        let cfg = MatchConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let p1 = player(1, 60);
        let p2 = player(2, 65);
        for _ in 0..20 {
            let result = simulate_match(&p1, &p2, Surface::Clay, Category::GrandSlam, &cfg, &mut rng);
            let won = result
                .sets
                .iter()
                .filter(|(a, b)| if result.winner == 1 { a > b } else { b > a })
                .count();
            assert_eq!(won, 3);
            assert!(result.sets.len() >= 3 && result.sets.len() <= 5);
            let expected: Vec<String> = result.sets.iter().map(|(a, b)| format!("{}-{}", a, b)).collect();
            assert_eq!(result.score, expected.join(", "));
            assert_ne!(result.winner, result.loser);
        }
    }

    #[test]
    fn test_best_of_three_outside_top_tiers() {
        let cfg = MatchConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let result = simulate_match(&player(1, 50), &player(2, 50), Surface::Grass, Category::Itf, &cfg, &mut rng);
        assert!(result.sets.len() == 2 || result.sets.len() == 3);
    }

    #[test]
    fn test_log_ends_with_summary_line() {
        let cfg = MatchConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let result = simulate_match(&player(1, 70), &player(2, 40), Surface::Indoor, Category::Atp500, &cfg, &mut rng);
        let last = result.log.last().unwrap();
        assert!(last.contains(" def. "));
        assert!(last.ends_with(&result.score));
        assert!(result.log.iter().any(|l| l.starts_with("Set 1 to")));
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_zero_skill_match_terminates() {
        let cfg = MatchConfig { max_rally_shots: 20, ..MatchConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let result = simulate_match(&player(1, 0), &player(2, 0), Surface::Hard, Category::Itf, &cfg, &mut rng);
        assert!(!result.score.is_empty());
    }

    #[test]
    fn test_players_untouched_and_events_optional() {
        let p1 = player(1, 55);
        let p2 = player(2, 58);
        let before = (p1.clone(), p2.clone());
        let cfg = MatchConfig { record_events: true, ..MatchConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let result = simulate_match(&p1, &p2, Surface::Hard, Category::Atp250, &cfg, &mut rng);
        assert!(!result.events.is_empty());
        assert_eq!(p1.skills, before.0.skills);
        assert_eq!(p2.elo_rating, before.1.elo_rating);
        assert_eq!(p1.matches_played, 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let cfg = MatchConfig::default();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            simulate_match(&player(1, 50), &player(2, 52), Surface::Clay, Category::Atp250, &cfg, &mut rng).score
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_players_holding_every_serve_still_finish() {
        let mut ace = player(1, 100);
        ace.skills.speed = 0;
        let mut other = ace.clone();
        other.id = 2;
        let cfg = MatchConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let result = simulate_match(&ace, &other, Surface::Grass, Category::GrandSlam, &cfg, &mut rng);
        assert!(result.sets.len() >= 3 && result.sets.len() <= 5);
        assert!(result.sets.iter().all(|&(a, b)| a.max(b) >= 6 && a.max(b) <= 7));
    }

    #[test]
    fn test_generated_players_always_finish() {
        use crate::generator::{PlayerGenerator, RandomPlayerGenerator};

        let generator = RandomPlayerGenerator::default();
        let cfg = MatchConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(16);
        for pair in 0..40 {
            let p1 = generator.generate(2 * pair + 1, &mut rng);
            let p2 = generator.generate(2 * pair + 2, &mut rng);
            let result = simulate_match(&p1, &p2, Surface::Hard, Category::GrandSlam, &cfg, &mut rng);
            assert!([p1.id, p2.id].contains(&result.winner));
            assert!(result.log.last().map_or(false, |l| l.contains(" def. ")));
        }
    }
}
