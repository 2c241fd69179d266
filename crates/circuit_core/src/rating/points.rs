//! Championship points over the trailing history window

use crate::data::PointsTable;
use crate::models::Player;

/// Sum of table points over the player's history. The history only holds
/// entries inside the window (see `prune_history`), so nothing is filtered here.
pub fn championship_points(player: &Player, table: &PointsTable) -> u32 {
    player.tournament_history.iter().map(|e| table.points(e.category, e.round)).sum()
}

/// Weeks since the start of the calendar.
pub fn absolute_week(year: u32, week: u32, weeks_per_season: u32) -> i64 {
    year as i64 * weeks_per_season as i64 + week as i64
}

/// Drops history entries at least `window` weeks old. Returns how many went.
pub fn prune_history(
    player: &mut Player,
    year: u32,
    week: u32,
    window: u32,
    weeks_per_season: u32,
) -> usize {
    let now = absolute_week(year, week, weeks_per_season);
    let before = player.tournament_history.len();
    player
        .tournament_history
        .retain(|e| now - absolute_week(e.year, e.week, weeks_per_season) < window as i64);
    before - player.tournament_history.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_points_table;
    use crate::models::{Category, HistoryEntry, RoundReached, Skills, Surface};

    fn entry(name: &str, category: Category, year: u32, week: u32, round: RoundReached) -> HistoryEntry {
        HistoryEntry {
            tournament: name.to_string(),
            category,
            year,
            week,
            round,
            points: default_points_table().points(category, round),
            surface: Surface::Hard,
        }
    }

    #[test]
    fn test_points_sum_and_idempotence() {
        let mut player = Player::new(1, "A", 24, Skills::uniform(60));
        player.tournament_history.push(entry("Slam", Category::GrandSlam, 2030, 3, RoundReached::Winner));
        player.tournament_history.push(entry("Clay 250", Category::Atp250, 2030, 14, RoundReached::Final));
        player.tournament_history.push(entry("ITF", Category::Itf, 2030, 20, RoundReached::Winner));

        let table = default_points_table();
        let first = championship_points(&player, table);
        let second = championship_points(&player, table);
        assert_eq!(first, 105);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prune_drops_entries_a_season_old() {
        let mut player = Player::new(1, "A", 24, Skills::uniform(60));
        player.tournament_history.push(entry("Old", Category::Atp250, 2030, 10, RoundReached::Winner));
        player.tournament_history.push(entry("Edge", Category::Atp250, 2030, 11, RoundReached::Winner));
        player.tournament_history.push(entry("New", Category::Atp250, 2031, 5, RoundReached::Winner));

        let removed = prune_history(&mut player, 2031, 10, 52, 52);
        assert_eq!(removed, 1);
        let names: Vec<_> = player.tournament_history.iter().map(|e| e.tournament.as_str()).collect();
        assert_eq!(names, vec!["Edge", "New"]);
    }
}
