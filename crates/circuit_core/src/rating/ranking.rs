//! Combined ranking: ELO plus championship points

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::points::championship_points;
use crate::data::PointsTable;
use crate::models::PlayerId;
use crate::state::Roster;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRow {
    pub rank: u32,
    pub id: PlayerId,
    pub name: String,
    pub age: u32,
    pub elo_rating: f64,
    pub championship_points: u32,
    pub combined: f64,
}

/// Orders by combined rating descending, then name.
fn compare(a: &RankingRow, b: &RankingRow) -> Ordering {
    b.combined
        .partial_cmp(&a.combined)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Ranking rows for every active player, best first.
pub fn compute_rankings(roster: &Roster, table: &PointsTable) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = roster
        .active()
        .map(|p| {
            let cp = championship_points(p, table);
            RankingRow {
                rank: 0,
                id: p.id,
                name: p.name.clone(),
                age: p.age,
                elo_rating: p.elo_rating,
                championship_points: cp,
                combined: p.elo_rating + cp as f64,
            }
        })
        .collect();
    rows.sort_by(compare);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
    rows
}

/// Writes `rank`, `points`, `highest_rank` and `highest_elo` back to the roster.
pub fn update_rankings(roster: &mut Roster, table: &PointsTable) -> Vec<RankingRow> {
    let rows = compute_rankings(roster, table);
    for row in &rows {
        if let Some(player) = roster.get_mut(row.id) {
            player.rank = row.rank;
            player.points = row.combined;
            player.highest_rank = Some(player.highest_rank.map_or(row.rank, |r| r.min(row.rank)));
            if row.combined > player.highest_elo {
                player.highest_elo = row.combined;
            }
        }
    }
    rows
}
