use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerId, TournamentWin};

/// Compact record kept for a retired player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallOfFameRecord {
    pub id: PlayerId,
    pub name: String,
    pub retired_year: u32,
    pub age: u32,
    pub highest_elo: f64,
    pub highest_rank: Option<u32>,
    pub matches_played: u32,
    pub tournament_wins: Vec<TournamentWin>,
}

impl HallOfFameRecord {
    pub fn from_player(player: &Player, retired_year: u32) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            retired_year,
            age: player.age,
            highest_elo: player.highest_elo,
            highest_rank: player.highest_rank,
            matches_played: player.matches_played,
            tournament_wins: player.tournament_wins.clone(),
        }
    }

    pub fn title_count(&self) -> usize {
        self.tournament_wins.len()
    }
}
