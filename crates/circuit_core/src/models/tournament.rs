//! Tournament, draw and match records

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

pub type TournamentId = u32;

/// Score string recorded for a walkover against an empty slot.
pub const BYE_SCORE: &str = "BYE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Clay,
    Grass,
    Hard,
    Indoor,
}

impl Surface {
    pub const ALL: [Surface; 4] = [Surface::Clay, Surface::Grass, Surface::Hard, Surface::Indoor];
}

/// Tournament tier. Declaration order is the prestige order, most prestigious first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Special,
    GrandSlam,
    Masters1000,
    Atp500,
    Atp250,
    Challenger175,
    Challenger125,
    Challenger100,
    Challenger75,
    Challenger50,
    Itf,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Special,
        Category::GrandSlam,
        Category::Masters1000,
        Category::Atp500,
        Category::Atp250,
        Category::Challenger175,
        Category::Challenger125,
        Category::Challenger100,
        Category::Challenger75,
        Category::Challenger50,
        Category::Itf,
    ];

    /// Premium draws keep ranking order for seeding.
    pub fn is_premium(&self) -> bool {
        matches!(
            self,
            Category::Special
                | Category::GrandSlam
                | Category::Masters1000
                | Category::Atp500
                | Category::Atp250
        )
    }

    /// Grand Slams. They carry the rating modifier and feed the champions cup.
    /// The Special events are zero-point exhibitions and sit outside the tier.
    pub fn is_top_tier(&self) -> bool {
        *self == Category::GrandSlam
    }

    /// Sets needed to win a match.
    pub fn sets_to_win(&self) -> u8 {
        match self {
            Category::Special | Category::GrandSlam => 3,
            _ => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Special => "Special",
            Category::GrandSlam => "Grand Slam",
            Category::Masters1000 => "Masters 1000",
            Category::Atp500 => "ATP 500",
            Category::Atp250 => "ATP 250",
            Category::Challenger175 => "Challenger 175",
            Category::Challenger125 => "Challenger 125",
            Category::Challenger100 => "Challenger 100",
            Category::Challenger75 => "Challenger 75",
            Category::Challenger50 => "Challenger 50",
            Category::Itf => "ITF",
        }
    }
}

/// Deepest round a player reached in one tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundReached {
    Winner,
    Final,
    Semi,
    Quarter,
    R16,
    R32,
    R64,
    R128,
}

impl RoundReached {
    /// Elimination rounds counted back from the final.
    const BY_DISTANCE_FROM_FINAL: [RoundReached; 7] = [
        RoundReached::Final,
        RoundReached::Semi,
        RoundReached::Quarter,
        RoundReached::R16,
        RoundReached::R32,
        RoundReached::R64,
        RoundReached::R128,
    ];

    /// Round label for a player eliminated in bracket round `round_index`.
    pub fn eliminated_in(round_index: usize, total_rounds: usize) -> Self {
        let from_final = total_rounds.saturating_sub(round_index + 1);
        let last = Self::BY_DISTANCE_FROM_FINAL.len() - 1;
        Self::BY_DISTANCE_FROM_FINAL[from_final.min(last)]
    }

    /// Larger is deeper into the draw.
    pub fn depth(&self) -> u8 {
        match self {
            RoundReached::R128 => 0,
            RoundReached::R64 => 1,
            RoundReached::R32 => 2,
            RoundReached::R16 => 3,
            RoundReached::Quarter => 4,
            RoundReached::Semi => 5,
            RoundReached::Final => 6,
            RoundReached::Winner => 7,
        }
    }
}

/// Fixed-invite rules that bypass the probabilistic entry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invitation {
    /// Four-player cup for last season's Grand Slam champions.
    ChampionsCup,
    /// Eight best under-20 players by future potential.
    NextGenInvitational,
    /// Sixteen best-ranked players.
    EliteInvitational,
}

impl Invitation {
    pub fn field_size(&self) -> usize {
        match self {
            Invitation::ChampionsCup => 4,
            Invitation::NextGenInvitational => 8,
            Invitation::EliteInvitational => 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MatchOutcome {
    Pending,
    /// One slot empty, the other player advances.
    Bye { winner: PlayerId },
    /// Both slots empty, nobody advances.
    Empty,
    Decided { winner: PlayerId, score: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub player1: Option<PlayerId>,
    pub player2: Option<PlayerId>,
    pub outcome: MatchOutcome,
}

impl Match {
    /// Builds a match, resolving empty slots immediately.
    pub fn new(player1: Option<PlayerId>, player2: Option<PlayerId>) -> Self {
        let outcome = match (player1, player2) {
            (Some(_), Some(_)) => MatchOutcome::Pending,
            (Some(p), None) | (None, Some(p)) => MatchOutcome::Bye { winner: p },
            (None, None) => MatchOutcome::Empty,
        };
        Self { player1, player2, outcome }
    }

    pub fn is_complete(&self) -> bool {
        !matches!(self.outcome, MatchOutcome::Pending)
    }

    pub fn is_bye(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Bye { .. } | MatchOutcome::Empty)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match &self.outcome {
            MatchOutcome::Bye { winner } | MatchOutcome::Decided { winner, .. } => Some(*winner),
            MatchOutcome::Pending | MatchOutcome::Empty => None,
        }
    }

    /// Loser of a played match. Byes have no loser.
    pub fn loser(&self) -> Option<PlayerId> {
        match &self.outcome {
            MatchOutcome::Decided { winner, .. } => {
                if self.player1 == Some(*winner) {
                    self.player2
                } else {
                    self.player1
                }
            }
            _ => None,
        }
    }

    pub fn score(&self) -> Option<&str> {
        match &self.outcome {
            MatchOutcome::Bye { .. } => Some(BYE_SCORE),
            MatchOutcome::Decided { score, .. } => Some(score.as_str()),
            MatchOutcome::Pending | MatchOutcome::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentChampion {
    pub year: u32,
    pub winner_id: PlayerId,
    pub winner_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentState {
    Unassigned,
    Round(usize),
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub category: Category,
    pub surface: Surface,
    pub draw_size: u32,
    pub week: u32,
    pub year: u32,
    #[serde(default)]
    pub invitation: Option<Invitation>,
    #[serde(default)]
    pub participants: Vec<PlayerId>,
    #[serde(default)]
    pub bracket: Vec<Vec<Match>>,
    #[serde(default)]
    pub current_round: usize,
    #[serde(default)]
    pub active_matches: Vec<Match>,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub history: Vec<TournamentChampion>,
}

impl Tournament {
    pub fn new(
        id: TournamentId,
        name: impl Into<String>,
        category: Category,
        surface: Surface,
        draw_size: u32,
        week: u32,
        year: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            surface,
            draw_size,
            week,
            year,
            invitation: None,
            participants: Vec::new(),
            bracket: Vec::new(),
            current_round: 0,
            active_matches: Vec::new(),
            winner_id: None,
            completed: false,
            history: Vec::new(),
        }
    }

    pub fn with_invitation(mut self, invitation: Invitation) -> Self {
        self.invitation = Some(invitation);
        self
    }

    /// ceil(log2(draw_size)).
    pub fn round_count(&self) -> usize {
        round_count(self.draw_size)
    }

    pub fn state(&self) -> TournamentState {
        if self.completed {
            TournamentState::Complete
        } else if self.bracket.is_empty() {
            TournamentState::Unassigned
        } else {
            TournamentState::Round(self.current_round)
        }
    }

    /// Clears last edition's draw so the tournament can be rebuilt for `year`.
    pub fn reset_for_year(&mut self, year: u32) {
        self.year = year;
        self.participants.clear();
        self.bracket.clear();
        self.current_round = 0;
        self.active_matches.clear();
        self.winner_id = None;
        self.completed = false;
    }

    pub fn champion_in(&self, year: u32) -> Option<PlayerId> {
        self.history.iter().find(|h| h.year == year).map(|h| h.winner_id)
    }
}

/// ceil(log2(draw_size)); a draw of 1 or less still has one round.
pub fn round_count(draw_size: u32) -> usize {
    let size = draw_size.max(2);
    (u32::BITS - (size - 1).leading_zeros()) as usize
}
