pub mod hall_of_fame;
pub mod player;
pub mod tournament;

pub use hall_of_fame::HallOfFameRecord;
pub use player::{
    Hand, HistoryEntry, Injury, Player, PlayerId, ShotTendencies, Skill, SkillCap, Skills,
    SurfaceModifiers, TournamentWin, ELO_FLOOR, SKILL_CAP_LIMIT,
};
pub use tournament::{
    round_count, Category, Invitation, Match, MatchOutcome, RoundReached, Surface, Tournament,
    TournamentChampion, TournamentId, TournamentState, BYE_SCORE,
};
