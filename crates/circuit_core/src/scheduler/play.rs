//! Match resolution and round advancement
//!
//! A match result is committed in one place (`commit_result`) after the
//! simulator has returned, so a failed lookup leaves every record untouched.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Circuit;
use crate::error::{CircuitError, Result};
use crate::match_sim::{simulate_match, ShotEvent};
use crate::models::{
    HistoryEntry, Injury, Match, MatchOutcome, Player, PlayerId, RoundReached, Tournament,
    TournamentChampion, TournamentId, TournamentState, TournamentWin,
};
use crate::rating::{apply_match_rating, RatingChange};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub tournament: TournamentId,
    pub round: usize,
    pub index: usize,
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
    pub score: Option<String>,
    pub log: Vec<String>,
    pub events: Vec<ShotEvent>,
    /// None for byes and for matches decided before this call
    pub rating: Option<RatingChange>,
}

impl MatchReport {
    fn from_existing(tournament: TournamentId, round: usize, index: usize, m: &Match) -> Self {
        Self {
            tournament,
            round,
            index,
            winner: m.winner(),
            loser: m.loser(),
            score: m.score().map(str::to_string),
            log: Vec::new(),
            events: Vec::new(),
            rating: None,
        }
    }
}

/// Inserts or deepens the entry for this tournament edition. A shallower
/// round never replaces a deeper one, so points are counted once.
pub(crate) fn record_round(player: &mut Player, tournament: &Tournament, round: RoundReached, points: u32) {
    let existing = player
        .tournament_history
        .iter_mut()
        .find(|e| e.same_instance(&tournament.name, tournament.year, tournament.week));
    match existing {
        Some(entry) => {
            if round.depth() > entry.round.depth() {
                entry.round = round;
                entry.points = points;
            }
        }
        None => player.tournament_history.push(HistoryEntry {
            tournament: tournament.name.clone(),
            category: tournament.category,
            year: tournament.year,
            week: tournament.week,
            round,
            points,
            surface: tournament.surface,
        }),
    }
}

impl Circuit {
    /// Plays match `index` of the current round. Calling it again on a
    /// decided match returns the recorded result without replaying.
    pub fn simulate_match(&mut self, id: TournamentId, index: usize) -> Result<MatchReport> {
        let tournament = self.tournament(id)?;
        if tournament.bracket.is_empty() {
            return Err(CircuitError::BracketNotGenerated(id));
        }
        let round = tournament.current_round;
        let m = tournament.active_matches.get(index).ok_or(CircuitError::MatchIndexOutOfRange {
            tournament: id,
            round,
            index,
            len: tournament.active_matches.len(),
        })?;
        let (p1_id, p2_id) = match (&m.outcome, m.player1, m.player2) {
            (MatchOutcome::Pending, Some(a), Some(b)) => (a, b),
            _ => return Ok(MatchReport::from_existing(id, round, index, m)),
        };

        let (surface, category) = (tournament.surface, tournament.category);
        let p1 = self.roster.get(p1_id).ok_or(CircuitError::PlayerNotFound(p1_id))?;
        let p2 = self.roster.get(p2_id).ok_or(CircuitError::PlayerNotFound(p2_id))?;
        let result = simulate_match(p1, p2, surface, category, &self.config.matches, &mut self.rng);

        let rating = self.commit_result(id, index, result.winner, result.loser, &result.score)?;
        log::debug!(
            "{} round {} match {}: {} def. {} {}",
            self.tournament(id)?.name,
            round,
            index,
            result.winner,
            result.loser,
            result.score
        );
        Ok(MatchReport {
            tournament: id,
            round,
            index,
            winner: Some(result.winner),
            loser: Some(result.loser),
            score: Some(result.score),
            log: result.log,
            events: result.events,
            rating: Some(rating),
        })
    }

    fn commit_result(
        &mut self,
        id: TournamentId,
        index: usize,
        winner: PlayerId,
        loser: PlayerId,
        score: &str,
    ) -> Result<RatingChange> {
        let tournament = self.tournament(id)?;
        let round = RoundReached::eliminated_in(tournament.current_round, tournament.round_count());
        let points = self.points.points(tournament.category, round);
        let edition = tournament.clone_metadata();

        let (w, l) = self.roster.get_pair_mut(winner, loser).ok_or(CircuitError::PlayerNotFound(loser))?;
        let change = apply_match_rating(w, l, edition.category, &self.config.rating, &self.points);
        record_round(l, &edition, round, points);

        let injuries = self.config.injuries.clone();
        for player in [w, l] {
            if injuries.chance_per_match > 0.0 && self.rng.gen_bool(injuries.chance_per_match) {
                let weeks = self.rng.gen_range(injuries.min_weeks..=injuries.max_weeks);
                player.injury = Some(Injury { weeks_remaining: weeks });
                log::debug!("{} injured for {} weeks", player.name, weeks);
            }
        }

        let tournament = self.tournament_mut(id)?;
        let outcome = MatchOutcome::Decided { winner, score: score.to_string() };
        let current = tournament.current_round;
        if let Some(m) = tournament.active_matches.get_mut(index) {
            m.outcome = outcome.clone();
        }
        if let Some(m) = tournament.bracket.get_mut(current).and_then(|r| r.get_mut(index)) {
            m.outcome = outcome;
        }
        Ok(change)
    }

    /// Resolves every pending match of the current round, then advances.
    pub fn simulate_round(&mut self, id: TournamentId) -> Result<TournamentState> {
        let tournament = self.tournament(id)?;
        if tournament.completed {
            return Ok(TournamentState::Complete);
        }
        if tournament.bracket.is_empty() {
            return Err(CircuitError::BracketNotGenerated(id));
        }
        let pending: Vec<usize> = tournament
            .active_matches
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_complete())
            .map(|(i, _)| i)
            .collect();
        for index in pending {
            self.simulate_match(id, index)?;
        }
        self.advance_round(id)
    }

    /// Moves winners into the next round once every current match is
    /// complete, or finalizes after the last round.
    pub fn advance_round(&mut self, id: TournamentId) -> Result<TournamentState> {
        let tournament = self.tournament_mut(id)?;
        if tournament.completed || tournament.bracket.is_empty() {
            return Ok(tournament.state());
        }
        if !tournament.active_matches.iter().all(Match::is_complete) {
            return Ok(tournament.state());
        }

        let winners: Vec<Option<PlayerId>> = tournament.active_matches.iter().map(Match::winner).collect();
        let next_round = tournament.current_round + 1;
        if next_round >= tournament.bracket.len() {
            let champion = winners.into_iter().flatten().next();
            self.finalize(id, champion)?;
            return Ok(TournamentState::Complete);
        }

        let matches: Vec<Match> = winners
            .chunks(2)
            .map(|pair| Match::new(pair[0], pair.get(1).copied().flatten()))
            .collect();
        tournament.bracket[next_round] = matches.clone();
        tournament.active_matches = matches;
        tournament.current_round = next_round;
        Ok(tournament.state())
    }

    fn finalize(&mut self, id: TournamentId, champion: Option<PlayerId>) -> Result<()> {
        let tournament = self.tournament_mut(id)?;
        tournament.completed = true;
        tournament.winner_id = champion;
        let edition = tournament.clone_metadata();

        let Some(winner_id) = champion else {
            log::debug!("{} {} finished without a champion", edition.name, edition.year);
            return Ok(());
        };
        let points = self.points.points(edition.category, RoundReached::Winner);
        let player = self.roster.get_mut(winner_id).ok_or(CircuitError::PlayerNotFound(winner_id))?;
        record_round(player, &edition, RoundReached::Winner, points);
        player.tournament_wins.push(TournamentWin {
            name: edition.name.clone(),
            category: edition.category,
            year: edition.year,
        });
        let winner_name = player.name.clone();

        self.tournament_mut(id)?.history.push(TournamentChampion {
            year: edition.year,
            winner_id,
            winner_name: winner_name.clone(),
        });
        log::info!("{} {} won by {}", edition.name, edition.year, winner_name);
        Ok(())
    }

    /// Plays a tournament to completion, drawing it first if needed.
    pub fn simulate_tournament(&mut self, id: TournamentId) -> Result<Option<PlayerId>> {
        let tournament = self.tournament(id)?;
        if tournament.completed {
            return Ok(tournament.winner_id);
        }
        if tournament.bracket.is_empty() {
            self.generate_bracket(id)?;
        }
        let rounds = self.tournament(id)?.round_count();
        for _ in 0..=rounds {
            if self.simulate_round(id)? == TournamentState::Complete {
                break;
            }
        }
        Ok(self.tournament(id)?.winner_id)
    }
}

impl Tournament {
    /// Metadata-only copy used while player records are borrowed mutably.
    pub(crate) fn clone_metadata(&self) -> Tournament {
        let mut copy = Tournament::new(
            self.id,
            self.name.clone(),
            self.category,
            self.surface,
            self.draw_size,
            self.week,
            self.year,
        );
        copy.invitation = self.invitation;
        copy
    }
}
