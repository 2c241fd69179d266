//! Draw construction

use rand::seq::SliceRandom;
use rand::Rng;

use super::Circuit;
use crate::data::validate_draw_size;
use crate::error::{CircuitError, Result};
use crate::models::{Match, PlayerId, TournamentId};
use crate::state::Roster;

/// Seed -> 1-based slot order for a draw of `size`.
///
/// Starts at [1, 2] and doubles by following each p with `new_size + 1 - p`.
/// For 8 this yields [1, 8, 4, 5, 2, 7, 3, 6].
pub fn seeding_permutation(size: usize) -> Vec<usize> {
    let mut order = vec![1, 2];
    if size <= 2 {
        order.truncate(size.max(1));
        return order;
    }
    while order.len() < size {
        let new_size = order.len() * 2;
        order = order.iter().flat_map(|&p| [p, new_size + 1 - p]).collect();
    }
    order
}

/// Participants best rank first. Ids missing from the roster sort last.
pub(crate) fn rank_order(roster: &Roster, ids: &[PlayerId]) -> Vec<PlayerId> {
    let mut ranked = ids.to_vec();
    ranked.sort_by_key(|id| (roster.get(*id).map_or(u32::MAX, |p| p.rank), *id));
    ranked
}

/// Slot layout for a premium draw. Seeds fill the top half in permutation
/// order; each is paired with a random bottom-half entrant (or a bye).
pub(crate) fn seeded_slots<R: Rng + ?Sized>(
    ranked: &[PlayerId],
    draw_size: usize,
    rng: &mut R,
) -> Vec<Option<PlayerId>> {
    let half = draw_size / 2;
    let mut top: Vec<Option<PlayerId>> = ranked.iter().take(half).copied().map(Some).collect();
    top.resize(half, None);
    let mut bottom: Vec<Option<PlayerId>> =
        ranked.iter().skip(half).take(half).copied().map(Some).collect();
    bottom.resize(half, None);
    bottom.shuffle(rng);

    let permutation = seeding_permutation(draw_size);
    let mut slots = vec![None; draw_size];
    for seed in 0..half {
        let slot = permutation[seed] - 1;
        slots[slot] = top[seed];
        slots[slot ^ 1] = bottom[seed];
    }
    slots
}

/// Uniformly shuffled slots for a non-premium draw.
pub(crate) fn shuffled_slots<R: Rng + ?Sized>(
    ids: &[PlayerId],
    draw_size: usize,
    rng: &mut R,
) -> Vec<Option<PlayerId>> {
    let mut entrants: Vec<PlayerId> = ids.iter().take(draw_size).copied().collect();
    entrants.shuffle(rng);
    let mut slots: Vec<Option<PlayerId>> = entrants.into_iter().map(Some).collect();
    slots.resize(draw_size, None);
    slots
}

pub(crate) fn pair_slots(slots: &[Option<PlayerId>]) -> Vec<Match> {
    slots.chunks(2).map(|pair| Match::new(pair[0], pair.get(1).copied().flatten())).collect()
}

impl Circuit {
    /// Builds the draw from `participants`. Any previous draw is discarded.
    ///
    /// More participants than `draw_size` keeps the best-ranked; fewer pads
    /// with byes. The bracket always has `round_count()` rounds, later rounds
    /// empty until reached.
    pub fn generate_bracket(&mut self, id: TournamentId) -> Result<()> {
        let tournament = self.calendar.get(id).ok_or(CircuitError::TournamentNotFound(id))?;
        validate_draw_size(id, tournament.draw_size)?;
        let draw_size = tournament.draw_size as usize;
        let premium = tournament.category.is_premium();

        let mut ranked = rank_order(&self.roster, &tournament.participants);
        ranked.dedup();
        ranked.truncate(draw_size);
        let slots = if premium {
            seeded_slots(&ranked, draw_size, &mut self.rng)
        } else {
            shuffled_slots(&ranked, draw_size, &mut self.rng)
        };
        let first_round = pair_slots(&slots);
        let byes = first_round.iter().filter(|m| m.is_bye()).count();

        let tournament = self.tournament_mut(id)?;
        let rounds = tournament.round_count();
        tournament.participants = ranked;
        tournament.bracket = vec![Vec::new(); rounds];
        tournament.bracket[0] = first_round.clone();
        tournament.active_matches = first_round;
        tournament.current_round = 0;
        tournament.winner_id = None;
        tournament.completed = false;

        log::debug!(
            "Draw for {} {}: {} entrants, {} rounds, {} byes",
            tournament.name,
            tournament.year,
            tournament.participants.len(),
            rounds,
            byes
        );
        Ok(())
    }
}
