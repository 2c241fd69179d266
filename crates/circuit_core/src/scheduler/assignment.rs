//! Weekly participant assignment
//!
//! Fixed-invite events are filled first and their invitees leave the general
//! pool. Everyone else available is walked in rank order and rolls against
//! the participation table, most prestigious category first.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use super::draw::rank_order;
use super::Circuit;
use crate::data::ParticipationTable;
use crate::error::Result;
use crate::models::{Category, Invitation, Player, PlayerId, TournamentId, TournamentState, ELO_FLOOR};

/// Next Gen selection score: skill level scaled by potential, plus rating
/// progress above the floor.
pub fn future_potential(player: &Player) -> f64 {
    0.6 * player.skills.average() * player.potential_factor
        + 0.4 * (player.elo_rating - ELO_FLOOR) / 10.0
}

/// An open tournament of the general pass.
#[derive(Debug, Clone)]
pub(crate) struct OpenDraw {
    pub id: TournamentId,
    pub category: Category,
    pub capacity: usize,
}

/// Probability pass over `pool` (already in rank order).
///
/// Returns the selected players per category, in selection order. Once the
/// players left no longer exceed the slots left, everyone remaining is placed.
pub(crate) fn select_by_probability<R: Rng + ?Sized>(
    pool: &[(PlayerId, u32)],
    draws: &[OpenDraw],
    table: &ParticipationTable,
    rng: &mut R,
) -> BTreeMap<Category, Vec<PlayerId>> {
    let mut open: BTreeMap<Category, usize> = BTreeMap::new();
    for draw in draws {
        *open.entry(draw.category).or_default() += draw.capacity;
    }
    let mut selected: BTreeMap<Category, Vec<PlayerId>> = BTreeMap::new();
    let mut auto_fill = false;

    for (position, &(id, rank)) in pool.iter().enumerate() {
        let slots_left: usize = open.values().sum();
        if slots_left == 0 {
            break;
        }
        if !auto_fill && pool.len() - position <= slots_left {
            auto_fill = true;
            log::debug!("Auto-fill from rank {} with {} slots left", rank, slots_left);
        }

        let mut chosen = None;
        for (&category, &left) in open.iter() {
            if left == 0 {
                continue;
            }
            if auto_fill || rng.gen_bool(table.probability(rank, category).clamp(0.0, 1.0)) {
                chosen = Some(category);
                break;
            }
        }
        if let Some(category) = chosen {
            if let Some(left) = open.get_mut(&category) {
                *left -= 1;
            }
            selected.entry(category).or_default().push(id);
        }
    }
    selected
}

/// Splits one category's selection across its tournaments.
///
/// Several concurrent draws get a shuffled round-robin deal. A lone premium
/// draw keeps rank order; a lone non-premium draw is shuffled.
pub(crate) fn distribute<R: Rng + ?Sized>(
    category: Category,
    mut players: Vec<PlayerId>,
    draws: &[&OpenDraw],
    rng: &mut R,
) -> Vec<(TournamentId, Vec<PlayerId>)> {
    if draws.len() == 1 {
        if !category.is_premium() {
            players.shuffle(rng);
        }
        players.truncate(draws[0].capacity);
        return vec![(draws[0].id, players)];
    }

    players.shuffle(rng);
    let mut fields: Vec<(TournamentId, Vec<PlayerId>)> =
        draws.iter().map(|d| (d.id, Vec::with_capacity(d.capacity))).collect();
    let mut next = 0;
    'deal: for player in players {
        for _ in 0..draws.len() {
            let slot = next % draws.len();
            next += 1;
            if fields[slot].1.len() < draws[slot].capacity {
                fields[slot].1.push(player);
                continue 'deal;
            }
        }
        break;
    }
    fields
}

impl Circuit {
    /// Fills `participants` for this week's tournaments that have no draw yet.
    pub fn assign_participants(&mut self) -> Result<()> {
        let week_ids: Vec<TournamentId> = self
            .calendar
            .week_ids(self.week)
            .into_iter()
            .filter(|id| {
                self.calendar
                    .get(*id)
                    .map_or(false, |t| t.state() == TournamentState::Unassigned && t.participants.is_empty())
            })
            .collect();
        if week_ids.is_empty() {
            return Ok(());
        }

        let available: Vec<PlayerId> =
            self.roster.iter().filter(|p| p.is_available()).map(|p| p.id).collect();
        let by_rank = rank_order(&self.roster, &available);
        let mut invited: HashSet<PlayerId> = HashSet::new();
        let mut open_draws = Vec::new();

        for id in &week_ids {
            let tournament = self.tournament(*id)?;
            match tournament.invitation {
                Some(invitation) => {
                    let field = self.invitation_field(invitation, &by_rank, &invited);
                    invited.extend(field.iter().copied());
                    log::debug!("{} invites {} players", tournament.name, field.len());
                    self.tournament_mut(*id)?.participants = field;
                }
                None => open_draws.push(OpenDraw {
                    id: *id,
                    category: tournament.category,
                    capacity: tournament.draw_size as usize,
                }),
            }
        }
        if open_draws.is_empty() {
            return Ok(());
        }

        let pool: Vec<(PlayerId, u32)> = by_rank
            .iter()
            .filter(|id| !invited.contains(*id))
            .filter_map(|id| self.roster.get(*id).map(|p| (p.id, p.rank)))
            .collect();
        let selected = select_by_probability(&pool, &open_draws, &self.participation, &mut self.rng);

        let mut assigned = 0;
        for (category, players) in selected {
            let draws: Vec<&OpenDraw> = open_draws.iter().filter(|d| d.category == category).collect();
            for (id, field) in distribute(category, players, &draws, &mut self.rng) {
                assigned += field.len();
                self.tournament_mut(id)?.participants = field;
            }
        }
        log::debug!(
            "Week {} of {}: {} invited, {} assigned across {} open draws",
            self.week,
            self.year,
            invited.len(),
            assigned,
            open_draws.len()
        );
        Ok(())
    }

    fn invitation_field(
        &self,
        invitation: Invitation,
        by_rank: &[PlayerId],
        invited: &HashSet<PlayerId>,
    ) -> Vec<PlayerId> {
        let size = invitation.field_size();
        let eligible = |id: &PlayerId| !invited.contains(id);
        match invitation {
            Invitation::ChampionsCup => {
                let mut field: Vec<PlayerId> = Vec::with_capacity(size);
                let previous = self.year.saturating_sub(1);
                for tournament in self.calendar.iter().filter(|t| t.category.is_top_tier()) {
                    if let Some(champion) = tournament.champion_in(previous) {
                        let available = self.roster.get(champion).map_or(false, |p| p.is_available());
                        if available && eligible(&champion) && !field.contains(&champion) && field.len() < size {
                            field.push(champion);
                        }
                    }
                }
                for id in by_rank.iter().filter(|id| eligible(*id)) {
                    if field.len() >= size {
                        break;
                    }
                    if !field.contains(id) {
                        field.push(*id);
                    }
                }
                field
            }
            Invitation::NextGenInvitational => {
                let max_age = self.config.next_gen_max_age;
                let mut prospects: Vec<&Player> = by_rank
                    .iter()
                    .filter(|id| eligible(*id))
                    .filter_map(|id| self.roster.get(*id))
                    .filter(|p| p.age <= max_age)
                    .collect();
                prospects.sort_by(|a, b| {
                    future_potential(b)
                        .partial_cmp(&future_potential(a))
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.id.cmp(&b.id))
                });
                prospects.into_iter().take(size).map(|p| p.id).collect()
            }
            Invitation::EliteInvitational => {
                by_rank.iter().filter(|id| eligible(*id)).take(size).copied().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool(n: u32) -> Vec<(PlayerId, u32)> {
        (1..=n).map(|i| (i, i)).collect()
    }

    #[test]
    fn test_auto_fill_places_everyone_when_short() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let draws = vec![OpenDraw { id: 1, category: Category::Itf, capacity: 32 }];
        let selected = select_by_probability(&pool(20), &draws, &ParticipationTable::flat(0.0), &mut rng);
        assert_eq!(selected[&Category::Itf], (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_auto_fill_kicks_in_at_equality() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let draws = vec![OpenDraw { id: 1, category: Category::Itf, capacity: 8 }];
        // nobody accepts, so the last 8 of 40 are placed by the safeguard
        let selected = select_by_probability(&pool(40), &draws, &ParticipationTable::flat(0.0), &mut rng);
        assert_eq!(selected[&Category::Itf], (33..=40).collect::<Vec<_>>());
    }

    #[test]
    fn test_prestige_first_when_everyone_accepts() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let draws = vec![
            OpenDraw { id: 1, category: Category::Atp250, capacity: 4 },
            OpenDraw { id: 2, category: Category::Masters1000, capacity: 8 },
        ];
        let selected = select_by_probability(&pool(20), &draws, &ParticipationTable::flat(1.0), &mut rng);
        assert_eq!(selected[&Category::Masters1000], (1..=8).collect::<Vec<_>>());
        assert_eq!(selected[&Category::Atp250], vec![9, 10, 11, 12]);
    }

    #[test]
    fn test_lone_premium_draw_keeps_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let draw = OpenDraw { id: 7, category: Category::Atp500, capacity: 8 };
        let fields = distribute(Category::Atp500, (1..=8).collect(), &[&draw], &mut rng);
        assert_eq!(fields, vec![(7, (1..=8).collect::<Vec<_>>())]);
    }

    #[test]
    fn test_concurrent_draws_respect_capacity() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let a = OpenDraw { id: 1, category: Category::Challenger50, capacity: 8 };
        let b = OpenDraw { id: 2, category: Category::Challenger50, capacity: 4 };
        let fields = distribute(Category::Challenger50, (1..=12).collect(), &[&a, &b], &mut rng);
        assert_eq!(fields[0].1.len(), 8);
        assert_eq!(fields[1].1.len(), 4);
        let mut all: Vec<PlayerId> = fields.iter().flat_map(|(_, f)| f.clone()).collect();
        all.sort_unstable();
        assert_eq!(all, (1..=12).collect::<Vec<_>>());
    }
}
