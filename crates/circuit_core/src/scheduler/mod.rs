//! # Bracket Scheduler
//!
//! [`Circuit`] owns the roster, the calendar and the random source, and drives
//! every tournament through its lifecycle:
//!
//! ```text
//! Unassigned -> Round 0 -> ... -> Round N-1 -> Complete
//! ```
//!
//! - `assignment`: who enters which of this week's tournaments
//! - `draw`: seeding and first-round construction
//! - `play`: match resolution, result commit, round advancement
//! - `week`: the weekly tick (cleanup, aging, retirement, development)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use circuit_core::{Circuit, CircuitConfig};
//!
//! let mut circuit = Circuit::with_default_dataset(CircuitConfig::default(), 2024, 7)?;
//! let champions = circuit.simulate_season()?;
//! for row in circuit.rankings(10) {
//!     println!("{:>3} {} {:.0}", row.rank, row.name, row.combined);
//! }
//! ```

mod assignment;
mod draw;
mod play;
mod week;


pub use assignment::future_potential;
pub use draw::seeding_permutation;
pub use play::MatchReport;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::CircuitConfig;
use crate::data::{
    default_calendar, default_participation_table, default_points_table, ParticipationTable,
    PointsTable,
};
use crate::error::{CircuitError, Result};
use crate::generator::{generate_roster, PlayerGenerator, RandomPlayerGenerator};
use crate::models::{Category, HallOfFameRecord, Player, PlayerId, Tournament, TournamentId};
use crate::rating::{compute_rankings, update_rankings, RankingRow};
use crate::state::{Calendar, Roster};

/// One finished tournament of a played week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub category: Category,
    pub year: u32,
    pub week: u32,
    pub winner: Option<PlayerId>,
    pub winner_name: Option<String>,
}

pub struct Circuit {
    pub(crate) config: CircuitConfig,
    pub(crate) roster: Roster,
    pub(crate) calendar: Calendar,
    pub(crate) hall_of_fame: Vec<HallOfFameRecord>,
    pub(crate) week: u32,
    pub(crate) year: u32,
    pub(crate) next_player_id: PlayerId,
    points: PointsTable,
    participation: ParticipationTable,
    rng: ChaCha8Rng,
    generator: Box<dyn PlayerGenerator>,
}

impl Circuit {
    /// Circuit at week 1 of `year` with the embedded tables and the default
    /// random generator. Players are ranked immediately.
    pub fn new(
        config: CircuitConfig,
        players: Vec<Player>,
        tournaments: Vec<Tournament>,
        year: u32,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, players, tournaments, year, seed))
    }

    /// `new` for an already validated configuration.
    pub(crate) fn assemble(
        config: CircuitConfig,
        players: Vec<Player>,
        tournaments: Vec<Tournament>,
        year: u32,
        seed: u64,
    ) -> Self {
        let roster = Roster::new(players);
        let next_player_id = roster.next_free_id();
        let mut circuit = Self {
            config,
            roster,
            calendar: Calendar::new(tournaments),
            hall_of_fame: Vec::new(),
            week: 1,
            year,
            next_player_id,
            points: default_points_table().clone(),
            participation: default_participation_table().clone(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            generator: Box::new(RandomPlayerGenerator::default()),
        };
        for tournament in circuit.calendar.iter_mut() {
            tournament.year = year;
        }
        circuit.refresh_rankings();
        circuit
    }

    /// Embedded calendar plus a freshly generated roster of
    /// `target_roster_size` players.
    pub fn with_default_dataset(config: CircuitConfig, year: u32, seed: u64) -> Result<Self> {
        let tournaments = default_calendar(year)?;
        let mut circuit = Self::new(config, Vec::new(), tournaments, year, seed)?;
        circuit.replenish_roster();
        circuit.refresh_rankings();
        Ok(circuit)
    }

    pub fn with_generator(mut self, generator: Box<dyn PlayerGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_points_table(mut self, table: PointsTable) -> Self {
        self.points = table;
        self.refresh_rankings();
        self
    }

    pub fn with_participation_table(mut self, table: ParticipationTable) -> Result<Self> {
        table.validate()?;
        self.participation = table;
        Ok(self)
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn hall_of_fame(&self) -> &[HallOfFameRecord] {
        &self.hall_of_fame
    }

    pub fn points_table(&self) -> &PointsTable {
        &self.points
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.roster.get(id).ok_or(CircuitError::PlayerNotFound(id))
    }

    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament> {
        self.calendar.get(id).ok_or(CircuitError::TournamentNotFound(id))
    }

    pub(crate) fn tournament_mut(&mut self, id: TournamentId) -> Result<&mut Tournament> {
        self.calendar.get_mut(id).ok_or(CircuitError::TournamentNotFound(id))
    }

    /// Top `top` rows of the current combined ranking.
    pub fn rankings(&self, top: usize) -> Vec<RankingRow> {
        let mut rows = compute_rankings(&self.roster, &self.points);
        rows.truncate(top);
        rows
    }

    pub(crate) fn refresh_rankings(&mut self) -> Vec<RankingRow> {
        update_rankings(&mut self.roster, &self.points)
    }

    /// Tops the active roster up to `target_roster_size`. Returns how many joined.
    pub(crate) fn replenish_roster(&mut self) -> usize {
        let missing = self.config.target_roster_size.saturating_sub(self.roster.active_count());
        if missing == 0 {
            return 0;
        }
        let first = self.next_player_id.max(self.roster.next_free_id());
        let newcomers = generate_roster(self.generator.as_ref(), first, missing, &mut self.rng);
        for player in newcomers {
            self.next_player_id = self.next_player_id.max(player.id + 1);
            self.roster.push(player);
        }
        log::debug!("Roster replenished with {} players", missing);
        missing
    }

    /// Assign, draw and play every tournament scheduled this week.
    pub fn play_week(&mut self) -> Result<Vec<TournamentSummary>> {
        self.assign_participants()?;
        let ids = self.calendar.week_ids(self.week);
        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            let winner = self.simulate_tournament(id)?;
            let tournament = self.tournament(id)?;
            let winner_name = match winner {
                Some(pid) => self.roster.get(pid).map(|p| p.name.clone()),
                None => None,
            };
            summaries.push(TournamentSummary {
                id,
                name: tournament.name.clone(),
                category: tournament.category,
                year: tournament.year,
                week: tournament.week,
                winner,
                winner_name,
            });
        }
        Ok(summaries)
    }

    /// A full season of `play_week` + `advance_week`.
    pub fn simulate_season(&mut self) -> Result<Vec<TournamentSummary>> {
        let start_year = self.year;
        let mut champions = Vec::new();
        for _ in 0..self.config.weeks_per_season {
            champions.extend(self.play_week()?);
            self.advance_week();
        }
        log::info!(
            "Season {} finished: {} tournaments, {} active players, {} in the hall of fame",
            start_year,
            champions.len(),
            self.roster.active_count(),
            self.hall_of_fame.len()
        );
        Ok(champions)
    }
}

impl std::fmt::Debug for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Circuit")
            .field("year", &self.year)
            .field("week", &self.week)
            .field("players", &self.roster.len())
            .field("tournaments", &self.calendar.len())
            .field("hall_of_fame", &self.hall_of_fame.len())
            .finish()
    }
}
