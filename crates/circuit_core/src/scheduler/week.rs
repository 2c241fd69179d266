//! Weekly tick

use super::Circuit;
use crate::development::{retirement_reason, weekly_development};
use crate::models::HallOfFameRecord;
use crate::rating::prune_history;

impl Circuit {
    /// Moves the calendar forward one week and returns the new week.
    ///
    /// Order: history cleanup, then on a season boundary aging, retirement
    /// and replenishment plus a reset of every tournament for the new year,
    /// then ranking, development and injury healing.
    pub fn advance_week(&mut self) -> u32 {
        self.week += 1;
        let rollover = self.week > self.config.weeks_per_season;
        if rollover {
            self.week = 1;
            self.year += 1;
        }

        let (year, week) = (self.year, self.week);
        let window = self.config.history_window_weeks;
        let wps = self.config.weeks_per_season;
        let pruned: usize =
            self.roster.iter_mut().map(|p| prune_history(p, year, week, window, wps)).sum();
        if pruned > 0 {
            log::debug!("Dropped {} expired history entries", pruned);
        }

        if rollover {
            self.roll_over_season();
        }

        self.refresh_rankings();
        let delta = weekly_development(&mut self.roster, week, &self.config.development, &mut self.rng);
        log::debug!("Week {} development: +{} / -{}", week, delta.gains, delta.losses);

        for player in self.roster.iter_mut() {
            if player.heal_week() {
                log::debug!("{} back from injury", player.name);
            }
        }
        self.week
    }

    fn roll_over_season(&mut self) {
        for player in self.roster.iter_mut().filter(|p| !p.retired) {
            player.age += 1;
        }

        let mut retiring = Vec::new();
        for player in self.roster.iter() {
            if let Some(reason) = retirement_reason(player, &self.config.retirement, &mut self.rng) {
                retiring.push((player.id, reason));
            }
        }
        let retired_year = self.year.saturating_sub(1);
        let leavers = self.roster.drain_where(|p| retiring.iter().any(|(id, _)| *id == p.id));
        for mut player in leavers {
            player.retired = true;
            let record = HallOfFameRecord::from_player(&player, retired_year);
            if let Some((_, reason)) = retiring.iter().find(|(id, _)| *id == player.id) {
                log::info!(
                    "{} retires at {} ({:?}), {} titles",
                    record.name,
                    record.age,
                    reason,
                    record.title_count()
                );
            }
            self.hall_of_fame.push(record);
        }

        let joined = self.replenish_roster();
        let year = self.year;
        for tournament in self.calendar.iter_mut() {
            tournament.reset_for_year(year);
        }
        log::info!(
            "Season {} begins: {} retired, {} joined, {} active",
            year,
            retiring.len(),
            joined,
            self.roster.active_count()
        );
    }
}
