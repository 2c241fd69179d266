//! Season calendar loading

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};
use crate::models::{Category, Invitation, Surface, Tournament, TournamentId};

pub const CALENDAR_YAML: &str = include_str!("../../data/calendar.yaml");

/// Tournament metadata as supplied by a calendar file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: TournamentId,
    pub name: String,
    pub category: Category,
    pub surface: Surface,
    pub draw_size: u32,
    pub week: u32,
    #[serde(default)]
    pub invitation: Option<Invitation>,
}

impl CalendarEntry {
    pub fn into_tournament(self, year: u32) -> Result<Tournament> {
        validate_draw_size(self.id, self.draw_size)?;
        let mut tournament = Tournament::new(
            self.id,
            self.name,
            self.category,
            self.surface,
            self.draw_size,
            self.week,
            year,
        );
        tournament.invitation = self.invitation;
        Ok(tournament)
    }
}

pub fn validate_draw_size(id: TournamentId, draw_size: u32) -> Result<()> {
    if draw_size < 2 || !draw_size.is_power_of_two() {
        return Err(CircuitError::InvalidDrawSize { tournament: id, draw_size });
    }
    Ok(())
}

pub fn parse_calendar(text: &str, year: u32) -> Result<Vec<Tournament>> {
    let entries: Vec<CalendarEntry> = serde_yaml::from_str(text)?;
    entries.into_iter().map(|e| e.into_tournament(year)).collect()
}

/// The embedded default season.
pub fn default_calendar(year: u32) -> Result<Vec<Tournament>> {
    parse_calendar(CALENDAR_YAML, year)
}
