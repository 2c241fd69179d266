//! Embedded gameplay data: default calendar, points and participation tables.

pub mod calendar;
pub mod tables;

pub use calendar::{default_calendar, parse_calendar, validate_draw_size, CalendarEntry};
pub use tables::{
    default_participation_table, default_points_table, ParticipationTable, PointsTable,
};
