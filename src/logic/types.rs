// Custom types that are widely used are defined here.
use sqlx::SqlitePool;

pub type Db = SqlitePool;

// Database ID types.
pub type LeagueId = u16;
pub type ConferenceId = u16;
pub type DivisionId = u16;
pub type TeamId = u16;
pub type ScheduleId = u16;
pub type DayId = u32;
pub type GameId = u32;
pub type SeriesId = u32;

// Day numbers within a schedule. 0 means the schedule has not started.
pub type DayNumber = u16;
pub type Points = u16;

// Type conversions.
pub mod convert {
    use std::fmt::Display;

    use crate::error::{Error, Result};

    // Convert between integers.
    pub fn int<N1: Display + Copy, N2: TryFrom<N1>>(num: N1) -> Result<N2> {
        match num.try_into() {
            Ok(n) => Ok(n),
            Err(_) => Err(Error::InvalidInput(format!("{num} does not fit the target integer type"))),
        }
    }
}
