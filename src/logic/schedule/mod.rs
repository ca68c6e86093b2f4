// A division's schedule and the day-by-day season runner.
pub mod round_robin;
pub mod series;

use std::collections::HashMap;

use rand::Rng;
use serde_json::json;

use crate::{error::{Error, Result}, logic::{game::{Game, GameResult}, team::Strength, types::{DayId, DayNumber, ScheduleId, TeamId}}};
use self::series::Series;

#[derive(Debug)]
#[derive(Default, Clone, PartialEq)]
pub struct Day {
    pub id: DayId,
    pub number: DayNumber,
    pub games: Vec<Game>,
}

impl Day {
    pub fn build(number: DayNumber) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    pub fn package(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "number": self.number,
            "games": self.games.iter().map(|game| game.package()).collect::<Vec<serde_json::Value>>(),
        })
    }
}

#[derive(Debug)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    NotStarted,
    InProgress,
    Completed,
}

// What a call to advance did.
#[derive(Debug)]
#[derive(Clone, PartialEq)]
pub enum DayOutcome {
    Played { day: DayNumber, results: Vec<GameResult> },
    Completed,
    AlreadyCompleted,   // Nothing happened.
}

impl DayOutcome {
    pub fn is_completed(&self) -> bool {
        !matches!(self, Self::Played { .. })
    }

    // Results of the games played, if any.
    pub fn results(&self) -> &[GameResult] {
        match self {
            Self::Played { results, .. } => results,
            _ => &[],
        }
    }
}

#[derive(Debug)]
#[derive(Default, Clone, PartialEq)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub current_day: DayNumber,  // 0 means not started.
    pub completed: bool,
    pub post_season: bool,
    pub days: Vec<Day>,
    pub series: Vec<Series>,
}

// Basics.
impl Schedule {
    pub fn build(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn state(&self) -> ScheduleState {
        if self.completed { return ScheduleState::Completed; }
        if self.current_day == 0 { return ScheduleState::NotStarted; }
        return ScheduleState::InProgress;
    }

    // Highest day number in the schedule, 0 if there are no days.
    pub fn max_day(&self) -> DayNumber {
        self.days.iter().map(|day| day.number).max().unwrap_or(0)
    }

    pub fn day(&self, number: DayNumber) -> Option<&Day> {
        self.days.iter().find(|day| day.number == number)
    }

    // Post-season draws go to extra time.
    pub fn is_post_season(&self) -> bool {
        self.post_season
    }

    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.days.iter().flat_map(|day| day.games.iter())
    }

    // Get a day's games in JSON.
    pub fn day_package(&self, number: DayNumber) -> Option<serde_json::Value> {
        self.day(number).map(|day| day.package())
    }

    pub fn package(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "current_day": self.current_day,
            "max_day": self.max_day(),
            "completed": self.completed,
            "post_season": self.post_season,
            "series": self.series.iter().map(|s| s.package(&self.days)).collect::<Vec<serde_json::Value>>(),
        })
    }
}

// Functional.
impl Schedule {
    // Return to the not-started state, dropping all days and series.
    pub fn reset(&mut self) {
        self.current_day = 0;
        self.completed = false;
        self.days.clear();
        self.series.clear();
    }

    // Reset and fill the schedule with a double round robin between the teams.
    pub fn create_regular_season(&mut self, teams: &[TeamId]) -> Result<()> {
        let days = round_robin::generate_matchdays(teams)?;
        self.reset();
        self.post_season = false;
        self.days = days;
        return Ok(());
    }

    // Reset and fill the schedule with playoff and playout series.
    // The standings are ordered best first.
    pub fn create_post_season(&mut self, standings: &[TeamId], length: u8) -> Result<()> {
        let series = series::seed_series(standings, length)?;
        let days = series::generate_matchdays(&series)?;
        self.reset();
        self.post_season = true;
        self.series = series;
        self.days = days;
        return Ok(());
    }

    // Play the next day of the schedule.
    // All games are simulated before anything is written, so a failure leaves the schedule untouched.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, strengths: &HashMap<TeamId, Strength>) -> Result<DayOutcome> {
        if self.completed {
            return Ok(DayOutcome::AlreadyCompleted);
        }

        let next = self.current_day + 1;
        let extra_time_on_draw = self.is_post_season();

        let day_index = match self.days.iter().position(|day| day.number == next) {
            Some(i) => i,
            None => {
                self.complete(next);
                return Ok(DayOutcome::Completed);
            }
        };

        let strength_of = |team_id: TeamId| -> Result<Strength> {
            strengths.get(&team_id)
                .copied()
                .ok_or_else(|| Error::InvalidInput(format!("no strength for team {team_id}")))
        };

        let mut results = Vec::new();
        for game in self.days[day_index].games.iter() {
            let result = game.simulate(rng, strength_of(game.home_id)?, strength_of(game.away_id)?, extra_time_on_draw)?;
            results.push(result);
        }

        for (game, result) in self.days[day_index].games.iter_mut().zip(results.iter()) {
            game.apply(result);
        }
        self.current_day = next;

        return Ok(DayOutcome::Played { day: next, results });
    }

    // Mark the schedule done and settle its series.
    fn complete(&mut self, next: DayNumber) {
        self.current_day = next;
        self.completed = true;

        let days = &self.days;
        for series in self.series.iter_mut() {
            series.decide(days);
        }
    }
}
