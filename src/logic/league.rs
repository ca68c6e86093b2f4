// The league tree: League -> Conference -> Division -> Team, and the season operations on it.
use std::collections::HashMap;

use ordinal::ToOrdinal;
use rand::Rng;
use serde_json::json;
use tracing::{debug, info};

use crate::{error::{Error, Result}, logic::{schedule::{DayOutcome, Schedule, series::Series}, team::{Strength, Team}, types::{ConferenceId, DivisionId, LeagueId, TeamId}}};

#[derive(Debug)]
#[derive(Default, Clone, PartialEq)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    pub conference_id: ConferenceId,
    pub teams: Vec<Team>,
    pub schedule: Schedule,
}

// Basics.
impl Division {
    pub fn build(name: &str, teams: Vec<Team>) -> Self {
        Self {
            name: name.to_string(),
            schedule: Schedule::build(name),
            teams,
            ..Default::default()
        }
    }

    // Team ids in the stable order, which is ascending id.
    pub fn team_ids(&self) -> Vec<TeamId> {
        let mut ids: Vec<TeamId> = self.teams.iter().map(|team| team.id).collect();
        ids.sort();
        return ids;
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    pub fn strengths(&self) -> HashMap<TeamId, Strength> {
        self.teams.iter().map(|team| (team.id, team.strength)).collect()
    }

    // Teams ordered by points, best first. Ties keep the stable id order.
    pub fn standings(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.iter().collect();
        teams.sort_by_key(|team| team.id);
        teams.sort_by(|a, b| b.points.cmp(&a.points));
        return teams;
    }

    pub fn standings_package(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self.standings().iter().enumerate().map(|(i, team)| {
            let mut row = team.package();
            row["rank"] = json!((i + 1).to_ordinal_string());
            row
        }).collect();

        json!({
            "id": self.id,
            "name": self.name,
            "teams": rows,
        })
    }

    // Plain text standings table.
    pub fn display_standings(&self) -> String {
        let mut lines = vec![format!("{}:", self.name)];
        for (i, team) in self.standings().iter().enumerate() {
            let marker = if team.playoff { "*" } else { " " };
            lines.push(format!("{:>5} {}{:<24} {:>4}", (i + 1).to_ordinal_string(), marker, team.name, team.points));
        }

        return lines.join("\n");
    }

    pub fn is_regular_season_over(&self) -> bool {
        self.schedule.is_post_season() || self.schedule.completed
    }

    pub fn is_post_season_over(&self) -> bool {
        self.schedule.is_post_season() && self.schedule.completed
    }
}

// Functional.
impl Division {
    // Clear the standings and fill the schedule with a fresh double round robin.
    pub fn create_regular_season(&mut self) -> Result<()> {
        self.schedule.create_regular_season(&self.team_ids())?;
        for team in self.teams.iter_mut() {
            team.reset_standing();
        }

        info!("{}: regular season created with {} days", self.name, self.schedule.max_day());
        return Ok(());
    }

    // Play one regular season day and award the points. Returns true once the season is over.
    pub fn play_regular_season_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        if self.schedule.is_post_season() {
            return Err(Error::InvalidInput(format!("{} is already in the post-season", self.name)));
        }

        let strengths = self.strengths();
        let outcome = self.schedule.advance(rng, &strengths)?;
        for result in outcome.results() {
            for team in self.teams.iter_mut() {
                if let Some(points) = result.points_for(team.id) {
                    team.update_points(points);
                }
            }
        }

        self.log_day(&outcome);
        return Ok(outcome.is_completed());
    }

    // Seed playoff and playout series from the final standings.
    // Returns false if the regular season is not done yet.
    pub fn create_post_season(&mut self, length: u8) -> Result<bool> {
        if self.schedule.is_post_season() || !self.is_regular_season_over() {
            return Ok(false);
        }

        let standings: Vec<TeamId> = self.standings().iter().map(|team| team.id).collect();
        self.schedule.create_post_season(&standings, length)?;

        let playoff_teams = &standings[..standings.len() / 2];
        for team in self.teams.iter_mut() {
            team.playoff = playoff_teams.contains(&team.id);
        }

        info!("{}: post-season created with {} series", self.name, self.schedule.series.len());
        return Ok(true);
    }

    // Play one post-season day. Standings are left alone. Returns true once every series is settled.
    pub fn play_post_season_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        if !self.schedule.is_post_season() {
            return Err(Error::InvalidInput(format!("{} has no post-season", self.name)));
        }

        let strengths = self.strengths();
        let outcome = self.schedule.advance(rng, &strengths)?;
        self.log_day(&outcome);
        return Ok(outcome.is_completed());
    }

    pub fn series(&self) -> &[Series] {
        &self.schedule.series
    }

    fn log_day(&self, outcome: &DayOutcome) {
        match outcome {
            DayOutcome::Played { day, results } => debug!("{}: day {day} played, {} games", self.name, results.len()),
            DayOutcome::Completed => info!("{}: schedule completed", self.name),
            DayOutcome::AlreadyCompleted => debug!("{}: schedule already completed", self.name),
        }
    }
}

#[derive(Debug)]
#[derive(Default, Clone, PartialEq)]
pub struct Conference {
    pub id: ConferenceId,
    pub name: String,
    pub league_id: LeagueId,
    pub divisions: Vec<Division>,
}

impl Conference {
    pub fn build(name: &str, divisions: Vec<Division>) -> Self {
        Self {
            name: name.to_string(),
            divisions,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
#[derive(Default, Clone, PartialEq)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub series_length: u8,
    pub conferences: Vec<Conference>,
}

// Basics.
impl League {
    pub fn build(name: &str, series_length: u8, conferences: Vec<Conference>) -> Self {
        Self {
            name: name.to_string(),
            series_length,
            conferences,
            ..Default::default()
        }
    }

    pub fn divisions(&self) -> impl Iterator<Item = &Division> {
        self.conferences.iter().flat_map(|conference| conference.divisions.iter())
    }

    pub fn divisions_mut(&mut self) -> impl Iterator<Item = &mut Division> {
        self.conferences.iter_mut().flat_map(|conference| conference.divisions.iter_mut())
    }

    pub fn division(&self, id: DivisionId) -> Option<&Division> {
        self.divisions().find(|division| division.id == id)
    }

    pub fn is_regular_season_over(&self) -> bool {
        self.divisions().all(|division| division.is_regular_season_over())
    }

    pub fn is_post_season_over(&self) -> bool {
        self.divisions().all(|division| division.is_post_season_over())
    }

    pub fn standings_package(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "conferences": self.conferences.iter().map(|conference| json!({
                "id": conference.id,
                "name": conference.name,
                "divisions": conference.divisions.iter().map(|division| division.standings_package()).collect::<Vec<serde_json::Value>>(),
            })).collect::<Vec<serde_json::Value>>(),
        })
    }
}

// Functional.
impl League {
    pub fn create_regular_season(&mut self) -> Result<()> {
        for division in self.divisions_mut() {
            division.create_regular_season()?;
        }
        return Ok(());
    }

    // Play a day in every division still in its regular season.
    // Returns true when all divisions are done.
    pub fn play_regular_season_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        let mut all_completed = true;
        for division in self.divisions_mut().filter(|division| !division.schedule.is_post_season()) {
            all_completed &= division.play_regular_season_day(rng)?;
        }
        return Ok(all_completed);
    }

    // Seed the post-season for every division whose regular season is over.
    // Returns how many divisions were seeded.
    pub fn create_post_season(&mut self, length: u8) -> Result<usize> {
        let mut seeded = 0;
        for division in self.divisions_mut() {
            if division.create_post_season(length)? {
                seeded += 1;
            }
        }
        return Ok(seeded);
    }

    // Play a day in every division that is in the post-season.
    pub fn play_post_season_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool> {
        let mut all_completed = true;
        for division in self.divisions_mut().filter(|division| division.schedule.is_post_season()) {
            all_completed &= division.play_post_season_day(rng)?;
        }
        return Ok(all_completed);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    pub(crate) fn division(id: DivisionId, first_team: TeamId, count: u16) -> Division {
        let teams = (0..count).map(|i| {
            let mut team = Team::build(&format!("Team {}", first_team + i), format!("{}.5", i % 4).parse().unwrap());
            team.id = first_team + i;
            team.division_id = id;
            team
        }).collect();

        let mut division = Division::build(&format!("Division {id}"), teams);
        division.id = id;
        return division;
    }

    fn league() -> League {
        League::build("Test League", Series::DEFAULT_LENGTH, vec![
            Conference::build("East", vec![division(1, 1, 4), division(2, 5, 6)]),
            Conference::build("West", vec![division(3, 11, 8)]),
        ])
    }

    #[test]
    fn regular_season_awards_points() {
        let mut division = division(1, 1, 4);
        division.create_regular_season().unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let mut days = 0;
        while !division.play_regular_season_day(&mut rng).unwrap() {
            days += 1;
        }
        assert_eq!(days, 6);
        assert!(division.is_regular_season_over());

        // Every game hands out 2 or 3 points.
        let total: u16 = division.teams.iter().map(|team| team.points).sum();
        assert!(total >= 12 * 2 && total <= 12 * 3);
    }

    #[test]
    fn standings_sort_by_points_then_id() {
        let mut division = division(1, 1, 4);
        division.teams[0].points = 3;
        division.teams[1].points = 7;
        division.teams[2].points = 3;
        division.teams[3].points = 9;

        let order: Vec<TeamId> = division.standings().iter().map(|team| team.id).collect();
        assert_eq!(order, vec![4, 2, 1, 3]);

        let packed = division.standings_package();
        assert_eq!(packed["teams"][0]["rank"], "1st");
        assert_eq!(packed["teams"][2]["rank"], "3rd");
        assert!(division.display_standings().contains("2nd"));
    }

    #[test]
    fn post_season_waits_for_the_regular_season() {
        let mut division = division(1, 1, 4);
        division.create_regular_season().unwrap();
        assert!(!division.create_post_season(3).unwrap());

        let mut rng = StdRng::seed_from_u64(2);
        assert!(division.play_post_season_day(&mut rng).is_err());
    }

    #[test]
    fn new_season_resets_standings() {
        let mut division = division(1, 1, 4);
        division.teams[0].points = 10;
        division.teams[0].playoff = true;

        division.create_regular_season().unwrap();
        assert!(division.teams.iter().all(|team| team.points == 0 && !team.playoff));
        assert_eq!(division.schedule.current_day, 0);
    }

    #[test]
    fn full_league_season() {
        let mut league = league();
        let mut rng = StdRng::seed_from_u64(77);
        league.create_regular_season().unwrap();
        assert!(!league.is_regular_season_over());

        while !league.play_regular_season_day(&mut rng).unwrap() {}
        assert!(league.is_regular_season_over());

        // Points freeze once the post-season starts.
        assert_eq!(league.create_post_season(league.series_length).unwrap(), 3);
        let points: Vec<u16> = league.divisions().flat_map(|d| d.teams.iter().map(|t| t.points)).collect();

        while !league.play_post_season_day(&mut rng).unwrap() {}
        assert!(league.is_post_season_over());
        let after: Vec<u16> = league.divisions().flat_map(|d| d.teams.iter().map(|t| t.points)).collect();
        assert_eq!(points, after);

        // Upper half of each division is flagged for the playoffs.
        for division in league.divisions() {
            let flagged = division.teams.iter().filter(|team| team.playoff).count();
            assert_eq!(flagged, division.teams.len() / 2);
            assert!(division.series().iter().all(|series| series.is_decided()));
        }

        // A second call seeds nothing new.
        assert_eq!(league.create_post_season(3).unwrap(), 0);
        assert_eq!(league.division(2).unwrap().series().len(), 2);
    }

    #[test]
    fn divisions_enter_the_post_season_one_by_one() {
        let mut league = league();
        let mut rng = StdRng::seed_from_u64(31);
        league.create_regular_season().unwrap();

        // The 4-team division is done after 6 days and the completing call.
        for _ in 0..7 {
            assert!(!league.play_regular_season_day(&mut rng).unwrap());
        }
        assert_eq!(league.create_post_season(league.series_length).unwrap(), 1);
        assert!(league.division(1).unwrap().schedule.is_post_season());

        let mut calls = 7;
        loop {
            calls += 1;
            if league.play_regular_season_day(&mut rng).unwrap() {
                break;
            }
        }
        assert_eq!(calls, 15);
        assert!(league.is_regular_season_over());

        // The seeded division kept its post-season untouched.
        let first = league.division(1).unwrap();
        assert_eq!(first.schedule.current_day, 0);
        assert!(!first.schedule.completed);

        assert_eq!(league.create_post_season(league.series_length).unwrap(), 2);
        while !league.play_post_season_day(&mut rng).unwrap() {}
        assert!(league.is_post_season_over());
    }
}
