// Reading the league setup file.
use std::{fs, path::Path};

use serde::Deserialize;

use crate::{error::{Error, Result}, logic::{league::{Conference, Division, League}, schedule::series::Series, team::{Strength, Team}, types::convert}};

#[derive(Debug, Deserialize)]
#[derive(Clone, PartialEq)]
pub struct TeamSetup {
    pub name: String,
    pub strength: Strength,
}

#[derive(Debug, Deserialize)]
#[derive(Clone, PartialEq)]
pub struct DivisionSetup {
    pub name: String,
    pub teams: Vec<TeamSetup>,
}

#[derive(Debug, Deserialize)]
#[derive(Clone, PartialEq)]
pub struct ConferenceSetup {
    pub name: String,
    pub divisions: Vec<DivisionSetup>,
}

// The structure of a league before anything is played.
#[derive(Debug, Deserialize)]
#[derive(Clone, PartialEq)]
pub struct LeagueSetup {
    pub name: String,
    #[serde(default = "default_series_length")]
    pub series_length: u8,
    pub conferences: Vec<ConferenceSetup>,
}

fn default_series_length() -> u8 {
    Series::DEFAULT_LENGTH
}

impl LeagueSetup {
    pub fn from_json(json: &str) -> Result<Self> {
        let setup: Self = serde_json::from_str(json)?;
        setup.validate()?;
        return Ok(setup);
    }

    // Read a setup from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }

    // Reject setups the round robin could never schedule.
    pub fn validate(&self) -> Result<()> {
        if self.series_length == 0 {
            return Err(Error::InvalidInput("series length must be at least 1".to_string()));
        }

        for division in self.conferences.iter().flat_map(|conference| conference.divisions.iter()) {
            let count = division.teams.len();
            if count < 2 || count % 2 != 0 {
                return Err(Error::InvalidInput(format!("division {} has {count} teams, needs an even number of at least 2", division.name)));
            }
        }

        return Ok(());
    }

    // Build the in-memory tree, numbering everything from 1 in setup order.
    pub fn build_league(&self) -> Result<League> {
        let (mut conference_id, mut division_id, mut team_id) = (0usize, 0usize, 0usize);

        let mut conferences = Vec::new();
        for conference_setup in self.conferences.iter() {
            conference_id += 1;

            let mut divisions = Vec::new();
            for division_setup in conference_setup.divisions.iter() {
                division_id += 1;

                let mut teams = Vec::new();
                for team_setup in division_setup.teams.iter() {
                    team_id += 1;
                    let mut team = Team::build(&team_setup.name, team_setup.strength);
                    team.id = convert::int(team_id)?;
                    team.division_id = convert::int(division_id)?;
                    teams.push(team);
                }

                let mut division = Division::build(&division_setup.name, teams);
                division.id = convert::int(division_id)?;
                division.conference_id = convert::int(conference_id)?;
                divisions.push(division);
            }

            let mut conference = Conference::build(&conference_setup.name, divisions);
            conference.id = convert::int(conference_id)?;
            conferences.push(conference);
        }

        return Ok(League::build(&self.name, self.series_length, conferences));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const SETUP: &str = r#"{
        "name": "Test League",
        "conferences": [
            { "name": "North", "divisions": [
                { "name": "Coast", "teams": [
                    { "name": "A", "strength": "1.2500" },
                    { "name": "B", "strength": 0.75 }
                ]}
            ]},
            { "name": "South", "divisions": [
                { "name": "Hills", "teams": [
                    { "name": "C", "strength": "2" },
                    { "name": "D", "strength": "1" },
                    { "name": "E", "strength": "3" },
                    { "name": "F", "strength": "0.5" }
                ]}
            ]}
        ]
    }"#;

    #[test]
    fn setup_builds_numbered_tree() {
        let setup = LeagueSetup::from_json(SETUP).unwrap();
        assert_eq!(setup.series_length, 3);

        let league = setup.build_league().unwrap();
        let divisions: Vec<&Division> = league.divisions().collect();
        assert_eq!(divisions.len(), 2);
        assert_eq!(divisions[1].id, 2);
        assert_eq!(divisions[1].conference_id, 2);

        let ids: Vec<u16> = divisions[1].teams.iter().map(|team| team.id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6]);
        assert_eq!(divisions[0].teams[0].strength.to_string(), "1.2500");
    }

    #[test]
    fn odd_division_is_rejected() {
        let json = SETUP.replace(r#"{ "name": "F", "strength": "0.5" }"#, "").replace(r#""3" },"#, r#""3" }"#);
        assert!(matches!(LeagueSetup::from_json(&json), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn bad_strength_is_a_setup_error() {
        let json = SETUP.replace("\"1.2500\"", "\"1.23456\"");
        assert!(matches!(LeagueSetup::from_json(&json), Err(Error::Setup(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = LeagueSetup::load(&PathBuf::from("does/not/exist.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn shipped_setup_is_valid() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/league.json");
        let league = LeagueSetup::load(&path).unwrap().build_league().unwrap();
        assert!(league.divisions().count() > 1);
    }
}
