// Post-season series and how they are seeded from the standings.
use std::{fmt, str::FromStr};

use serde_json::json;

use crate::{error::{Error, Result}, logic::{game::Game, schedule::Day, types::{DayNumber, SeriesId, TeamId}}};

#[derive(Debug)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Playoff,    // Upper half of the standings.
    Playout,    // Lower half.
}

impl Bracket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playoff => "playoff",
            Self::Playout => "playout",
        }
    }
}

impl FromStr for Bracket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "playoff" => Ok(Self::Playoff),
            "playout" => Ok(Self::Playout),
            _ => Err(Error::InvalidInput(format!("unknown bracket {s:?}"))),
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playoff => write!(f, "Playoff"),
            Self::Playout => write!(f, "Playout"),
        }
    }
}

// A team's role in a series. The lead team is the better seed.
#[derive(Debug)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SeriesPart {
    pub team_id: TeamId,
    pub lead: bool,
}

#[derive(Debug)]
#[derive(Clone, PartialEq)]
pub struct Series {
    pub id: SeriesId,
    pub name: String,
    pub length: u8,
    pub bracket: Bracket,
    pub lead_id: TeamId,
    pub other_id: TeamId,
    pub winner_id: Option<TeamId>,
    pub loser_id: Option<TeamId>,
}

// Basics.
impl Series {
    pub const DEFAULT_LENGTH: u8 = 3;

    pub fn build(id: SeriesId, name: &str, bracket: Bracket, lead_id: TeamId, other_id: TeamId, length: u8) -> Result<Self> {
        if lead_id == other_id {
            return Err(Error::InvalidInput(format!("team {lead_id} cannot face itself in a series")));
        }
        if length == 0 {
            return Err(Error::InvalidInput("a series needs at least one game".to_string()));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            length,
            bracket,
            lead_id,
            other_id,
            winner_id: None,
            loser_id: None,
        })
    }

    pub fn parts(&self) -> [SeriesPart; 2] {
        [
            SeriesPart { team_id: self.lead_id, lead: true },
            SeriesPart { team_id: self.other_id, lead: false },
        ]
    }

    pub fn is_decided(&self) -> bool {
        self.winner_id.is_some()
    }

    // Get info for a bracket screen in JSON.
    pub fn package(&self, days: &[Day]) -> serde_json::Value {
        let [lead_wins, other_wins] = self.tally(days);
        json!({
            "id": self.id,
            "name": self.name,
            "bracket": self.bracket.as_str(),
            "length": self.length,
            "lead": { "id": self.lead_id, "wins": lead_wins },
            "other": { "id": self.other_id, "wins": other_wins },
            "winner": self.winner_id,
            "loser": self.loser_id,
        })
    }
}

// Functional.
impl Series {
    // The games of this series, in day order.
    pub fn games<'a>(&self, days: &'a [Day]) -> Vec<&'a Game> {
        days.iter()
            .flat_map(|day| day.games.iter())
            .filter(|game| game.series_id == Some(self.id) && game.is_between(self.lead_id, self.other_id))
            .collect()
    }

    // Count the game wins of the lead and the other team.
    pub fn tally(&self, days: &[Day]) -> [u8; 2] {
        let mut wins = [0, 0];
        for game in self.games(days) {
            match game.winner() {
                Some(id) if id == self.lead_id => wins[0] += 1,
                Some(_) => wins[1] += 1,
                None => (),
            }
        }

        return wins;
    }

    // Settle the series once its games are played. A level tally goes to the lead team.
    pub fn decide(&mut self, days: &[Day]) {
        let [lead_wins, other_wins] = self.tally(days);
        let (winner, loser) = match other_wins > lead_wins {
            true => (self.other_id, self.lead_id),
            false => (self.lead_id, self.other_id),
        };

        self.winner_id = Some(winner);
        self.loser_id = Some(loser);
    }
}

// Pair the best team of a bracket half with the worst, second best with second worst and so on.
// A half with an odd count leaves its middle team without a series.
pub fn pair_half(half: &[TeamId]) -> Vec<[TeamId; 2]> {
    let count = half.len();
    (0..count / 2).map(|i| [half[i], half[count - 1 - i]]).collect()
}

// Build the playoff and playout series from standings ordered best first.
// Series get ids 1, 2, ... that only mean something within their schedule until saved.
pub fn seed_series(standings: &[TeamId], length: u8) -> Result<Vec<Series>> {
    let (upper, lower) = standings.split_at(standings.len() / 2);

    let mut series = Vec::new();
    for (bracket, half) in [(Bracket::Playoff, upper), (Bracket::Playout, lower)] {
        for (i, [lead, other]) in pair_half(half).into_iter().enumerate() {
            let id = SeriesId::try_from(series.len() + 1).map_err(|_| Error::InvalidInput("too many series".to_string()))?;
            let name = format!("{bracket} series {}", i + 1);
            series.push(Series::build(id, &name, bracket, lead, other, length)?);
        }
    }

    return Ok(series);
}

// Lay the series games out over days 1..=length, alternating home advantage
// starting with the lead team at home. Every series runs its full length.
pub fn generate_matchdays(series: &[Series]) -> Result<Vec<Day>> {
    let length = series.iter().map(|s| s.length).max().unwrap_or(0);
    let mut days: Vec<Day> = (1..=DayNumber::from(length)).map(Day::build).collect();

    for s in series.iter() {
        let mut lead_at_home = true;
        for day in days.iter_mut().take(s.length.into()) {
            let mut game = match lead_at_home {
                true => Game::build(s.lead_id, s.other_id)?,
                false => Game::build(s.other_id, s.lead_id)?,
            };
            game.series_id = Some(s.id);
            day.games.push(game);

            lead_at_home = !lead_at_home;
        }
    }

    return Ok(days);
}
