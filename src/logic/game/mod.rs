pub mod score;
pub mod strength;

use rand::Rng;
use serde::Serialize;
use serde_json::json;

use crate::{error::{Error, Result}, logic::{team::Strength, types::{GameId, Points, SeriesId, TeamId}}};

#[derive(Debug, Serialize)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    RegularTime,
    ExtraTime,
}

#[derive(Debug, Serialize)]
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[default]
    Unset,
    HomeWin,
    AwayWin,
    Draw,
}

impl Outcome {
    // Single-character code used in storage.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::HomeWin => Some("1"),
            Self::AwayWin => Some("2"),
            Self::Draw => Some("X"),
            Self::Unset => None,
        }
    }

    pub fn from_code(code: Option<&str>) -> Result<Self> {
        match code {
            Some("1") => Ok(Self::HomeWin),
            Some("2") => Ok(Self::AwayWin),
            Some("X") => Ok(Self::Draw),
            None => Ok(Self::Unset),
            Some(other) => Err(Error::InvalidInput(format!("unknown outcome code {other:?}"))),
        }
    }
}

#[derive(Debug, Serialize)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

// A team's role in a game.
#[derive(Debug)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GamePart {
    pub team_id: TeamId,
    pub location: Location,
}

#[derive(Debug)]
#[derive(Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub home_advantage: bool,
    pub score: String,
    pub outcome: Outcome,
    pub series_id: Option<SeriesId>,
}

// Everything a played game changes, for the caller to apply.
#[derive(Debug)]
#[derive(Clone, PartialEq)]
pub struct GameResult {
    pub game_id: GameId,
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub outcome: Outcome,
    pub score: String,
    pub home_points: Points,
    pub away_points: Points,
    pub extra_time: bool,
}

impl GameResult {
    // Points earned by the given team, if it played.
    pub fn points_for(&self, team_id: TeamId) -> Option<Points> {
        if team_id == self.home_id { return Some(self.home_points); }
        if team_id == self.away_id { return Some(self.away_points); }
        None
    }

    // The team that won the game, if any.
    pub fn winner(&self) -> Option<TeamId> {
        match self.outcome {
            Outcome::HomeWin => Some(self.home_id),
            Outcome::AwayWin => Some(self.away_id),
            _ => None,
        }
    }
}

// Basics.
impl Game {
    pub const DEFAULT_SCORE: &'static str = "0-0";

    pub fn build(home_id: TeamId, away_id: TeamId) -> Result<Self> {
        if home_id == away_id {
            return Err(Error::InvalidInput(format!("team {home_id} cannot play itself")));
        }

        Ok(Self {
            id: GameId::default(),
            home_id,
            away_id,
            home_advantage: true,
            score: Self::DEFAULT_SCORE.to_string(),
            outcome: Outcome::Unset,
            series_id: None,
        })
    }

    // The role-tagged home and away parts.
    pub fn parts(&self) -> [GamePart; 2] {
        [
            GamePart { team_id: self.home_id, location: Location::Home },
            GamePart { team_id: self.away_id, location: Location::Away },
        ]
    }

    pub fn is_team_playing(&self, team_id: TeamId) -> bool {
        team_id == self.home_id || team_id == self.away_id
    }

    // Check if the game is between these two teams, either way round.
    pub fn is_between(&self, a: TeamId, b: TeamId) -> bool {
        (self.home_id == a && self.away_id == b) || (self.home_id == b && self.away_id == a)
    }

    pub fn is_played(&self) -> bool {
        self.outcome != Outcome::Unset
    }

    pub fn winner(&self) -> Option<TeamId> {
        match self.outcome {
            Outcome::HomeWin => Some(self.home_id),
            Outcome::AwayWin => Some(self.away_id),
            _ => None,
        }
    }

    // Get info for a day screen in JSON.
    pub fn package(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "home": self.home_id,
            "away": self.away_id,
            "home_advantage": self.home_advantage,
            "score": self.score,
            "outcome": self.outcome.code(),
        })
    }
}

// Functional.
impl Game {
    // Play the game without touching it.
    // A draw goes to extra time if asked to, which may still end in a draw.
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R, home: Strength, away: Strength, extra_time_on_draw: bool) -> Result<GameResult> {
        let mut resolution = strength::resolve(rng, home, away, self.home_advantage);
        let mut phase = MatchPhase::RegularTime;

        if extra_time_on_draw && resolution.outcome == Outcome::Draw {
            resolution = strength::resolve(rng, home, away, self.home_advantage);
            phase = MatchPhase::ExtraTime;
        }

        let score = score::generate(rng, phase, resolution.outcome)?;

        Ok(GameResult {
            game_id: self.id,
            home_id: self.home_id,
            away_id: self.away_id,
            outcome: resolution.outcome,
            score: score.to_string(),
            home_points: resolution.home_points,
            away_points: resolution.away_points,
            extra_time: phase == MatchPhase::ExtraTime,
        })
    }

    // Write a result into the game.
    pub fn apply(&mut self, result: &GameResult) {
        self.outcome = result.outcome;
        self.score = result.score.clone();
    }
}
