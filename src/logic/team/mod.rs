use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;

use crate::{error::{Error, Result}, logic::types::{DivisionId, Points, TeamId}};

// Fixed-point team strength. At most 4 decimal places and 7 digits in total.
#[derive(Debug, Serialize, Deserialize)]
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Strength(Decimal);

impl Strength {
    pub const DECIMAL_PLACES: u32 = 4;
    const MAX_DIGITS: u32 = 7;

    // Build a strength, rejecting values that would lose precision in storage.
    pub fn build(value: Decimal) -> Result<Self> {
        let value = value.normalize();
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidInput(format!("strength {value} is negative")));
        }
        if value.scale() > Self::DECIMAL_PLACES {
            return Err(Error::InvalidInput(format!("strength {value} has more than {} decimal places", Self::DECIMAL_PLACES)));
        }

        let limit = Decimal::from(10u32.pow(Self::MAX_DIGITS - Self::DECIMAL_PLACES));
        if value >= limit {
            return Err(Error::InvalidInput(format!("strength {value} is not below {limit}")));
        }

        return Ok(Self(value.abs()));
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Strength {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::build(value)
    }
}

impl From<Strength> for Decimal {
    fn from(strength: Strength) -> Self {
        strength.0
    }
}

impl FromStr for Strength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::build(Decimal::from_str(s.trim())?)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

#[derive(Debug)]
#[derive(Default, Clone, PartialEq)]
#[derive(FromRow)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub strength: Strength,
    pub points: Points,
    pub playoff: bool,  // Whether the team made the upper half of the standings.
    pub division_id: DivisionId,
}

// Basics.
impl Team {
    pub fn build(name: &str, strength: Strength) -> Self {
        Self {
            name: name.to_string(),
            strength,
            ..Default::default()
        }
    }

    // Get info for a standings screen in JSON.
    pub fn package(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "strength": self.strength.to_string(),
            "points": self.points,
            "playoff": self.playoff,
        })
    }
}

// Functional.
impl Team {
    // Saturates at the maximum.
    pub fn update_points(&mut self, value: Points) {
        self.points = self.points.saturating_add(value);
    }

    // Clear everything a previous season left behind.
    pub fn reset_standing(&mut self) {
        self.points = 0;
        self.playoff = false;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn strength_keeps_four_decimal_places() {
        let strength: Strength = "1.2345".parse().unwrap();
        assert_eq!(strength.value(), dec!(1.2345));
        assert_eq!(strength.to_string(), "1.2345");
        assert_eq!(Strength::build(dec!(2)).unwrap().to_string(), "2.0000");
    }

    #[test]
    fn strength_rejects_lossy_or_negative_values() {
        assert!(Strength::build(dec!(1.23456)).is_err());
        assert!(Strength::build(dec!(-0.5)).is_err());
        assert!(Strength::build(dec!(1000)).is_err());
        assert!(Strength::build(dec!(999.9999)).is_ok());

        // Trailing zeroes do not count as precision.
        assert!(Strength::build(dec!(1.50000)).is_ok());
    }

    #[test]
    fn strength_deserializes_from_string_or_number() {
        let from_str: Strength = serde_json::from_str("\"0.7500\"").unwrap();
        let from_num: Strength = serde_json::from_str("0.75").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<Strength>("\"-1\"").is_err());
    }

    #[test]
    fn reset_clears_points_and_playoff_flag() {
        let mut team = Team::build("Ruiske", Strength::default());
        team.update_points(3);
        team.update_points(1);
        team.playoff = true;
        assert_eq!(team.points, 4);

        team.reset_standing();
        assert_eq!(team.points, 0);
        assert!(!team.playoff);
    }

    #[test]
    fn points_saturate_at_the_maximum() {
        let mut team = Team::build("Ruiske", Strength::default());
        team.points = Points::MAX - 1;
        team.update_points(3);
        assert_eq!(team.points, Points::MAX);
    }
}
