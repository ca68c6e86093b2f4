// Resolving a game outcome from the two teams' strengths.
use rand::Rng;
use rust_decimal::{prelude::FromPrimitive, Decimal};

use crate::logic::{game::Outcome, team::Strength, types::Points};

const POINTS_FOR_WIN: Points = 3;
const POINTS_FOR_DRAW: Points = 1;
const POINTS_FOR_LOSS: Points = 0;

// What a game ended in, and how many points each side earns from it.
#[derive(Debug)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub home_points: Points,
    pub away_points: Points,
}

impl Resolution {
    fn build(outcome: Outcome) -> Self {
        let (home_points, away_points) = match outcome {
            Outcome::HomeWin => (POINTS_FOR_WIN, POINTS_FOR_LOSS),
            Outcome::AwayWin => (POINTS_FOR_LOSS, POINTS_FOR_WIN),
            _ => (POINTS_FOR_DRAW, POINTS_FOR_DRAW),
        };

        Self { outcome, home_points, away_points }
    }
}

// Give the home team its advantage, if it has one.
pub fn effective_home_strength(home: Strength, home_advantage: bool) -> Decimal {
    match home_advantage {
        true => home.value() * Decimal::TWO,
        false => home.value(),
    }
}

// Draw a luck value between 0 and the given strength.
fn luck<R: Rng + ?Sized>(rng: &mut R, strength: Decimal) -> Decimal {
    let draw = Decimal::from_f64(rng.random::<f64>()).unwrap_or_default();
    strength * draw
}

// Decide the outcome from the luck-adjusted strengths.
// A ratio above 2 is a home win, below 0.5 an away win, anything between a draw.
pub fn decide(luck_home: Decimal, luck_away: Decimal) -> Resolution {
    let outcome = match luck_home.checked_div(luck_away) {
        Some(ratio) if ratio > Decimal::TWO => Outcome::HomeWin,
        Some(ratio) if ratio < Decimal::from_parts(5, 0, 0, false, 1) => Outcome::AwayWin,
        Some(_) => Outcome::Draw,

        // Away luck was zero.
        None if luck_home > Decimal::ZERO => Outcome::HomeWin,
        None => Outcome::Draw,
    };

    Resolution::build(outcome)
}

// Play the game out: home advantage, luck and the decision.
pub fn resolve<R: Rng + ?Sized>(rng: &mut R, home: Strength, away: Strength, home_advantage: bool) -> Resolution {
    let luck_home = luck(rng, effective_home_strength(home, home_advantage));
    let luck_away = luck(rng, away.value());
    decide(luck_home, luck_away)
}
