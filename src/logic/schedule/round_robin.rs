// Double round robin fixtures with the circle method.
//
// Teams sit in numbered slots. Slot 1 stays put while the others rotate one step
// after every round, so each team meets every other team once per half-season.
// The second half repeats the first with home and away reversed.

use crate::{error::{Error, Result}, logic::{game::Game, schedule::Day, types::{DayNumber, TeamId, convert}}};

// Generate every matchday of a double round robin for the given teams.
// Only even team counts are supported, as there is no bye handling.
pub fn generate_matchdays(teams: &[TeamId]) -> Result<Vec<Day>> {
    let n = teams.len();
    if n < 2 {
        return Err(Error::InvalidInput(format!("a round robin needs at least 2 teams, got {n}")));
    }
    if n % 2 != 0 {
        return Err(Error::InvalidInput(format!("a round robin needs an even number of teams, got {n}")));
    }

    let rounds: DayNumber = convert::int(n - 1)?;
    let mut first_half: Vec<Day> = (1..=rounds).map(Day::build).collect();
    let mut second_half: Vec<Day> = (1..=rounds).map(|r| Day::build(r + rounds)).collect();

    let mut slots = teams.to_vec();
    let mut anchor_swapped = false;

    for round in 0..first_half.len() {
        for [home, away] in pairings(&slots, anchor_swapped) {
            first_half[round].games.push(Game::build(home, away)?);
            second_half[round].games.push(Game::build(away, home)?);
        }

        anchor_swapped = !anchor_swapped;
        rotate(&mut slots);
    }

    first_half.append(&mut second_half);
    return Ok(first_half);
}

// Pair the slots up for one round. The first pair is the anchor (slots 1 and 2),
// after that slot k+1 hosts slot n-k+2.
fn pairings(slots: &[TeamId], anchor_swapped: bool) -> Vec<[TeamId; 2]> {
    let n = slots.len();
    let slot = |number: usize| slots[number - 1];

    let mut pairs = Vec::with_capacity(n / 2);
    pairs.push(match anchor_swapped {
        true => [slot(2), slot(1)],
        false => [slot(1), slot(2)],
    });

    for k in 2..=n / 2 {
        pairs.push([slot(k + 1), slot(n - k + 2)]);
    }

    return pairs;
}

// Slot 2 takes the team from the last slot, everyone else from slot 2 onwards moves up by one.
fn rotate(slots: &mut [TeamId]) {
    if slots.len() > 2 {
        slots[1..].rotate_right(1);
    }
}
