use std::collections::HashMap;

use rand::{rngs::StdRng, SeedableRng};
use rust_decimal_macros::dec;

use league_sim::{db, logic::{game::{Outcome, strength}, io::LeagueSetup, league::League, schedule::{DayOutcome, Schedule, round_robin, series::{self, Bracket}}, team::Strength, types::TeamId}};

fn setup() -> LeagueSetup {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/league.json");
    LeagueSetup::load(&path).unwrap()
}

#[test]
fn four_team_round_robin_meets_both_ways() {
    let days = round_robin::generate_matchdays(&[1, 2, 3, 4]).unwrap();
    assert_eq!(days.len(), 6);
    assert!(days.iter().all(|day| day.games.len() == 2));

    let day_of = |home: TeamId, away: TeamId| days.iter()
        .position(|day| day.games.iter().any(|game| game.home_id == home && game.away_id == away))
        .unwrap();
    assert_ne!(day_of(1, 2), day_of(2, 1));
}

#[test]
fn lucky_home_side_takes_three_points() {
    let home: Strength = "4.0".parse().unwrap();
    assert_eq!(strength::effective_home_strength(home, true), dec!(8));

    let resolution = strength::decide(dec!(6.0), dec!(1.0));
    assert_eq!(resolution.outcome, Outcome::HomeWin);
    assert_eq!((resolution.home_points, resolution.away_points), (3, 0));
}

#[test]
fn seeding_gives_k_series_for_each_half_of_2k() {
    for k in 1..=4u16 {
        let standings: Vec<TeamId> = (1..=4 * k).collect();
        let seeded = series::seed_series(&standings, 3).unwrap();

        for bracket in [Bracket::Playoff, Bracket::Playout] {
            let half: Vec<_> = seeded.iter().filter(|s| s.bracket == bracket).collect();
            assert_eq!(half.len(), k as usize);
            assert!(half.iter().all(|s| s.lead_id < s.other_id));
        }
    }
}

#[test]
fn runner_completes_exactly_once() {
    let teams: Vec<TeamId> = (1..=6).collect();
    let strengths: HashMap<TeamId, Strength> = teams.iter().map(|id| (*id, Strength::default())).collect();
    let mut schedule = Schedule::build("Six");
    schedule.create_regular_season(&teams).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let outcomes: Vec<DayOutcome> = (0..=schedule.max_day())
        .map(|_| schedule.advance(&mut rng, &strengths).unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|outcome| **outcome == DayOutcome::Completed).count(), 1);
    assert_eq!(outcomes.last(), Some(&DayOutcome::Completed));
    assert_eq!(schedule.advance(&mut rng, &strengths).unwrap(), DayOutcome::AlreadyCompleted);

    // Zero strength on both sides is always a draw.
    assert!(schedule.games().all(|game| game.outcome == Outcome::Draw));
}

#[test]
fn seeded_seasons_repeat() {
    let play = |seed: u64| -> League {
        let mut league = setup().build_league().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        league.create_regular_season().unwrap();
        while !league.play_regular_season_day(&mut rng).unwrap() {}
        league.create_post_season(league.series_length).unwrap();
        while !league.play_post_season_day(&mut rng).unwrap() {}
        league
    };

    assert_eq!(play(1234), play(1234));
}

#[tokio::test]
async fn stored_season_matches_memory() {
    let db = db::setup("sqlite::memory:").await.unwrap();
    let mut league = db::initialise(&db, &setup()).await.unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    league.create_regular_season_and_save(&db).await.unwrap();
    while !league.play_regular_season_day_and_save(&db, &mut rng).await.unwrap() {}
    assert!(league.is_regular_season_over());

    let seeded = league.create_post_season_and_save(&db, league.series_length).await.unwrap();
    assert_eq!(seeded, league.divisions().count());
    while !league.play_post_season_day_and_save(&db, &mut rng).await.unwrap() {}

    let stored = League::fetch_from_db(&db, league.id).await.unwrap();
    assert_eq!(stored, league);

    let standings = stored.standings_package();
    assert_eq!(standings["conferences"].as_array().unwrap().len(), 2);
}

#[test]
fn divisions_of_different_sizes_finish_on_their_own_days() {
    let mut league = setup().build_league().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    league.create_regular_season().unwrap();

    // Coastal has 4 teams and is the first to finish.
    for _ in 0..7 {
        assert!(!league.play_regular_season_day(&mut rng).unwrap());
    }
    assert_eq!(league.create_post_season(league.series_length).unwrap(), 1);

    while !league.play_regular_season_day(&mut rng).unwrap() {}
    assert!(league.divisions().all(|division| division.schedule.completed || division.schedule.is_post_season()));
    assert_eq!(league.create_post_season(league.series_length).unwrap(), 2);

    while !league.play_post_season_day(&mut rng).unwrap() {}
    assert!(league.is_post_season_over());
}
