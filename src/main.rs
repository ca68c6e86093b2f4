use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use tracing::info;

use league_sim::{config::Config, db, logic::{io::LeagueSetup, league::League, types::TeamId}};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let setup = LeagueSetup::load(&config.setup)
        .with_context(|| format!("loading league setup from {}", config.setup.display()))?;
    let db = db::setup(&config.database_url).await.context("opening the database")?;

    let mut rng = match config.seed {
        Some(seed) => {
            info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let created = db::initialise(&db, &setup).await?;
    let mut league = League::fetch_from_db(&db, created.id).await?;
    info!("{} loaded with {} divisions", league.name, league.divisions().count());

    league.create_regular_season_and_save(&db).await?;
    let mut days = 0;
    while !league.play_regular_season_day_and_save(&db, &mut rng).await? {
        days += 1;
    }
    info!("regular season over after {days} days");

    let length = config.series_length_or(league.series_length);
    league.create_post_season_and_save(&db, length).await?;
    while !league.play_post_season_day_and_save(&db, &mut rng).await? {}
    info!("post-season over");

    if config.json {
        let series: Vec<serde_json::Value> = league.divisions()
            .flat_map(|division| division.series().iter().map(|s| s.package(&division.schedule.days)))
            .collect();

        let output = json!({
            "standings": league.standings_package(),
            "series": series,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_league(&league);
    return Ok(());
}

fn print_league(league: &League) {
    println!("{}", league.name);
    for division in league.divisions() {
        println!();
        println!("{}", division.display_standings());

        for series in division.series() {
            let [lead_wins, other_wins] = series.tally(&division.schedule.days);
            let name = |id: TeamId| division.team(id).map(|team| team.name.as_str()).unwrap_or("?");
            let winner = series.winner_id.map(name).unwrap_or("undecided");
            println!(
                "  {}: {} vs {} ({lead_wins}-{other_wins}), winner {winner}",
                series.name, name(series.lead_id), name(series.other_id)
            );
        }
    }
}
