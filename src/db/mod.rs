// The league database.
mod game;
mod league;
mod schedule;
mod team;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::{error::Result, logic::{io::LeagueSetup, league::League, types::Db}};

// Open the database and run the migrations.
// An in-memory database lives as long as its only connection, so the pool never lets it go.
pub async fn setup(url: &str) -> Result<Db> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options).await?;

    sqlx::migrate!("./sql/migrations").run(&db).await?;

    info!("database ready at {url}");
    return Ok(db);
}

// Save a league from its setup and return it with database ids.
pub async fn initialise(db: &Db, setup: &LeagueSetup) -> Result<League> {
    let mut league = setup.build_league()?;

    let mut tx = db.begin().await?;
    league.save(&mut tx).await?;
    tx.commit().await?;

    info!("league {} saved with {} divisions", league.name, league.divisions().count());
    return Ok(league);
}
