use rand::Rng;
use sqlx::SqliteConnection;
use tracing::info;

use crate::{error::Result, logic::{league::{Conference, Division, League}, schedule::Schedule, team::Team, types::{ConferenceId, Db, DivisionId, LeagueId}}};

impl League {
    // Load a whole league tree.
    pub async fn fetch_from_db(db: &Db, id: LeagueId) -> Result<Self> {
        let mut conn = db.acquire().await?;

        let (name, series_length): (String, u8) = sqlx::query_as(
            "SELECT name, series_length FROM League
            WHERE id = $1"
        ).bind(id)
        .fetch_one(&mut *conn).await?;

        let conference_rows: Vec<(ConferenceId, String)> = sqlx::query_as(
            "SELECT id, name FROM Conference
            WHERE league_id = $1
            ORDER BY id"
        ).bind(id)
        .fetch_all(&mut *conn).await?;

        let mut conferences = Vec::new();
        for (conference_id, conference_name) in conference_rows {
            let mut conference = Conference::build(&conference_name, Division::fetch_by_conference(&mut conn, conference_id).await?);
            conference.id = conference_id;
            conference.league_id = id;
            conferences.push(conference);
        }

        let mut league = League::build(&name, series_length, conferences);
        league.id = id;
        return Ok(league);
    }

    // Get the id of the most recently created league, if there is one.
    pub async fn latest_id(db: &Db) -> Result<Option<LeagueId>> {
        let id = sqlx::query_scalar("SELECT MAX(id) FROM League")
            .fetch_one(db).await?;

        return Ok(id);
    }

    // Insert the whole tree, giving everything its database id.
    pub async fn save(&mut self, conn: &mut SqliteConnection) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO League (name, series_length)
            VALUES ($1, $2)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.series_length)
        .fetch_one(&mut *conn).await?;

        for conference in self.conferences.iter_mut() {
            conference.save(conn, self.id).await?;
        }

        return Ok(());
    }

    // The league calls below work on a copy of the tree in one transaction.
    // The copy replaces the league only once the transaction is committed.
    pub async fn create_regular_season_and_save(&mut self, db: &Db) -> Result<()> {
        let mut next = self.clone();
        let mut tx = db.begin().await?;
        for division in next.divisions_mut() {
            division.create_regular_season_and_save(&mut tx).await?;
        }
        tx.commit().await?;

        *self = next;
        info!("{}: regular season created", self.name);
        return Ok(());
    }

    pub async fn play_regular_season_day_and_save<R: Rng + ?Sized>(&mut self, db: &Db, rng: &mut R) -> Result<bool> {
        let mut next = self.clone();
        let mut tx = db.begin().await?;
        let mut all_completed = true;
        for division in next.divisions_mut().filter(|division| !division.schedule.is_post_season()) {
            all_completed &= division.play_regular_season_day_and_save(&mut tx, rng).await?;
        }
        tx.commit().await?;

        *self = next;
        return Ok(all_completed);
    }

    pub async fn create_post_season_and_save(&mut self, db: &Db, length: u8) -> Result<usize> {
        let mut next = self.clone();
        let mut tx = db.begin().await?;
        let mut seeded = 0;
        for division in next.divisions_mut() {
            if division.create_post_season_and_save(&mut tx, length).await? {
                seeded += 1;
            }
        }
        tx.commit().await?;

        *self = next;
        info!("{}: post-season created in {seeded} divisions", self.name);
        return Ok(seeded);
    }

    pub async fn play_post_season_day_and_save<R: Rng + ?Sized>(&mut self, db: &Db, rng: &mut R) -> Result<bool> {
        let mut next = self.clone();
        let mut tx = db.begin().await?;
        let mut all_completed = true;
        for division in next.divisions_mut().filter(|division| division.schedule.is_post_season()) {
            all_completed &= division.play_post_season_day_and_save(&mut tx, rng).await?;
        }
        tx.commit().await?;

        *self = next;
        return Ok(all_completed);
    }
}

impl Conference {
    async fn save(&mut self, conn: &mut SqliteConnection, league_id: LeagueId) -> Result<()> {
        self.league_id = league_id;
        self.id = sqlx::query_scalar(
            "INSERT INTO Conference (name, league_id)
            VALUES ($1, $2)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(league_id)
        .fetch_one(&mut *conn).await?;

        for division in self.divisions.iter_mut() {
            division.save(conn, self.id).await?;
        }

        return Ok(());
    }
}

impl Division {
    async fn fetch_by_conference(conn: &mut SqliteConnection, conference_id: ConferenceId) -> Result<Vec<Self>> {
        let rows: Vec<(DivisionId, String)> = sqlx::query_as(
            "SELECT id, name FROM Division
            WHERE conference_id = $1
            ORDER BY id"
        ).bind(conference_id)
        .fetch_all(&mut *conn).await?;

        let mut divisions = Vec::new();
        for (id, name) in rows {
            let mut division = Division::build(&name, Team::fetch_by_division(conn, id).await?);
            division.id = id;
            division.conference_id = conference_id;
            division.schedule = Schedule::fetch_by_division(conn, id).await?;
            divisions.push(division);
        }

        return Ok(divisions);
    }

    async fn save(&mut self, conn: &mut SqliteConnection, conference_id: ConferenceId) -> Result<()> {
        self.conference_id = conference_id;
        self.id = sqlx::query_scalar(
            "INSERT INTO Division (name, conference_id)
            VALUES ($1, $2)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(conference_id)
        .fetch_one(&mut *conn).await?;

        for team in self.teams.iter_mut() {
            team.save(conn, self.id).await?;
        }
        self.schedule.save(conn, self.id).await?;

        return Ok(());
    }

    async fn save_standings(&self, conn: &mut SqliteConnection) -> Result<()> {
        for team in self.teams.iter() {
            team.save_standing(conn).await?;
        }

        return Ok(());
    }

    pub async fn create_regular_season_and_save(&mut self, conn: &mut SqliteConnection) -> Result<()> {
        self.create_regular_season()?;
        self.save_standings(conn).await?;
        self.schedule.save_fixtures(conn).await
    }

    pub async fn play_regular_season_day_and_save<R: Rng + ?Sized>(&mut self, conn: &mut SqliteConnection, rng: &mut R) -> Result<bool> {
        let completed = self.play_regular_season_day(rng)?;
        self.schedule.save_day(conn, self.schedule.current_day).await?;
        self.schedule.save_state(conn).await?;
        self.save_standings(conn).await?;

        return Ok(completed);
    }

    // Seed and save the post-season. Returns false if the regular season was not over.
    pub async fn create_post_season_and_save(&mut self, conn: &mut SqliteConnection, length: u8) -> Result<bool> {
        if !self.create_post_season(length)? {
            return Ok(false);
        }

        self.save_standings(conn).await?;
        self.schedule.save_fixtures(conn).await?;
        return Ok(true);
    }

    pub async fn play_post_season_day_and_save<R: Rng + ?Sized>(&mut self, conn: &mut SqliteConnection, rng: &mut R) -> Result<bool> {
        let completed = self.play_post_season_day(rng)?;
        self.schedule.save_day(conn, self.schedule.current_day).await?;
        self.schedule.save_state(conn).await?;
        if completed {
            self.schedule.save_series_results(conn).await?;
        }

        return Ok(completed);
    }
}
