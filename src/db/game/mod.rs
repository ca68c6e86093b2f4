use sqlx::{FromRow, Row, SqliteConnection, sqlite::SqliteRow};

use crate::{error::Result, logic::{game::{Game, GamePart, Outcome}, types::{DayId, GameId, ScheduleId}}};

impl FromRow<'_, SqliteRow> for Game {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let code: Option<String> = row.try_get("outcome")?;
        let outcome = Outcome::from_code(code.as_deref()).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            id: row.try_get("id")?,
            home_id: row.try_get("home_id")?,
            away_id: row.try_get("away_id")?,
            home_advantage: row.try_get("home_advantage")?,
            score: row.try_get("score")?,
            outcome,
            series_id: row.try_get("series_id")?,
        })
    }
}

impl Game {
    pub const SELECT_QUERY: &'static str = "
    SELECT Game.*, Home.team_id AS home_id, Away.team_id AS away_id FROM Game

    INNER JOIN GamePart Home ON Home.game_id = Game.id AND Home.location = 'home'
    INNER JOIN GamePart Away ON Away.game_id = Game.id AND Away.location = 'away'
    INNER JOIN Day ON Day.id = Game.day_id";

    // Get every game of a schedule with the day it belongs to, in day order.
    pub async fn fetch_by_schedule(conn: &mut SqliteConnection, schedule_id: ScheduleId) -> Result<Vec<(DayId, Self)>> {
        let query = Self::SELECT_QUERY;
        let rows = sqlx::query(format!("
            {query}
            WHERE Day.schedule_id = $1
            ORDER BY Day.number, Game.id",
        ).as_str())
        .bind(schedule_id)
        .fetch_all(&mut *conn).await?;

        let mut games = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            games.push((row.try_get("day_id")?, Self::from_row(row)?));
        }

        return Ok(games);
    }

    pub async fn save(&mut self, conn: &mut SqliteConnection, day_id: DayId) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Game (home_advantage, score, outcome, day_id, series_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id"
        ).bind(self.home_advantage)
        .bind(self.score.as_str())
        .bind(self.outcome.code())
        .bind(day_id)
        .bind(self.series_id)
        .fetch_one(&mut *conn).await?;

        for part in self.parts() {
            part.save(conn, self.id).await?;
        }

        return Ok(());
    }

    // Save the result of a played game.
    pub async fn save_result(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            "UPDATE Game SET score = $1, outcome = $2
            WHERE id = $3"
        ).bind(self.score.as_str())
        .bind(self.outcome.code())
        .bind(self.id)
        .execute(&mut *conn).await?;

        return Ok(());
    }
}

impl GamePart {
    async fn save(&self, conn: &mut SqliteConnection, game_id: GameId) -> Result<()> {
        sqlx::query(
            "INSERT INTO GamePart (game_id, team_id, location)
            VALUES ($1, $2, $3)"
        ).bind(game_id)
        .bind(self.team_id)
        .bind(self.location.as_str())
        .execute(&mut *conn).await?;

        return Ok(());
    }
}
