mod series;

use std::collections::HashMap;

use sqlx::SqliteConnection;
use tracing::debug;

use crate::{error::Result, logic::{game::Game, schedule::{Day, Schedule, series::Series}, types::{DayId, DayNumber, DivisionId, ScheduleId}}};

impl Schedule {
    // Load the schedule of a division with all its days, games and series.
    pub async fn fetch_by_division(conn: &mut SqliteConnection, division_id: DivisionId) -> Result<Self> {
        let (id, name, current_day, completed, post_season): (ScheduleId, String, DayNumber, bool, bool) = sqlx::query_as(
            "SELECT id, name, current_day, completed, post_season FROM Schedule
            WHERE division_id = $1"
        ).bind(division_id)
        .fetch_one(&mut *conn).await?;

        let mut days: Vec<Day> = sqlx::query_as::<_, (DayId, DayNumber)>(
            "SELECT id, number FROM Day
            WHERE schedule_id = $1
            ORDER BY number"
        ).bind(id)
        .fetch_all(&mut *conn).await?
        .into_iter()
        .map(|(day_id, number)| Day { id: day_id, number, games: Vec::new() })
        .collect();

        for (day_id, game) in Game::fetch_by_schedule(conn, id).await? {
            if let Some(day) = days.iter_mut().find(|day| day.id == day_id) {
                day.games.push(game);
            }
        }

        let series = Series::fetch_by_schedule(conn, id).await?;

        return Ok(Self { id, name, current_day, completed, post_season, days, series });
    }

    pub async fn save(&mut self, conn: &mut SqliteConnection, division_id: DivisionId) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Schedule (name, current_day, completed, post_season, division_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.current_day)
        .bind(self.completed)
        .bind(self.post_season)
        .bind(division_id)
        .fetch_one(&mut *conn).await?;

        return Ok(());
    }

    // Save the day counter and the phase flags.
    pub async fn save_state(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            "UPDATE Schedule SET current_day = $1, completed = $2, post_season = $3
            WHERE id = $4"
        ).bind(self.current_day)
        .bind(self.completed)
        .bind(self.post_season)
        .bind(self.id)
        .execute(&mut *conn).await?;

        return Ok(());
    }

    // Replace the stored days and series with the ones in memory.
    // Series ids are swapped from their schedule-local values to database ids, games included.
    pub async fn save_fixtures(&mut self, conn: &mut SqliteConnection) -> Result<()> {
        self.delete_fixtures(conn).await?;

        let mut series_ids = HashMap::new();
        for series in self.series.iter_mut() {
            let local_id = series.id;
            series.save(conn, self.id).await?;
            series_ids.insert(local_id, series.id);
        }

        for day in self.days.iter_mut() {
            day.save(conn, self.id).await?;
            for game in day.games.iter_mut() {
                game.series_id = game.series_id.and_then(|local_id| series_ids.get(&local_id).copied());
                game.save(conn, day.id).await?;
            }
        }

        debug!("{}: saved {} days and {} series", self.name, self.days.len(), self.series.len());
        return self.save_state(conn).await;
    }

    // Save the results of one day's games.
    pub async fn save_day(&self, conn: &mut SqliteConnection, number: DayNumber) -> Result<()> {
        if let Some(day) = self.day(number) {
            for game in day.games.iter() {
                game.save_result(conn).await?;
            }
        }

        return Ok(());
    }

    pub async fn save_series_results(&self, conn: &mut SqliteConnection) -> Result<()> {
        for series in self.series.iter() {
            series.save_result(conn).await?;
        }

        return Ok(());
    }

    // Remove every day, game and series of the schedule.
    async fn delete_fixtures(&self, conn: &mut SqliteConnection) -> Result<()> {
        let queries = [
            "DELETE FROM GamePart WHERE game_id IN (
                SELECT Game.id FROM Game
                INNER JOIN Day ON Day.id = Game.day_id
                WHERE Day.schedule_id = $1
            )",
            "DELETE FROM Game WHERE day_id IN (SELECT id FROM Day WHERE schedule_id = $1)",
            "DELETE FROM Day WHERE schedule_id = $1",
            "DELETE FROM SeriesPart WHERE series_id IN (SELECT id FROM Series WHERE schedule_id = $1)",
            "DELETE FROM Series WHERE schedule_id = $1",
        ];

        for query in queries {
            sqlx::query(query).bind(self.id).execute(&mut *conn).await?;
        }

        return Ok(());
    }
}

impl Day {
    pub async fn save(&mut self, conn: &mut SqliteConnection, schedule_id: ScheduleId) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Day (number, schedule_id)
            VALUES ($1, $2)
            RETURNING id"
        ).bind(self.number)
        .bind(schedule_id)
        .fetch_one(&mut *conn).await?;

        return Ok(());
    }
}
