use sqlx::{Decode, Encode, FromRow, Row, Sqlite, SqliteConnection, encode::IsNull, error::BoxDynError, sqlite::{SqliteArgumentValue, SqliteRow, SqliteTypeInfo, SqliteValueRef}};

use crate::{error::Result, logic::{schedule::series::{Bracket, Series, SeriesPart}, types::{ScheduleId, SeriesId}}};

impl sqlx::Type<Sqlite> for Bracket {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

impl<'q> Encode<'q, Sqlite> for Bracket {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> std::result::Result<IsNull, BoxDynError> {
        Encode::<Sqlite>::encode(self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Bracket {
    fn decode(value: SqliteValueRef<'r>) -> std::result::Result<Self, BoxDynError> {
        let text = <String as Decode<Sqlite>>::decode(value)?;
        Ok(text.parse::<Bracket>()?)
    }
}

impl FromRow<'_, SqliteRow> for Series {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            length: row.try_get("length")?,
            bracket: row.try_get("bracket")?,
            lead_id: row.try_get("lead_id")?,
            other_id: row.try_get("other_id")?,
            winner_id: row.try_get("winner_id")?,
            loser_id: row.try_get("loser_id")?,
        })
    }
}

impl Series {
    pub async fn fetch_by_schedule(conn: &mut SqliteConnection, schedule_id: ScheduleId) -> Result<Vec<Self>> {
        let series = sqlx::query_as(
            "SELECT Series.*, Lead.team_id AS lead_id, Other.team_id AS other_id FROM Series
            INNER JOIN SeriesPart Lead ON Lead.series_id = Series.id AND Lead.lead = TRUE
            INNER JOIN SeriesPart Other ON Other.series_id = Series.id AND Other.lead = FALSE
            WHERE Series.schedule_id = $1
            ORDER BY Series.id"
        ).bind(schedule_id)
        .fetch_all(&mut *conn).await?;

        return Ok(series);
    }

    // Insert the series and give it its database id.
    pub async fn save(&mut self, conn: &mut SqliteConnection, schedule_id: ScheduleId) -> Result<()> {
        self.id = sqlx::query_scalar(
            "INSERT INTO Series (name, length, bracket, winner_id, loser_id, schedule_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.length)
        .bind(self.bracket)
        .bind(self.winner_id)
        .bind(self.loser_id)
        .bind(schedule_id)
        .fetch_one(&mut *conn).await?;

        for part in self.parts() {
            part.save(conn, self.id).await?;
        }

        return Ok(());
    }

    pub async fn save_result(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            "UPDATE Series SET winner_id = $1, loser_id = $2
            WHERE id = $3"
        ).bind(self.winner_id)
        .bind(self.loser_id)
        .bind(self.id)
        .execute(&mut *conn).await?;

        return Ok(());
    }
}

impl SeriesPart {
    async fn save(&self, conn: &mut SqliteConnection, series_id: SeriesId) -> Result<()> {
        sqlx::query(
            "INSERT INTO SeriesPart (series_id, team_id, lead)
            VALUES ($1, $2, $3)"
        ).bind(series_id)
        .bind(self.team_id)
        .bind(self.lead)
        .execute(&mut *conn).await?;

        return Ok(());
    }
}
