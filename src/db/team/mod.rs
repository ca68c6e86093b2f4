use sqlx::{Decode, Encode, Sqlite, SqliteConnection, encode::IsNull, error::BoxDynError, sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef}};

use crate::{error::Result, logic::{team::{Strength, Team}, types::DivisionId}};

// Strength is stored as text so no digits are lost on the way.
impl sqlx::Type<Sqlite> for Strength {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

impl<'q> Encode<'q, Sqlite> for Strength {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> std::result::Result<IsNull, BoxDynError> {
        Encode::<Sqlite>::encode(self.to_string(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Strength {
    fn decode(value: SqliteValueRef<'r>) -> std::result::Result<Self, BoxDynError> {
        let text = <String as Decode<Sqlite>>::decode(value)?;
        Ok(text.parse()?)
    }
}

impl Team {
    pub async fn fetch_by_division(conn: &mut SqliteConnection, division_id: DivisionId) -> Result<Vec<Self>> {
        let teams = sqlx::query_as(
            "SELECT * FROM Team
            WHERE division_id = $1
            ORDER BY id"
        ).bind(division_id)
        .fetch_all(&mut *conn).await?;

        return Ok(teams);
    }

    pub async fn save(&mut self, conn: &mut SqliteConnection, division_id: DivisionId) -> Result<()> {
        self.division_id = division_id;
        self.id = sqlx::query_scalar(
            "INSERT INTO Team (name, strength, points, playoff, division_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id"
        ).bind(self.name.as_str())
        .bind(self.strength)
        .bind(self.points)
        .bind(self.playoff)
        .bind(self.division_id)
        .fetch_one(&mut *conn).await?;

        return Ok(());
    }

    // Save the points and the playoff flag.
    pub async fn save_standing(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            "UPDATE Team SET points = $1, playoff = $2
            WHERE id = $3"
        ).bind(self.points)
        .bind(self.playoff)
        .bind(self.id)
        .execute(&mut *conn).await?;

        return Ok(());
    }
}
