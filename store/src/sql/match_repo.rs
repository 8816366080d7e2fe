//! SQLite-backed implementation of [`MatchRepository`].
//!
//! `MATCH` is a reserved word in SQLite, so the table name is always quoted.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::RepoResult;
use crate::models::{Entity, Id, Match};
use crate::repository::{MatchRepository, Repository};

const SELECT_MATCH: &str =
    r#"SELECT MATCH_ID, PLAYED_ON, MAP_ID, OUTCOME FROM "MATCH""#;

#[derive(sqlx::FromRow)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct MatchRow {
    match_id: i64,
    played_on: NaiveDateTime,
    map_id: i64,
    outcome: String,
}

impl From<MatchRow> for Match {
    fn from(row: MatchRow) -> Self {
        Match {
            id: row.match_id,
            played_on: row.played_on,
            map_id: row.map_id,
            outcome: row.outcome,
        }
    }
}

async fn fetch_match(pool: &SqlitePool, id: Id) -> RepoResult<Option<Match>> {
    let row: Option<MatchRow> = sqlx::query_as(&format!("{SELECT_MATCH} WHERE MATCH_ID = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Match::from))
}

pub struct SqlMatchRepository {
    pool: SqlitePool,
}

impl SqlMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select_where<T>(&self, clause: &str, value: T) -> RepoResult<Vec<Match>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite> + Send + 'static,
    {
        let rows: Vec<MatchRow> = sqlx::query_as(&format!("{SELECT_MATCH} WHERE {clause}"))
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Match::from).collect())
    }
}

#[async_trait]
impl Repository<Id, Match> for SqlMatchRepository {
    async fn save(&self, model: &mut Match) -> RepoResult<()> {
        if model.is_new() {
            let result = sqlx::query(
                r#"INSERT INTO "MATCH" (PLAYED_ON, MAP_ID, OUTCOME) VALUES (?, ?, ?)"#,
            )
            .bind(model.played_on)
            .bind(model.map_id)
            .bind(&model.outcome)
            .execute(&self.pool)
            .await?;
            model.set_id(result.last_insert_rowid());
        } else {
            sqlx::query(
                r#"INSERT INTO "MATCH" (MATCH_ID, PLAYED_ON, MAP_ID, OUTCOME) VALUES (?, ?, ?, ?)
                   ON CONFLICT(MATCH_ID) DO UPDATE SET
                   PLAYED_ON = excluded.PLAYED_ON, MAP_ID = excluded.MAP_ID, OUTCOME = excluded.OUTCOME"#,
            )
            .bind(model.id)
            .bind(model.played_on)
            .bind(model.map_id)
            .bind(&model.outcome)
            .execute(&self.pool)
            .await?;
        }
        tracing::debug!(id = model.id, "Saved match");
        Ok(())
    }

    async fn delete(&self, model: &Match) -> RepoResult<()> {
        sqlx::query(r#"DELETE FROM "MATCH" WHERE MATCH_ID = ?"#)
            .bind(model.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Match>> {
        fetch_match(&self.pool, id).await
    }

    async fn get_all(&self) -> RepoResult<Vec<Match>> {
        let rows: Vec<MatchRow> = sqlx::query_as(SELECT_MATCH).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Match::from).collect())
    }
}

#[async_trait]
impl MatchRepository for SqlMatchRepository {
    async fn get_by_played_on(&self, played_on: NaiveDateTime) -> RepoResult<Vec<Match>> {
        self.select_where("PLAYED_ON = ?", played_on).await
    }

    async fn get_by_map_id(&self, map_id: Id) -> RepoResult<Vec<Match>> {
        self.select_where("MAP_ID = ?", map_id).await
    }
}
