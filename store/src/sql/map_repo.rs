//! SQLite-backed implementation of [`MapRepository`].

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::RepoResult;
use crate::models::{Entity, Id, Map};
use crate::repository::{MapRepository, Repository};

const SELECT_MAP: &str = "SELECT MAP_ID, NAME, TYPE FROM MAP";

#[derive(sqlx::FromRow)]
struct MapRow {
    #[sqlx(rename = "MAP_ID")]
    map_id: i64,
    #[sqlx(rename = "NAME")]
    name: String,
    #[sqlx(rename = "TYPE")]
    kind: String,
}

impl From<MapRow> for Map {
    fn from(row: MapRow) -> Self {
        Map {
            id: row.map_id,
            name: row.name,
            kind: row.kind,
        }
    }
}

pub struct SqlMapRepository {
    pool: SqlitePool,
}

impl SqlMapRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Id, Map> for SqlMapRepository {
    async fn save(&self, model: &mut Map) -> RepoResult<()> {
        if model.is_new() {
            let result = sqlx::query("INSERT INTO MAP (NAME, TYPE) VALUES (?, ?)")
                .bind(&model.name)
                .bind(&model.kind)
                .execute(&self.pool)
                .await?;
            model.set_id(result.last_insert_rowid());
        } else {
            sqlx::query(
                "INSERT INTO MAP (MAP_ID, NAME, TYPE) VALUES (?, ?, ?) \
                 ON CONFLICT(MAP_ID) DO UPDATE SET NAME = excluded.NAME, TYPE = excluded.TYPE",
            )
            .bind(model.id)
            .bind(&model.name)
            .bind(&model.kind)
            .execute(&self.pool)
            .await?;
        }
        tracing::debug!(id = model.id, "Saved map");
        Ok(())
    }

    async fn delete(&self, model: &Map) -> RepoResult<()> {
        sqlx::query("DELETE FROM MAP WHERE MAP_ID = ?")
            .bind(model.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Map>> {
        let row: Option<MapRow> = sqlx::query_as(&format!("{SELECT_MAP} WHERE MAP_ID = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Map::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Map>> {
        let rows: Vec<MapRow> = sqlx::query_as(SELECT_MAP).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Map::from).collect())
    }
}

#[async_trait]
impl MapRepository for SqlMapRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Map>> {
        let row: Option<MapRow> =
            sqlx::query_as(&format!("{SELECT_MAP} WHERE NAME = ? ORDER BY MAP_ID LIMIT 1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Map::from))
    }
}
