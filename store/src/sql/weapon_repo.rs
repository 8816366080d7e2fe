//! SQLite-backed implementation of [`WeaponRepository`].

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::RepoResult;
use crate::models::{Entity, Id, Weapon};
use crate::repository::{Repository, WeaponRepository};

const SELECT_WEAPON: &str = "SELECT WEAPON_ID, NAME, TYPE FROM WEAPON";

#[derive(sqlx::FromRow)]
pub(crate) struct WeaponRow {
    #[sqlx(rename = "WEAPON_ID")]
    weapon_id: i64,
    #[sqlx(rename = "NAME")]
    name: String,
    #[sqlx(rename = "TYPE")]
    kind: String,
}

impl From<WeaponRow> for Weapon {
    fn from(row: WeaponRow) -> Self {
        Weapon {
            id: row.weapon_id,
            name: row.name,
            kind: row.kind,
        }
    }
}

async fn fetch_weapon(pool: &SqlitePool, id: Id) -> RepoResult<Option<Weapon>> {
    let row: Option<WeaponRow> = sqlx::query_as(&format!("{SELECT_WEAPON} WHERE WEAPON_ID = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Weapon::from))
}

pub struct SqlWeaponRepository {
    pool: SqlitePool,
}

impl SqlWeaponRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Id, Weapon> for SqlWeaponRepository {
    async fn save(&self, model: &mut Weapon) -> RepoResult<()> {
        if model.is_new() {
            let result = sqlx::query("INSERT INTO WEAPON (NAME, TYPE) VALUES (?, ?)")
                .bind(&model.name)
                .bind(&model.kind)
                .execute(&self.pool)
                .await?;
            model.set_id(result.last_insert_rowid());
        } else {
            sqlx::query(
                "INSERT INTO WEAPON (WEAPON_ID, NAME, TYPE) VALUES (?, ?, ?) \
                 ON CONFLICT(WEAPON_ID) DO UPDATE SET NAME = excluded.NAME, TYPE = excluded.TYPE",
            )
            .bind(model.id)
            .bind(&model.name)
            .bind(&model.kind)
            .execute(&self.pool)
            .await?;
        }
        tracing::debug!(id = model.id, "Saved weapon");
        Ok(())
    }

    async fn delete(&self, model: &Weapon) -> RepoResult<()> {
        sqlx::query("DELETE FROM WEAPON WHERE WEAPON_ID = ?")
            .bind(model.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Weapon>> {
        fetch_weapon(&self.pool, id).await
    }

    async fn get_all(&self) -> RepoResult<Vec<Weapon>> {
        let rows: Vec<WeaponRow> = sqlx::query_as(SELECT_WEAPON).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Weapon::from).collect())
    }
}

#[async_trait]
impl WeaponRepository for SqlWeaponRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Weapon>> {
        let row: Option<WeaponRow> =
            sqlx::query_as(&format!("{SELECT_WEAPON} WHERE NAME = ? ORDER BY WEAPON_ID LIMIT 1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Weapon::from))
    }
}
