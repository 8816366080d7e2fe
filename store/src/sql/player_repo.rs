//! SQLite-backed implementation of [`PlayerRepository`].
//!
//! Saving a player never touches `AGENT_ID` / `WEAPON_ID`; those columns are
//! owned by the relationship repositories in [`super::relations`].

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::RepoResult;
use crate::models::{Entity, Id, Player};
use crate::repository::{PlayerRepository, Repository};

const SELECT_PLAYER: &str =
    r#"SELECT PLAYER_ID, USERNAME, DISPLAY_NAME, EMAIL, REGION, "RANK" FROM PLAYER"#;

#[derive(sqlx::FromRow)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct PlayerRow {
    player_id: i64,
    username: String,
    display_name: String,
    email: String,
    region: String,
    rank: String,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            id: row.player_id,
            username: row.username,
            display_name: row.display_name,
            email: row.email,
            region: row.region,
            rank: row.rank,
        }
    }
}

pub struct SqlPlayerRepository {
    pool: SqlitePool,
}

impl SqlPlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select_where(&self, clause: &str, value: &str) -> RepoResult<Vec<Player>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(&format!("{SELECT_PLAYER} WHERE {clause}"))
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Player::from).collect())
    }
}

#[async_trait]
impl Repository<Id, Player> for SqlPlayerRepository {
    async fn save(&self, model: &mut Player) -> RepoResult<()> {
        if model.is_new() {
            let result = sqlx::query(
                r#"INSERT INTO PLAYER (USERNAME, DISPLAY_NAME, EMAIL, REGION, "RANK")
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(&model.username)
            .bind(&model.display_name)
            .bind(&model.email)
            .bind(&model.region)
            .bind(&model.rank)
            .execute(&self.pool)
            .await?;
            model.set_id(result.last_insert_rowid());
        } else {
            sqlx::query(
                r#"INSERT INTO PLAYER (PLAYER_ID, USERNAME, DISPLAY_NAME, EMAIL, REGION, "RANK")
                   VALUES (?, ?, ?, ?, ?, ?)
                   ON CONFLICT(PLAYER_ID) DO UPDATE SET
                   USERNAME = excluded.USERNAME, DISPLAY_NAME = excluded.DISPLAY_NAME,
                   EMAIL = excluded.EMAIL, REGION = excluded.REGION, "RANK" = excluded."RANK""#,
            )
            .bind(model.id)
            .bind(&model.username)
            .bind(&model.display_name)
            .bind(&model.email)
            .bind(&model.region)
            .bind(&model.rank)
            .execute(&self.pool)
            .await?;
        }
        tracing::debug!(id = model.id, "Saved player");
        Ok(())
    }

    async fn delete(&self, model: &Player) -> RepoResult<()> {
        sqlx::query("DELETE FROM PLAYER WHERE PLAYER_ID = ?")
            .bind(model.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Player>> {
        let row: Option<PlayerRow> =
            sqlx::query_as(&format!("{SELECT_PLAYER} WHERE PLAYER_ID = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Player::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Player>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(SELECT_PLAYER).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Player::from).collect())
    }
}

#[async_trait]
impl PlayerRepository for SqlPlayerRepository {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<Player>> {
        let mut players = self
            .select_where("USERNAME = ? ORDER BY PLAYER_ID LIMIT 1", username)
            .await?;
        Ok(players.pop())
    }

    async fn get_by_region(&self, region: &str) -> RepoResult<Vec<Player>> {
        self.select_where("REGION = ?", region).await
    }

    async fn get_by_display_name(&self, display_name: &str) -> RepoResult<Vec<Player>> {
        self.select_where("DISPLAY_NAME = ?", display_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::Database;

    fn make_player(username: &str, region: &str) -> Player {
        Player {
            id: 0,
            username: username.to_string(),
            display_name: username.to_uppercase(),
            email: format!("{username}@example.com"),
            region: region.to_string(),
            rank: "Gold 2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_region_filter() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SqlPlayerRepository::new(db.pool().clone());

        repo.save(&mut make_player("tenz", "NA")).await.unwrap();
        repo.save(&mut make_player("shroud", "NA")).await.unwrap();
        repo.save(&mut make_player("boaster", "EU")).await.unwrap();

        let na = repo.get_by_region("NA").await.unwrap();
        assert_eq!(na.len(), 2);
        assert!(na.iter().all(|p| p.region == "NA"));
    }

    #[tokio::test]
    async fn test_username_and_display_name_lookup() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SqlPlayerRepository::new(db.pool().clone());

        let mut tenz = make_player("tenz", "NA");
        repo.save(&mut tenz).await.unwrap();

        assert_eq!(repo.get_by_username("tenz").await.unwrap(), Some(tenz.clone()));
        assert_eq!(repo.get_by_username("TENZ").await.unwrap(), None);
        assert_eq!(repo.get_by_display_name("TENZ").await.unwrap(), vec![tenz]);
    }

    #[tokio::test]
    async fn test_update_preserves_agent_assignment() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SqlPlayerRepository::new(db.pool().clone());

        sqlx::query("INSERT INTO AGENT (AGENT_ID, NAME) VALUES (3, 'Jett')")
            .execute(db.pool())
            .await
            .unwrap();

        let mut tenz = make_player("tenz", "NA");
        repo.save(&mut tenz).await.unwrap();
        sqlx::query("UPDATE PLAYER SET AGENT_ID = 3 WHERE PLAYER_ID = ?")
            .bind(tenz.id)
            .execute(db.pool())
            .await
            .unwrap();

        tenz.rank = "Radiant".to_string();
        repo.save(&mut tenz).await.unwrap();

        let (agent_id,): (Option<i64>,) =
            sqlx::query_as("SELECT AGENT_ID FROM PLAYER WHERE PLAYER_ID = ?")
                .bind(tenz.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(agent_id, Some(3));
        assert_eq!(repo.get(tenz.id).await.unwrap().unwrap().rank, "Radiant");
    }
}
