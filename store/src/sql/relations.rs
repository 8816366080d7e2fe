//! Relationship repositories over the join table and the player's
//! `AGENT_ID` / `WEAPON_ID` columns.
//!
//! Links that name a missing player, match, agent or weapon are silently
//! skipped: the statements guard on existence rather than letting the
//! foreign-key check fail.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::agent_repo::AgentRow;
use super::match_repo::MatchRow;
use super::player_repo::PlayerRow;
use super::weapon_repo::WeaponRow;
use crate::error::RepoResult;
use crate::models::{Agent, Id, Match, Player, Weapon};
use crate::repository::{MatchPlayerRepository, PlayerAgentRepository, PlayerWeaponRepository};

pub struct SqlMatchPlayerRepository {
    pool: SqlitePool,
}

impl SqlMatchPlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchPlayerRepository for SqlMatchPlayerRepository {
    async fn add_player_to_match(&self, player_id: Id, match_id: Id) -> RepoResult<()> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO MATCH_PLAYER (PLAYER_ID, MATCH_ID)
               SELECT ?1, ?2
               WHERE EXISTS (SELECT 1 FROM PLAYER WHERE PLAYER_ID = ?1)
                 AND EXISTS (SELECT 1 FROM "MATCH" WHERE MATCH_ID = ?2)"#,
        )
        .bind(player_id)
        .bind(match_id)
        .execute(&self.pool)
        .await?;
        tracing::debug!(
            player_id,
            match_id,
            linked = result.rows_affected() > 0,
            "Added player to match"
        );
        Ok(())
    }

    async fn get_matches_by_player_id(&self, player_id: Id) -> RepoResult<Vec<Match>> {
        let rows: Vec<MatchRow> = sqlx::query_as(
            r#"SELECT m.MATCH_ID, m.PLAYED_ON, m.MAP_ID, m.OUTCOME
               FROM "MATCH" m
               JOIN MATCH_PLAYER mp ON mp.MATCH_ID = m.MATCH_ID
               WHERE mp.PLAYER_ID = ?
               ORDER BY m.MATCH_ID"#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn get_players_by_match_id(&self, match_id: Id) -> RepoResult<Vec<Player>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            r#"SELECT p.PLAYER_ID, p.USERNAME, p.DISPLAY_NAME, p.EMAIL, p.REGION, p."RANK"
               FROM PLAYER p
               JOIN MATCH_PLAYER mp ON mp.PLAYER_ID = p.PLAYER_ID
               WHERE mp.MATCH_ID = ?
               ORDER BY p.PLAYER_ID"#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Player::from).collect())
    }
}

pub struct SqlPlayerAgentRepository {
    pool: SqlitePool,
}

impl SqlPlayerAgentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerAgentRepository for SqlPlayerAgentRepository {
    async fn assign_agent_to_player(&self, player_id: Id, agent_id: Id) -> RepoResult<()> {
        sqlx::query(
            "UPDATE PLAYER SET AGENT_ID = ?1 \
             WHERE PLAYER_ID = ?2 AND EXISTS (SELECT 1 FROM AGENT WHERE AGENT_ID = ?1)",
        )
        .bind(agent_id)
        .bind(player_id)
        .execute(&self.pool)
        .await?;
        tracing::debug!(player_id, agent_id, "Assigned agent to player");
        Ok(())
    }

    async fn get_agent_by_player_id(&self, player_id: Id) -> RepoResult<Option<Agent>> {
        let row: Option<AgentRow> = sqlx::query_as(
            "SELECT a.AGENT_ID, a.NAME, a.DESCRIPTION, a.ROLE \
             FROM AGENT a JOIN PLAYER p ON p.AGENT_ID = a.AGENT_ID \
             WHERE p.PLAYER_ID = ?",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Agent::from))
    }
}

pub struct SqlPlayerWeaponRepository {
    pool: SqlitePool,
}

impl SqlPlayerWeaponRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerWeaponRepository for SqlPlayerWeaponRepository {
    async fn assign_weapon_to_player(&self, player_id: Id, weapon_id: Id) -> RepoResult<()> {
        sqlx::query(
            "UPDATE PLAYER SET WEAPON_ID = ?1 \
             WHERE PLAYER_ID = ?2 AND EXISTS (SELECT 1 FROM WEAPON WHERE WEAPON_ID = ?1)",
        )
        .bind(weapon_id)
        .bind(player_id)
        .execute(&self.pool)
        .await?;
        tracing::debug!(player_id, weapon_id, "Assigned weapon to player");
        Ok(())
    }

    async fn get_weapon_by_player_id(&self, player_id: Id) -> RepoResult<Option<Weapon>> {
        let row: Option<WeaponRow> = sqlx::query_as(
            "SELECT w.WEAPON_ID, w.NAME, w.TYPE \
             FROM WEAPON w JOIN PLAYER p ON p.WEAPON_ID = w.WEAPON_ID \
             WHERE p.PLAYER_ID = ?",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Weapon::from))
    }
}
