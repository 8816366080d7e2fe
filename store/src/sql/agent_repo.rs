//! SQLite-backed implementation of [`AgentRepository`].

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::RepoResult;
use crate::models::{Agent, Entity, Id};
use crate::repository::{AgentRepository, Repository};

const SELECT_AGENT: &str = "SELECT AGENT_ID, NAME, DESCRIPTION, ROLE FROM AGENT";

#[derive(sqlx::FromRow)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct AgentRow {
    agent_id: i64,
    name: String,
    description: String,
    role: String,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        Agent {
            id: row.agent_id,
            name: row.name,
            description: row.description,
            role: row.role,
        }
    }
}

async fn fetch_agent(pool: &SqlitePool, id: Id) -> RepoResult<Option<Agent>> {
    let row: Option<AgentRow> = sqlx::query_as(&format!("{SELECT_AGENT} WHERE AGENT_ID = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Agent::from))
}

pub struct SqlAgentRepository {
    pool: SqlitePool,
}

impl SqlAgentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Id, Agent> for SqlAgentRepository {
    async fn save(&self, model: &mut Agent) -> RepoResult<()> {
        if model.is_new() {
            let result =
                sqlx::query("INSERT INTO AGENT (NAME, DESCRIPTION, ROLE) VALUES (?, ?, ?)")
                    .bind(&model.name)
                    .bind(&model.description)
                    .bind(&model.role)
                    .execute(&self.pool)
                    .await?;
            model.set_id(result.last_insert_rowid());
        } else {
            sqlx::query(
                "INSERT INTO AGENT (AGENT_ID, NAME, DESCRIPTION, ROLE) VALUES (?, ?, ?, ?) \
                 ON CONFLICT(AGENT_ID) DO UPDATE SET \
                 NAME = excluded.NAME, DESCRIPTION = excluded.DESCRIPTION, ROLE = excluded.ROLE",
            )
            .bind(model.id)
            .bind(&model.name)
            .bind(&model.description)
            .bind(&model.role)
            .execute(&self.pool)
            .await?;
        }
        tracing::debug!(id = model.id, "Saved agent");
        Ok(())
    }

    async fn delete(&self, model: &Agent) -> RepoResult<()> {
        sqlx::query("DELETE FROM AGENT WHERE AGENT_ID = ?")
            .bind(model.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Agent>> {
        fetch_agent(&self.pool, id).await
    }

    async fn get_all(&self) -> RepoResult<Vec<Agent>> {
        let rows: Vec<AgentRow> = sqlx::query_as(SELECT_AGENT)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Agent::from).collect())
    }
}

#[async_trait]
impl AgentRepository for SqlAgentRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Agent>> {
        let row: Option<AgentRow> =
            sqlx::query_as(&format!("{SELECT_AGENT} WHERE NAME = ? ORDER BY AGENT_ID LIMIT 1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Agent::from))
    }
}
