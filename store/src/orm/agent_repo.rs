//! sea-orm implementation of [`AgentRepository`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use super::entities::agent;
use super::mapping::agent_active_model;
use crate::error::RepoResult;
use crate::models::{Agent, Entity, Id};
use crate::repository::{AgentRepository, Repository};

pub struct OrmAgentRepository {
    db: DatabaseConnection,
}

impl OrmAgentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Id, Agent> for OrmAgentRepository {
    async fn save(&self, model: &mut Agent) -> RepoResult<()> {
        let id = model.id();
        let active = agent_active_model(model);
        let saved = self
            .db
            .transaction::<_, agent::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    if id > 0 && agent::Entity::find_by_id(id).one(txn).await?.is_some() {
                        active.update(txn).await
                    } else {
                        active.insert(txn).await
                    }
                })
            })
            .await?;
        model.set_id(saved.id);
        tracing::debug!(id = saved.id, "Saved agent");
        Ok(())
    }

    async fn delete(&self, model: &Agent) -> RepoResult<()> {
        let id = model.id();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    agent::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Agent>> {
        let txn = self.db.begin().await?;
        let found = agent::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(found.map(Agent::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Agent>> {
        let txn = self.db.begin().await?;
        let models = agent::Entity::find().all(&txn).await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Agent::from).collect())
    }
}

#[async_trait]
impl AgentRepository for OrmAgentRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Agent>> {
        let txn = self.db.begin().await?;
        let found = agent::Entity::find()
            .filter(agent::Column::Name.eq(name))
            .order_by_asc(agent::Column::Id)
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(found.map(Agent::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::connect;
    use crate::sql::Database;

    #[tokio::test]
    async fn test_insert_update_delete() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = OrmAgentRepository::new(connect(&db));

        let mut jett = Agent {
            name: "Jett".to_string(),
            description: "Wind".to_string(),
            role: "Duelist".to_string(),
            ..Agent::default()
        };
        repo.save(&mut jett).await.unwrap();
        assert!(jett.id > 0);

        jett.description = "Tailwind".to_string();
        repo.save(&mut jett).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap(), vec![jett.clone()]);

        repo.delete(&jett).await.unwrap();
        assert_eq!(repo.get(jett.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_unknown_positive_id_inserts_under_that_id() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = OrmAgentRepository::new(connect(&db));

        let mut viper = Agent {
            id: 12,
            name: "Viper".to_string(),
            ..Agent::default()
        };
        repo.save(&mut viper).await.unwrap();
        assert_eq!(viper.id, 12);
        assert_eq!(repo.get_by_name("Viper").await.unwrap(), Some(viper));
    }

    #[tokio::test]
    async fn test_reads_release_their_transaction() {
        // The in-memory pool holds a single connection, so a read that left
        // its transaction open would starve the save below.
        let db = Database::new_in_memory().await.unwrap();
        let repo = OrmAgentRepository::new(connect(&db));

        assert_eq!(repo.get(1).await.unwrap(), None);
        assert!(repo.get_by_name("Jett").await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());

        let mut jett = Agent {
            name: "Jett".to_string(),
            ..Agent::default()
        };
        tokio::time::timeout(std::time::Duration::from_secs(5), repo.save(&mut jett))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(repo.get_all().await.unwrap(), vec![jett]);
    }
}
