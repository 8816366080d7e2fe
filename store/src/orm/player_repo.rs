//! sea-orm implementation of [`PlayerRepository`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use super::entities::player;
use super::mapping::player_active_model;
use crate::error::RepoResult;
use crate::models::{Entity, Id, Player};
use crate::repository::{PlayerRepository, Repository};

pub struct OrmPlayerRepository {
    db: DatabaseConnection,
}

impl OrmPlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_where(&self, column: player::Column, value: &str) -> RepoResult<Vec<Player>> {
        let txn = self.db.begin().await?;
        let models = player::Entity::find()
            .filter(column.eq(value))
            .order_by_asc(player::Column::Id)
            .all(&txn)
            .await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Player::from).collect())
    }
}

#[async_trait]
impl Repository<Id, Player> for OrmPlayerRepository {
    async fn save(&self, model: &mut Player) -> RepoResult<()> {
        let id = model.id();
        let active = player_active_model(model);
        let saved = self
            .db
            .transaction::<_, player::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    if id > 0 && player::Entity::find_by_id(id).one(txn).await?.is_some() {
                        active.update(txn).await
                    } else {
                        active.insert(txn).await
                    }
                })
            })
            .await?;
        model.set_id(saved.id);
        tracing::debug!(id = saved.id, "Saved player");
        Ok(())
    }

    async fn delete(&self, model: &Player) -> RepoResult<()> {
        let id = model.id();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    player::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Player>> {
        let txn = self.db.begin().await?;
        let found = player::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(found.map(Player::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Player>> {
        let txn = self.db.begin().await?;
        let models = player::Entity::find().all(&txn).await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Player::from).collect())
    }
}

#[async_trait]
impl PlayerRepository for OrmPlayerRepository {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<Player>> {
        let mut players = self.find_where(player::Column::Username, username).await?;
        Ok(if players.is_empty() {
            None
        } else {
            Some(players.swap_remove(0))
        })
    }

    async fn get_by_region(&self, region: &str) -> RepoResult<Vec<Player>> {
        self.find_where(player::Column::Region, region).await
    }

    async fn get_by_display_name(&self, display_name: &str) -> RepoResult<Vec<Player>> {
        self.find_where(player::Column::DisplayName, display_name).await
    }
}
