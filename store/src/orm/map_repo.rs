//! sea-orm implementation of [`MapRepository`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use super::entities::map;
use super::mapping::map_active_model;
use crate::error::RepoResult;
use crate::models::{Entity, Id, Map};
use crate::repository::{MapRepository, Repository};

pub struct OrmMapRepository {
    db: DatabaseConnection,
}

impl OrmMapRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Id, Map> for OrmMapRepository {
    async fn save(&self, model: &mut Map) -> RepoResult<()> {
        let id = model.id();
        let active = map_active_model(model);
        let saved = self
            .db
            .transaction::<_, map::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    if id > 0 && map::Entity::find_by_id(id).one(txn).await?.is_some() {
                        active.update(txn).await
                    } else {
                        active.insert(txn).await
                    }
                })
            })
            .await?;
        model.set_id(saved.id);
        tracing::debug!(id = saved.id, "Saved map");
        Ok(())
    }

    async fn delete(&self, model: &Map) -> RepoResult<()> {
        let id = model.id();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    map::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Map>> {
        let txn = self.db.begin().await?;
        let found = map::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(found.map(Map::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Map>> {
        let txn = self.db.begin().await?;
        let models = map::Entity::find().all(&txn).await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Map::from).collect())
    }
}

#[async_trait]
impl MapRepository for OrmMapRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Map>> {
        let txn = self.db.begin().await?;
        let found = map::Entity::find()
            .filter(map::Column::Name.eq(name))
            .order_by_asc(map::Column::Id)
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(found.map(Map::from))
    }
}
