//! sea-orm implementation of [`WeaponRepository`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use super::entities::weapon;
use super::mapping::weapon_active_model;
use crate::error::RepoResult;
use crate::models::{Entity, Id, Weapon};
use crate::repository::{Repository, WeaponRepository};

pub struct OrmWeaponRepository {
    db: DatabaseConnection,
}

impl OrmWeaponRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Id, Weapon> for OrmWeaponRepository {
    async fn save(&self, model: &mut Weapon) -> RepoResult<()> {
        let id = model.id();
        let active = weapon_active_model(model);
        let saved = self
            .db
            .transaction::<_, weapon::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    if id > 0 && weapon::Entity::find_by_id(id).one(txn).await?.is_some() {
                        active.update(txn).await
                    } else {
                        active.insert(txn).await
                    }
                })
            })
            .await?;
        model.set_id(saved.id);
        tracing::debug!(id = saved.id, "Saved weapon");
        Ok(())
    }

    async fn delete(&self, model: &Weapon) -> RepoResult<()> {
        let id = model.id();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    weapon::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Weapon>> {
        let txn = self.db.begin().await?;
        let found = weapon::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(found.map(Weapon::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Weapon>> {
        let txn = self.db.begin().await?;
        let models = weapon::Entity::find().all(&txn).await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Weapon::from).collect())
    }
}

#[async_trait]
impl WeaponRepository for OrmWeaponRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Weapon>> {
        let txn = self.db.begin().await?;
        let found = weapon::Entity::find()
            .filter(weapon::Column::Name.eq(name))
            .order_by_asc(weapon::Column::Id)
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(found.map(Weapon::from))
    }
}
