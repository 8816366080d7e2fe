//! sea-orm implementation of [`MatchRepository`].

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};

use super::entities::game_match;
use super::mapping::match_active_model;
use crate::error::RepoResult;
use crate::models::{Entity, Id, Match};
use crate::repository::{MatchRepository, Repository};

pub struct OrmMatchRepository {
    db: DatabaseConnection,
}

impl OrmMatchRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Id, Match> for OrmMatchRepository {
    async fn save(&self, model: &mut Match) -> RepoResult<()> {
        let id = model.id();
        let active = match_active_model(model);
        let saved = self
            .db
            .transaction::<_, game_match::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    if id > 0 && game_match::Entity::find_by_id(id).one(txn).await?.is_some() {
                        active.update(txn).await
                    } else {
                        active.insert(txn).await
                    }
                })
            })
            .await?;
        model.set_id(saved.id);
        tracing::debug!(id = saved.id, "Saved match");
        Ok(())
    }

    async fn delete(&self, model: &Match) -> RepoResult<()> {
        let id = model.id();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    game_match::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }

    async fn get(&self, id: Id) -> RepoResult<Option<Match>> {
        let txn = self.db.begin().await?;
        let found = game_match::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(found.map(Match::from))
    }

    async fn get_all(&self) -> RepoResult<Vec<Match>> {
        let txn = self.db.begin().await?;
        let models = game_match::Entity::find().all(&txn).await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Match::from).collect())
    }
}

#[async_trait]
impl MatchRepository for OrmMatchRepository {
    async fn get_by_played_on(&self, played_on: NaiveDateTime) -> RepoResult<Vec<Match>> {
        let txn = self.db.begin().await?;
        let models = game_match::Entity::find()
            .filter(game_match::Column::PlayedOn.eq(played_on))
            .all(&txn)
            .await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Match::from).collect())
    }

    async fn get_by_map_id(&self, map_id: Id) -> RepoResult<Vec<Match>> {
        let txn = self.db.begin().await?;
        let models = game_match::Entity::find()
            .filter(game_match::Column::MapId.eq(map_id))
            .all(&txn)
            .await?;
        txn.commit().await?;
        Ok(models.into_iter().map(Match::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::connect;
    use crate::sql::{Database, SqlMatchRepository};
    use chrono::NaiveDate;

    fn played_on() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 25)
            .unwrap()
            .and_hms_opt(21, 45, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_rows_written_by_orm_are_readable_by_sql() {
        let db = Database::new_in_memory().await.unwrap();
        let orm = OrmMatchRepository::new(connect(&db));
        let sql = SqlMatchRepository::new(db.pool().clone());

        let mut final_match = Match {
            played_on: played_on(),
            map_id: 3,
            outcome: "Victory".to_string(),
            ..Match::default()
        };
        orm.save(&mut final_match).await.unwrap();

        assert_eq!(sql.get(final_match.id).await.unwrap(), Some(final_match.clone()));
        assert_eq!(sql.get_by_played_on(played_on()).await.unwrap(), vec![final_match.clone()]);
        assert_eq!(orm.get_by_played_on(played_on()).await.unwrap(), vec![final_match]);
    }

    #[tokio::test]
    async fn test_get_by_map_id_ignores_missing_map() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = OrmMatchRepository::new(connect(&db));

        let mut m = Match {
            played_on: played_on(),
            map_id: 404,
            outcome: "Draw".to_string(),
            ..Match::default()
        };
        repo.save(&mut m).await.unwrap();

        assert_eq!(repo.get_by_map_id(404).await.unwrap(), vec![m]);
        assert!(repo.get_by_map_id(1).await.unwrap().is_empty());
    }
}
