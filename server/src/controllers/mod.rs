//! Per-entity controllers.
//!
//! A controller turns a routed request into a repository call and
//! JSON-encodes the result. [`EntityController`] covers the CRUD surface
//! for every entity type; [`RelationController`] serves the relationship
//! routes of the relational backends.

mod relations;

pub use relations::RelationController;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use valorant_store::repository::{
    AgentRepository, MapRepository, MatchRepository, PlayerRepository, Repository,
    WeaponRepository,
};
use valorant_store::{Agent, Entity, Id, Map, Match, Player, Weapon};

use crate::error::{ServiceError, ServiceResult};

/// CRUD operations reachable through the router.
///
/// Ids arrive as raw path segments; a segment that is not an integer is an
/// [`ServiceError::InvalidId`].
#[async_trait]
pub trait Controller: Send + Sync {
    /// `POST /{entity}`: save a new entity, return it with its id.
    async fn post(&self, body: &str) -> ServiceResult<String>;

    /// `PUT /{entity}/{id}`: overwrite an existing entity.
    async fn put(&self, id: &str, body: &str) -> ServiceResult<String>;

    /// `DELETE /{entity}/{id}`: remove an existing entity; empty body.
    async fn delete(&self, id: &str) -> ServiceResult<String>;

    async fn get(&self, id: &str) -> ServiceResult<String>;

    /// `GET /{entity}`: every entity, sorted by id.
    async fn get_all(&self) -> ServiceResult<String>;
}

pub(crate) fn parse_id(raw: &str) -> ServiceResult<Id> {
    raw.parse::<Id>()
        .map_err(|_| ServiceError::InvalidId(raw.to_string()))
}

pub(crate) fn not_found<T: Entity>(id: Id) -> ServiceError {
    ServiceError::NotFound(format!("{} {id} not found", T::NAME))
}

/// Generic controller over one repository.
///
/// `R` is usually a trait object such as `dyn AgentRepository`.
pub struct EntityController<V, R: ?Sized> {
    repo: Arc<R>,
    _entity: PhantomData<fn() -> V>,
}

impl<V, R: ?Sized> EntityController<V, R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }
}

impl<V, R> EntityController<V, R>
where
    V: Entity,
    R: Repository<Id, V> + ?Sized,
{
    async fn existing(&self, id: Id) -> ServiceResult<V> {
        self.repo.get(id).await?.ok_or_else(|| not_found::<V>(id))
    }
}

#[async_trait]
impl<V, R> Controller for EntityController<V, R>
where
    V: Entity + Serialize + DeserializeOwned,
    R: Repository<Id, V> + ?Sized,
{
    async fn post(&self, body: &str) -> ServiceResult<String> {
        let mut entity: V = serde_json::from_str(body)?;
        self.repo.save(&mut entity).await?;
        tracing::info!(entity = V::NAME, id = entity.id(), "Created");
        Ok(serde_json::to_string(&entity)?)
    }

    async fn put(&self, id: &str, body: &str) -> ServiceResult<String> {
        let id = parse_id(id)?;
        self.existing(id).await?;
        let mut entity: V = serde_json::from_str(body)?;
        entity.set_id(id);
        self.repo.save(&mut entity).await?;
        tracing::info!(entity = V::NAME, id, "Updated");
        Ok(serde_json::to_string(&entity)?)
    }

    async fn delete(&self, id: &str) -> ServiceResult<String> {
        let id = parse_id(id)?;
        let entity = self.existing(id).await?;
        self.repo.delete(&entity).await?;
        tracing::info!(entity = V::NAME, id, "Deleted");
        Ok(String::new())
    }

    async fn get(&self, id: &str) -> ServiceResult<String> {
        let entity = self.existing(parse_id(id)?).await?;
        Ok(serde_json::to_string(&entity)?)
    }

    async fn get_all(&self) -> ServiceResult<String> {
        let mut all = self.repo.get_all().await?;
        all.sort_by_key(|entity| entity.id());
        Ok(serde_json::to_string(&all)?)
    }
}

pub type AgentController = EntityController<Agent, dyn AgentRepository>;
pub type MapController = EntityController<Map, dyn MapRepository>;
pub type MatchController = EntityController<Match, dyn MatchRepository>;
pub type PlayerController = EntityController<Player, dyn PlayerRepository>;
pub type WeaponController = EntityController<Weapon, dyn WeaponRepository>;
