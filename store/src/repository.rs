//! Repository trait definitions.
//!
//! `Repository<K, V>` is the CRUD contract every backend implements for
//! every entity; the per-entity traits add the finder methods. The traits
//! use `#[async_trait]` so the front ends can hold backend-agnostic
//! `Arc<dyn AgentRepository>` handles chosen at startup.
//!
//! Contract shared by all implementations:
//! - `save` inserts when `id <= 0` (writing the new id back into the value)
//!   and otherwise stores the value under its id. Last writer wins.
//! - `delete` of an unknown id is a no-op.
//! - `get` returns `Ok(None)` for an unknown id.
//! - `get_all` makes no ordering promise.
//! - Finders are case-sensitive exact matches.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::RepoResult;
use crate::models::{Agent, Id, Map, Match, Player, Weapon};

/// Generic CRUD contract keyed by `K` over values `V`.
#[async_trait]
pub trait Repository<K, V>: Send + Sync
where
    K: Send + 'static,
    V: Send + Sync + 'static,
{
    /// Insert or update `model`. New entities get their id assigned in place.
    async fn save(&self, model: &mut V) -> RepoResult<()>;

    /// Remove the stored value with the same id as `model`.
    async fn delete(&self, model: &V) -> RepoResult<()>;

    async fn get(&self, id: K) -> RepoResult<Option<V>>;

    async fn get_all(&self) -> RepoResult<Vec<V>>;
}

#[async_trait]
pub trait AgentRepository: Repository<Id, Agent> {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Agent>>;
}

#[async_trait]
pub trait MapRepository: Repository<Id, Map> {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Map>>;
}

#[async_trait]
pub trait MatchRepository: Repository<Id, Match> {
    async fn get_by_played_on(&self, played_on: NaiveDateTime) -> RepoResult<Vec<Match>>;

    async fn get_by_map_id(&self, map_id: Id) -> RepoResult<Vec<Match>>;
}

#[async_trait]
pub trait PlayerRepository: Repository<Id, Player> {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<Player>>;

    async fn get_by_region(&self, region: &str) -> RepoResult<Vec<Player>>;

    async fn get_by_display_name(&self, display_name: &str) -> RepoResult<Vec<Player>>;
}

#[async_trait]
pub trait WeaponRepository: Repository<Id, Weapon> {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Weapon>>;
}

// ============================================================================
// Relationship repositories (relational backends only)
// ============================================================================

/// Many-to-many link between players and the matches they took part in.
///
/// Linking the same pair twice is a no-op. Linking ids that do not exist is
/// a no-op as well.
#[async_trait]
pub trait MatchPlayerRepository: Send + Sync {
    async fn add_player_to_match(&self, player_id: Id, match_id: Id) -> RepoResult<()>;

    async fn get_matches_by_player_id(&self, player_id: Id) -> RepoResult<Vec<Match>>;

    async fn get_players_by_match_id(&self, match_id: Id) -> RepoResult<Vec<Player>>;
}

/// The single agent a player is assigned to. Reassigning replaces it.
#[async_trait]
pub trait PlayerAgentRepository: Send + Sync {
    async fn assign_agent_to_player(&self, player_id: Id, agent_id: Id) -> RepoResult<()>;

    async fn get_agent_by_player_id(&self, player_id: Id) -> RepoResult<Option<Agent>>;
}

/// The single weapon a player is assigned. Reassigning replaces it.
#[async_trait]
pub trait PlayerWeaponRepository: Send + Sync {
    async fn assign_weapon_to_player(&self, player_id: Id, weapon_id: Id) -> RepoResult<()>;

    async fn get_weapon_by_player_id(&self, player_id: Id) -> RepoResult<Option<Weapon>>;
}
