//! File-backed repository implementations.
//!
//! Each entity type is kept in its own bincode blob under a data directory:
//!
//! | File | Entity |
//! |------|--------|
//! | `agents.bin` | [`Agent`] |
//! | `maps.bin` | [`Map`] |
//! | `matches.bin` | [`Match`] |
//! | `players.bin` | [`Player`] |
//! | `weapons.bin` | [`Weapon`] |
//!
//! Finder methods scan the in-memory collection linearly.

mod repository;

pub use repository::FileRepository;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::RepoResult;
use crate::models::{Agent, Id, Map, Match, Player, Weapon};
use crate::repository::{
    AgentRepository, MapRepository, MatchRepository, PlayerRepository, WeaponRepository,
};

pub type FileAgentRepository = FileRepository<Agent>;
pub type FileMapRepository = FileRepository<Map>;
pub type FileMatchRepository = FileRepository<Match>;
pub type FilePlayerRepository = FileRepository<Player>;
pub type FileWeaponRepository = FileRepository<Weapon>;

pub const AGENTS_FILE: &str = "agents.bin";
pub const MAPS_FILE: &str = "maps.bin";
pub const MATCHES_FILE: &str = "matches.bin";
pub const PLAYERS_FILE: &str = "players.bin";
pub const WEAPONS_FILE: &str = "weapons.bin";

#[async_trait]
impl AgentRepository for FileAgentRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Agent>> {
        Ok(self.find(|agent| agent.name == name).await)
    }
}

#[async_trait]
impl MapRepository for FileMapRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Map>> {
        Ok(self.find(|map| map.name == name).await)
    }
}

#[async_trait]
impl MatchRepository for FileMatchRepository {
    async fn get_by_played_on(&self, played_on: NaiveDateTime) -> RepoResult<Vec<Match>> {
        Ok(self.filter(|m| m.played_on == played_on).await)
    }

    async fn get_by_map_id(&self, map_id: Id) -> RepoResult<Vec<Match>> {
        Ok(self.filter(|m| m.map_id == map_id).await)
    }
}

#[async_trait]
impl PlayerRepository for FilePlayerRepository {
    async fn get_by_username(&self, username: &str) -> RepoResult<Option<Player>> {
        Ok(self.find(|player| player.username == username).await)
    }

    async fn get_by_region(&self, region: &str) -> RepoResult<Vec<Player>> {
        Ok(self.filter(|player| player.region == region).await)
    }

    async fn get_by_display_name(&self, display_name: &str) -> RepoResult<Vec<Player>> {
        Ok(self.filter(|player| player.display_name == display_name).await)
    }
}

#[async_trait]
impl WeaponRepository for FileWeaponRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<Weapon>> {
        Ok(self.find(|weapon| weapon.name == name).await)
    }
}
