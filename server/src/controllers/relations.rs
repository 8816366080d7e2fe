//! Relationship routes under `/player/{id}/..` and `/match/{id}/..`.
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/player/{id}/agent` | assigned agent |
//! | PUT | `/player/{id}/agent/{agentId}` | player |
//! | GET | `/player/{id}/weapon` | assigned weapon |
//! | PUT | `/player/{id}/weapon/{weaponId}` | player |
//! | GET | `/player/{id}/matches` | matches, by id |
//! | PUT | `/player/{id}/matches/{matchId}` | player |
//! | GET | `/match/{id}/players` | players, by id |
//!
//! Only the relational backends provide relationship repositories; with the
//! file backend every route here is a 404.

use std::sync::Arc;

use http::Method;
use valorant_store::repository::{
    AgentRepository, MatchRepository, PlayerRepository, WeaponRepository,
};
use valorant_store::{Agent, Id, Match, Player, Relations, Repositories, Weapon};

use super::{not_found, parse_id};
use crate::error::{ServiceError, ServiceResult};

pub const UNSUPPORTED: &str = "Relationships are not supported by the file backend";

pub struct RelationController {
    agents: Arc<dyn AgentRepository>,
    matches: Arc<dyn MatchRepository>,
    players: Arc<dyn PlayerRepository>,
    weapons: Arc<dyn WeaponRepository>,
    relations: Option<Relations>,
}

impl RelationController {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            agents: repos.agents.clone(),
            matches: repos.matches.clone(),
            players: repos.players.clone(),
            weapons: repos.weapons.clone(),
            relations: repos.relations.clone(),
        }
    }

    /// Handle `/{entity}/{id}/{rest..}`.
    pub async fn handle(
        &self,
        method: &Method,
        entity: &str,
        id: &str,
        rest: &[&str],
    ) -> ServiceResult<String> {
        let Some(relations) = &self.relations else {
            return Err(ServiceError::NotFound(UNSUPPORTED.to_string()));
        };
        let id = parse_id(id)?;

        match (entity, method.as_str(), rest) {
            ("player", "GET", ["agent"]) => {
                self.player(id).await?;
                let agent = relations
                    .player_agents
                    .get_agent_by_player_id(id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Player {id} has no agent")))?;
                Ok(serde_json::to_string(&agent)?)
            }
            ("player", "PUT", ["agent", agent_id]) => {
                let agent_id = parse_id(agent_id)?;
                self.player(id).await?;
                self.agents
                    .get(agent_id)
                    .await?
                    .ok_or_else(|| not_found::<Agent>(agent_id))?;
                relations.player_agents.assign_agent_to_player(id, agent_id).await?;
                tracing::info!(player_id = id, agent_id, "Assigned agent");
                Ok(serde_json::to_string(&self.player(id).await?)?)
            }
            ("player", "GET", ["weapon"]) => {
                self.player(id).await?;
                let weapon = relations
                    .player_weapons
                    .get_weapon_by_player_id(id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Player {id} has no weapon")))?;
                Ok(serde_json::to_string(&weapon)?)
            }
            ("player", "PUT", ["weapon", weapon_id]) => {
                let weapon_id = parse_id(weapon_id)?;
                self.player(id).await?;
                self.weapons
                    .get(weapon_id)
                    .await?
                    .ok_or_else(|| not_found::<Weapon>(weapon_id))?;
                relations.player_weapons.assign_weapon_to_player(id, weapon_id).await?;
                tracing::info!(player_id = id, weapon_id, "Assigned weapon");
                Ok(serde_json::to_string(&self.player(id).await?)?)
            }
            ("player", "GET", ["matches"]) => {
                self.player(id).await?;
                let matches = relations.match_players.get_matches_by_player_id(id).await?;
                Ok(serde_json::to_string(&matches)?)
            }
            ("player", "PUT", ["matches", match_id]) => {
                let match_id = parse_id(match_id)?;
                self.player(id).await?;
                self.matches
                    .get(match_id)
                    .await?
                    .ok_or_else(|| not_found::<Match>(match_id))?;
                relations.match_players.add_player_to_match(id, match_id).await?;
                tracing::info!(player_id = id, match_id, "Added player to match");
                Ok(serde_json::to_string(&self.player(id).await?)?)
            }
            ("match", "GET", ["players"]) => {
                self.matches
                    .get(id)
                    .await?
                    .ok_or_else(|| not_found::<Match>(id))?;
                let players = relations.match_players.get_players_by_match_id(id).await?;
                Ok(serde_json::to_string(&players)?)
            }
            _ => Err(ServiceError::NotFound(format!(
                "No route for {method} /{entity}/{id}/{}",
                rest.join("/")
            ))),
        }
    }

    async fn player(&self, id: Id) -> ServiceResult<Player> {
        self.players.get(id).await?.ok_or_else(|| not_found::<Player>(id))
    }
}
