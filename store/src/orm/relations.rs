//! Relationship repositories navigating the mapped associations.
//!
//! Assignments load the owning player, set the association and update it
//! in one transaction. Links naming a missing row are skipped.

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, ModelTrait,
    QueryOrder, TransactionTrait,
};

use super::entities::{agent, game_match, match_player, player, weapon};
use crate::error::RepoResult;
use crate::models::{Agent, Id, Match, Player, Weapon};
use crate::repository::{MatchPlayerRepository, PlayerAgentRepository, PlayerWeaponRepository};

pub struct OrmMatchPlayerRepository {
    db: DatabaseConnection,
}

impl OrmMatchPlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MatchPlayerRepository for OrmMatchPlayerRepository {
    async fn add_player_to_match(&self, player_id: Id, match_id: Id) -> RepoResult<()> {
        let linked = self
            .db
            .transaction::<_, bool, DbErr>(move |txn| {
                Box::pin(async move {
                    let player = player::Entity::find_by_id(player_id).one(txn).await?;
                    let game = game_match::Entity::find_by_id(match_id).one(txn).await?;
                    if player.is_none() || game.is_none() {
                        return Ok(false);
                    }
                    let existing = match_player::Entity::find_by_id((player_id, match_id))
                        .one(txn)
                        .await?;
                    if existing.is_some() {
                        return Ok(false);
                    }
                    let link = match_player::ActiveModel {
                        player_id: Set(player_id),
                        match_id: Set(match_id),
                    };
                    match_player::Entity::insert(link)
                        .exec_without_returning(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await?;
        tracing::debug!(player_id, match_id, linked, "Added player to match");
        Ok(())
    }

    async fn get_matches_by_player_id(&self, player_id: Id) -> RepoResult<Vec<Match>> {
        let txn = self.db.begin().await?;
        let Some(player) = player::Entity::find_by_id(player_id).one(&txn).await? else {
            return Ok(Vec::new());
        };
        let matches = player
            .find_related(game_match::Entity)
            .order_by_asc(game_match::Column::Id)
            .all(&txn)
            .await?;
        txn.commit().await?;
        Ok(matches.into_iter().map(Match::from).collect())
    }

    async fn get_players_by_match_id(&self, match_id: Id) -> RepoResult<Vec<Player>> {
        let txn = self.db.begin().await?;
        let Some(game) = game_match::Entity::find_by_id(match_id).one(&txn).await? else {
            return Ok(Vec::new());
        };
        let players = game
            .find_related(player::Entity)
            .order_by_asc(player::Column::Id)
            .all(&txn)
            .await?;
        txn.commit().await?;
        Ok(players.into_iter().map(Player::from).collect())
    }
}

pub struct OrmPlayerAgentRepository {
    db: DatabaseConnection,
}

impl OrmPlayerAgentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlayerAgentRepository for OrmPlayerAgentRepository {
    async fn assign_agent_to_player(&self, player_id: Id, agent_id: Id) -> RepoResult<()> {
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let Some(player) = player::Entity::find_by_id(player_id).one(txn).await? else {
                        return Ok(());
                    };
                    let Some(agent) = agent::Entity::find_by_id(agent_id).one(txn).await? else {
                        return Ok(());
                    };
                    let mut active = player.into_active_model();
                    active.agent_id = Set(Some(agent.id));
                    active.update(txn).await?;
                    Ok(())
                })
            })
            .await?;
        tracing::debug!(player_id, agent_id, "Assigned agent to player");
        Ok(())
    }

    async fn get_agent_by_player_id(&self, player_id: Id) -> RepoResult<Option<Agent>> {
        let txn = self.db.begin().await?;
        let Some(player) = player::Entity::find_by_id(player_id).one(&txn).await? else {
            return Ok(None);
        };
        let agent = player.find_related(agent::Entity).one(&txn).await?;
        txn.commit().await?;
        Ok(agent.map(Agent::from))
    }
}

pub struct OrmPlayerWeaponRepository {
    db: DatabaseConnection,
}

impl OrmPlayerWeaponRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlayerWeaponRepository for OrmPlayerWeaponRepository {
    async fn assign_weapon_to_player(&self, player_id: Id, weapon_id: Id) -> RepoResult<()> {
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let Some(player) = player::Entity::find_by_id(player_id).one(txn).await? else {
                        return Ok(());
                    };
                    let Some(weapon) = weapon::Entity::find_by_id(weapon_id).one(txn).await?
                    else {
                        return Ok(());
                    };
                    let mut active = player.into_active_model();
                    active.weapon_id = Set(Some(weapon.id));
                    active.update(txn).await?;
                    Ok(())
                })
            })
            .await?;
        tracing::debug!(player_id, weapon_id, "Assigned weapon to player");
        Ok(())
    }

    async fn get_weapon_by_player_id(&self, player_id: Id) -> RepoResult<Option<Weapon>> {
        let txn = self.db.begin().await?;
        let Some(player) = player::Entity::find_by_id(player_id).one(&txn).await? else {
            return Ok(None);
        };
        let weapon = player.find_related(weapon::Entity).one(&txn).await?;
        txn.commit().await?;
        Ok(weapon.map(Weapon::from))
    }
}
