//! Conversions between sea-orm models and the plain entity records.
//!
//! Reads go through `From<Model>`. Writes go through the `*_active_model`
//! functions: a new entity leaves the primary key `NotSet` so the database
//! assigns it, a persisted one sets it so the row can be updated or
//! re-created under the same id.

use sea_orm::ActiveValue::{NotSet, Set};

use super::entities::{agent, game_match, map, player, weapon};
use crate::models::{Agent, Entity, Id, Map, Match, Player, Weapon};

fn key<T: Entity>(entity: &T) -> sea_orm::ActiveValue<Id> {
    if entity.is_new() {
        NotSet
    } else {
        Set(entity.id())
    }
}

impl From<agent::Model> for Agent {
    fn from(model: agent::Model) -> Self {
        Agent {
            id: model.id,
            name: model.name,
            description: model.description,
            role: model.role,
        }
    }
}

pub(crate) fn agent_active_model(entity: &Agent) -> agent::ActiveModel {
    agent::ActiveModel {
        id: key(entity),
        name: Set(entity.name.clone()),
        description: Set(entity.description.clone()),
        role: Set(entity.role.clone()),
    }
}

impl From<map::Model> for Map {
    fn from(model: map::Model) -> Self {
        Map {
            id: model.id,
            name: model.name,
            kind: model.kind,
        }
    }
}

pub(crate) fn map_active_model(entity: &Map) -> map::ActiveModel {
    map::ActiveModel {
        id: key(entity),
        name: Set(entity.name.clone()),
        kind: Set(entity.kind.clone()),
    }
}

impl From<game_match::Model> for Match {
    fn from(model: game_match::Model) -> Self {
        Match {
            id: model.id,
            played_on: model.played_on,
            map_id: model.map_id,
            outcome: model.outcome,
        }
    }
}

pub(crate) fn match_active_model(entity: &Match) -> game_match::ActiveModel {
    game_match::ActiveModel {
        id: key(entity),
        played_on: Set(entity.played_on),
        map_id: Set(entity.map_id),
        outcome: Set(entity.outcome.clone()),
    }
}

impl From<player::Model> for Player {
    fn from(model: player::Model) -> Self {
        Player {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            email: model.email,
            region: model.region,
            rank: model.rank,
        }
    }
}

/// Agent and weapon assignments stay `NotSet`: an update keeps them and an
/// insert leaves them null.
pub(crate) fn player_active_model(entity: &Player) -> player::ActiveModel {
    player::ActiveModel {
        id: key(entity),
        username: Set(entity.username.clone()),
        display_name: Set(entity.display_name.clone()),
        email: Set(entity.email.clone()),
        region: Set(entity.region.clone()),
        rank: Set(entity.rank.clone()),
        agent_id: NotSet,
        weapon_id: NotSet,
    }
}

impl From<weapon::Model> for Weapon {
    fn from(model: weapon::Model) -> Self {
        Weapon {
            id: model.id,
            name: model.name,
            kind: model.kind,
        }
    }
}

pub(crate) fn weapon_active_model(entity: &Weapon) -> weapon::ActiveModel {
    weapon::ActiveModel {
        id: key(entity),
        name: Set(entity.name.clone()),
        kind: Set(entity.kind.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_new_entity_leaves_key_unset() {
        let active = agent_active_model(&Agent {
            name: "Jett".to_string(),
            ..Agent::default()
        });
        assert_eq!(active.id, ActiveValue::NotSet);
        assert_eq!(active.name, ActiveValue::Set("Jett".to_string()));
    }

    #[test]
    fn test_persisted_entity_sets_key() {
        let active = weapon_active_model(&Weapon {
            id: 4,
            name: "Phantom".to_string(),
            kind: "Rifle".to_string(),
        });
        assert_eq!(active.id, ActiveValue::Set(4));
    }

    #[test]
    fn test_player_model_drops_assignments() {
        let model = player::Model {
            id: 2,
            username: "tenz".to_string(),
            display_name: "TenZ".to_string(),
            email: "tenz@example.com".to_string(),
            region: "NA".to_string(),
            rank: "Radiant".to_string(),
            agent_id: Some(1),
            weapon_id: None,
        };
        let player = Player::from(model);
        assert_eq!(player.id, 2);
        assert_eq!(player.display_name, "TenZ");

        let active = player_active_model(&player);
        assert_eq!(active.agent_id, ActiveValue::NotSet);
        assert_eq!(active.weapon_id, ActiveValue::NotSet);
    }
}
