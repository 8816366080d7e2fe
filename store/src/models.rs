//! Plain entity records shared by every backend and front end.
//!
//! An entity with `id <= 0` has not been persisted yet; repositories assign
//! the id on the first `save`. `Default` produces such a blank entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier type used by every entity.
pub type Id = i64;

/// Common behaviour of the five reference-data records.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable entity name, e.g. `"Agent"`.
    const NAME: &'static str;

    fn id(&self) -> Id;

    fn set_id(&mut self, id: Id);

    /// `true` until the entity has been assigned an id by a repository.
    fn is_new(&self) -> bool {
        self.id() <= 0
    }
}

/// A playable agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    pub description: String,
    /// Free-text category: Duelist, Sentinel, Controller or Initiator.
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A played match. `map_id` is a raw reference and is not checked against
/// the stored maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default)]
    pub id: Id,
    pub played_on: NaiveDateTime,
    pub map_id: Id,
    pub outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub id: Id,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub region: String,
    pub rank: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

macro_rules! impl_entity {
    ($($ty:ident => $name:literal),* $(,)?) => {
        $(
            impl Entity for $ty {
                const NAME: &'static str = $name;

                fn id(&self) -> Id {
                    self.id
                }

                fn set_id(&mut self, id: Id) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_entity! {
    Agent => "Agent",
    Map => "Map",
    Match => "Match",
    Player => "Player",
    Weapon => "Weapon",
}
