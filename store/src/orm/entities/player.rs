use sea_orm::entity::prelude::*;

/// A row of the `PLAYER` table, including the owning side of the agent and
/// weapon assignments.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "PLAYER")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "PLAYER_ID")]
    pub id: i64,
    #[sea_orm(column_name = "USERNAME")]
    pub username: String,
    #[sea_orm(column_name = "DISPLAY_NAME")]
    pub display_name: String,
    #[sea_orm(column_name = "EMAIL")]
    pub email: String,
    #[sea_orm(column_name = "REGION")]
    pub region: String,
    #[sea_orm(column_name = "RANK")]
    pub rank: String,
    #[sea_orm(column_name = "AGENT_ID")]
    pub agent_id: Option<i64>,
    #[sea_orm(column_name = "WEAPON_ID")]
    pub weapon_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id",
        on_delete = "SetNull"
    )]
    Agent,
    #[sea_orm(
        belongs_to = "super::weapon::Entity",
        from = "Column::WeaponId",
        to = "super::weapon::Column::Id",
        on_delete = "SetNull"
    )]
    Weapon,
    #[sea_orm(has_many = "super::match_player::Entity")]
    MatchPlayer,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::weapon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weapon.def()
    }
}

impl Related<super::match_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayer.def()
    }
}

impl Related<super::game_match::Entity> for Entity {
    fn to() -> RelationDef {
        super::match_player::Relation::GameMatch.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::match_player::Relation::Player.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
