use sea_orm::entity::prelude::*;

/// A row of the `MATCH` table. The map relation is navigational only; the
/// schema has no foreign key on `MAP_ID`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "MATCH")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "MATCH_ID")]
    pub id: i64,
    #[sea_orm(column_name = "PLAYED_ON")]
    pub played_on: DateTime,
    #[sea_orm(column_name = "MAP_ID")]
    pub map_id: i64,
    #[sea_orm(column_name = "OUTCOME")]
    pub outcome: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::map::Entity",
        from = "Column::MapId",
        to = "super::map::Column::Id"
    )]
    Map,
    #[sea_orm(has_many = "super::match_player::Entity")]
    MatchPlayer,
}

impl Related<super::map::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Map.def()
    }
}

impl Related<super::match_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayer.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        super::match_player::Relation::Player.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::match_player::Relation::GameMatch.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
