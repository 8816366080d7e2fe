use sea_orm::entity::prelude::*;

/// Join row linking a player to a match they took part in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "MATCH_PLAYER")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "PLAYER_ID")]
    pub player_id: i64,
    #[sea_orm(primary_key, auto_increment = false, column_name = "MATCH_ID")]
    pub match_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_delete = "Cascade"
    )]
    Player,
    #[sea_orm(
        belongs_to = "super::game_match::Entity",
        from = "Column::MatchId",
        to = "super::game_match::Column::Id",
        on_delete = "Cascade"
    )]
    GameMatch,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::game_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMatch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
