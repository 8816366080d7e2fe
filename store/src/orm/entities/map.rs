use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "MAP")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "MAP_ID")]
    pub id: i64,
    #[sea_orm(column_name = "NAME")]
    pub name: String,
    #[sea_orm(column_name = "TYPE")]
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_match::Entity")]
    GameMatch,
}

impl Related<super::game_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMatch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
