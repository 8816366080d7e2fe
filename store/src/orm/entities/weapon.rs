use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "WEAPON")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "WEAPON_ID")]
    pub id: i64,
    #[sea_orm(column_name = "NAME")]
    pub name: String,
    #[sea_orm(column_name = "TYPE")]
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::player::Entity")]
    Player,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
