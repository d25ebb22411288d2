use sea_orm::entity::prelude::*;

/// Named grouping for produce listings.
/// Referenced by `Produce`, never embedded in it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub category_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::produce::Entity")]
    Produce,
}

impl Related<super::produce::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Produce.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
