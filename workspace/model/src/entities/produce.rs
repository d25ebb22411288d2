use sea_orm::entity::prelude::*;
use sea_orm::{ActiveEnum, Iterable};

/// The closed set of units a listing can be measured in.
/// Inbound payloads are validated against this enum, so the serializer
/// and the column definition cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum MeasurementUnit {
    #[sea_orm(string_value = "bags")]
    Bags,
    #[sea_orm(string_value = "kg")]
    Kg,
    #[sea_orm(string_value = "tonnes")]
    Tonnes,
    #[sea_orm(string_value = "crates")]
    Crates,
    #[sea_orm(string_value = "litres")]
    Litres,
    #[sea_orm(string_value = "pieces")]
    Pieces,
}

impl MeasurementUnit {
    /// All accepted wire values, in declaration order.
    pub fn choices() -> Vec<String> {
        Self::iter().map(|unit| unit.to_value()).collect()
    }
}

/// A produce listing offered by a user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "produce")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub produce_name: String,
    pub produce_category_id: i32,
    /// Units currently available. Never negative.
    pub stock: i32,
    pub measurement_unit: MeasurementUnit,
    /// The user who created the listing; the only one allowed to mutate it.
    pub owner_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub price_tag: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::ProduceCategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
