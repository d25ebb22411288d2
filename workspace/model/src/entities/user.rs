use sea_orm::entity::prelude::*;

/// A marketplace account holder.
///
/// The password is only ever persisted as an Argon2 hash; the hash column
/// must not leak into any outbound representation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Set once when the account is created, never updated afterwards.
    pub date_joined: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Optional one-to-one extension record.
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    /// Listings offered by this user.
    #[sea_orm(has_many = "super::produce::Entity")]
    Produce,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::produce::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Produce.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
