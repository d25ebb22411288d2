use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::FirstName))
                    .col(string(Users::LastName))
                    .col(timestamp_with_time_zone(Users::DateJoined))
                    .to_owned(),
            )
            .await?;

        // Create profiles table (one-to-one with users)
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(pk_auto(Profiles::Id))
                    .col(integer(Profiles::UserId).unique_key())
                    .col(string_len_null(Profiles::Gender, 1))
                    .col(string_null(Profiles::PhoneNumber))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::CategoryName).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create produce table
        manager
            .create_table(
                Table::create()
                    .table(Produce::Table)
                    .if_not_exists()
                    .col(pk_auto(Produce::Id))
                    .col(string(Produce::ProduceName))
                    .col(integer(Produce::ProduceCategoryId))
                    .col(integer(Produce::Stock))
                    .col(string_len(Produce::MeasurementUnit, 10))
                    .col(integer(Produce::OwnerId))
                    .col(decimal(Produce::PriceTag).decimal_len(16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_produce_category")
                            .from(Produce::Table, Produce::ProduceCategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_produce_owner")
                            .from(Produce::Table, Produce::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Produce::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    DateJoined,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    UserId,
    Gender,
    PhoneNumber,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    CategoryName,
}

#[derive(DeriveIden)]
enum Produce {
    Table,
    Id,
    ProduceName,
    ProduceCategoryId,
    Stock,
    MeasurementUnit,
    OwnerId,
    PriceTag,
}
