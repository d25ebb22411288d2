//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the produce marketplace here: user
//! accounts, their optional profiles, listing categories, and the
//! produce listings themselves.

pub mod category;
pub mod produce;
pub mod profile;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::category::Entity as Category;
    pub use super::produce::Entity as Produce;
    pub use super::profile::Entity as Profile;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn create_user(db: &DatabaseConnection, email: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set("$argon2id$stub".to_string()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            date_joined: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users
        let user1 = create_user(&db, "grower@example.com").await?;
        let user2 = create_user(&db, "buyer@example.com").await?;

        // Create a profile for the first user
        let profile1 = profile::ActiveModel {
            user_id: Set(user1.id),
            gender: Set(Some(profile::Gender::Female)),
            phone_number: Set(Some("23456".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create categories
        let fruits = category::ActiveModel {
            category_name: Set("Fruits".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let vegetables = category::ActiveModel {
            category_name: Set("Vegetables".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create produce listings
        let oranges = produce::ActiveModel {
            produce_name: Set("orange R".to_string()),
            produce_category_id: Set(fruits.id),
            stock: Set(30),
            measurement_unit: Set(produce::MeasurementUnit::Bags),
            owner_id: Set(user1.id),
            price_tag: Set(Decimal::new(12, 0)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let carrots = produce::ActiveModel {
            produce_name: Set("carrots".to_string()),
            produce_category_id: Set(vegetables.id),
            stock: Set(500),
            measurement_unit: Set(produce::MeasurementUnit::Kg),
            owner_id: Set(user2.id),
            price_tag: Set(Decimal::new(250, 2)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data

        // Verify users
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.email == "grower@example.com"));
        assert!(users.iter().any(|u| u.email == "buyer@example.com"));

        // Verify the profile hangs off its user
        let (found_user, found_profile) = User::find_by_id(user1.id)
            .find_also_related(Profile)
            .one(&db)
            .await?
            .expect("user1 should exist");
        assert_eq!(found_user.email, "grower@example.com");
        let found_profile = found_profile.expect("user1 should have a profile");
        assert_eq!(found_profile.id, profile1.id);
        assert_eq!(found_profile.gender, Some(profile::Gender::Female));
        assert_eq!(found_profile.phone_number.as_deref(), Some("23456"));

        // user2 has no profile
        let (_, no_profile) = User::find_by_id(user2.id)
            .find_also_related(Profile)
            .one(&db)
            .await?
            .expect("user2 should exist");
        assert!(no_profile.is_none());

        // Verify produce with owners
        let listings = Produce::find().find_also_related(User).all(&db).await?;
        assert_eq!(listings.len(), 2);
        let (orange_row, orange_owner) = listings
            .iter()
            .find(|(p, _)| p.id == oranges.id)
            .expect("orange listing should exist");
        assert_eq!(orange_row.stock, 30);
        assert_eq!(orange_row.measurement_unit, produce::MeasurementUnit::Bags);
        assert_eq!(
            orange_owner.as_ref().map(|u| u.email.as_str()),
            Some("grower@example.com")
        );

        // Verify produce by category
        let fruit_listings = Produce::find()
            .filter(produce::Column::ProduceCategoryId.eq(fruits.id))
            .all(&db)
            .await?;
        assert_eq!(fruit_listings.len(), 1);
        assert_eq!(fruit_listings[0].id, oranges.id);

        // Duplicate email must be rejected by the unique key
        let duplicate = create_user(&db, "grower@example.com").await;
        assert!(duplicate.is_err());

        // A category still referenced by produce cannot be deleted
        let restricted = Category::delete_by_id(vegetables.id).exec(&db).await;
        assert!(restricted.is_err());

        // Deleting a user cascades to its profile and listings
        User::delete_by_id(user1.id).exec(&db).await?;
        let orphan_profile = Profile::find()
            .filter(profile::Column::UserId.eq(user1.id))
            .one(&db)
            .await?;
        assert!(orphan_profile.is_none());
        let orphan_listings = Produce::find()
            .filter(produce::Column::OwnerId.eq(user1.id))
            .all(&db)
            .await?;
        assert!(orphan_listings.is_empty());

        // The other user's listing is untouched
        let remaining = Produce::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, carrots.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_measurement_unit_choices() {
        let choices = produce::MeasurementUnit::choices();
        assert_eq!(
            choices,
            vec!["bags", "kg", "tonnes", "crates", "litres", "pieces"]
        );
        assert!(!choices.contains(&"single".to_string()));
    }
}
