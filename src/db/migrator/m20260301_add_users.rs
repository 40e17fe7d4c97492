use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ActiveValue::{NotSet, Set};
use sea_orm_migration::sea_orm::ActiveModelTrait;
use sea_orm_migration::sea_orm::Schema;

use crate::domain::credentials;
use crate::entities::prelude::*;
use crate::entities::user_metadata::UserMetadata;
use crate::entities::users;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seeded admin account (change the password after first login)
const ADMIN_EMAIL: &str = "admin@inventra.local";
const ADMIN_PASSWORD: &str = "ChangeMe123!";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the initial admin so a fresh database is usable
        let encrypted =
            credentials::encrypt_password(ADMIN_PASSWORD, &crate::config::SecurityConfig::default())
                .map_err(|e| DbErr::Migration(format!("Failed to hash seed password: {e}")))?;

        let now = chrono::Utc::now();

        let admin = users::ActiveModel {
            id: NotSet,
            email: Set(ADMIN_EMAIL.to_string()),
            password: Set(encrypted.digest),
            password_hash: Set(encrypted.hash),
            auth_key: Set(credentials::generate_auth_key()),
            first_name: Set("System".to_string()),
            last_name: Set("Admin".to_string()),
            role: Set(users::UserRole::Admin),
            status: Set(users::UserStatus::Active),
            metadata: Set(UserMetadata::default()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        admin.insert(manager.get_connection()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
