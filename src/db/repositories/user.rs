use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter,
};

use crate::db::query::FindOptions;
use crate::entities::user_metadata::UserMetadata;
use crate::entities::users;

/// Columns for a row that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub password_hash: String,
    pub auth_key: String,
    pub first_name: String,
    pub last_name: String,
    pub role: users::UserRole,
    pub status: users::UserStatus,
    pub metadata: UserMetadata,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_auth_key(&self, auth_key: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::AuthKey.eq(auth_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by auth key")
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    /// Fetch by email, then match the reset code from the JSON metadata.
    /// Sqlite JSON-path filtering is avoided on purpose; one row per email
    /// makes the in-process check cheap.
    pub async fn find_by_email_and_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<users::Model>> {
        let user = self.find_by_email(email).await?;

        Ok(user.filter(|u| u.metadata.password.reset_code.as_deref() == Some(code)))
    }

    pub async fn find_by_email_and_activation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<users::Model>> {
        let user = self.find_by_email(email).await?;

        Ok(user.filter(|u| {
            u.metadata.activation.pending
                && u.metadata.activation.code.as_deref() == Some(code)
        }))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to count users by email")?;

        Ok(count > 0)
    }

    pub async fn find(&self, options: FindOptions<users::Entity>) -> Result<Vec<users::Model>> {
        options
            .into_select()
            .all(&self.conn)
            .await
            .context("Failed to query users")
    }

    pub async fn insert(&self, user: NewUser) -> Result<users::Model> {
        let now = Utc::now();

        let active = users::ActiveModel {
            id: NotSet,
            email: Set(user.email),
            password: Set(user.password),
            password_hash: Set(user.password_hash),
            auth_key: Set(user.auth_key),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            role: Set(user.role),
            status: Set(user.status),
            metadata: Set(user.metadata),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")
    }

    /// Full-row update keyed on id. Returns `None` when no row was touched,
    /// which callers treat as a failed process rather than a db error.
    pub async fn save(&self, user: users::Model) -> Result<Option<users::Model>> {
        let active = users::ActiveModel {
            id: Unchanged(user.id),
            email: Set(user.email),
            password: Set(user.password),
            password_hash: Set(user.password_hash),
            auth_key: Set(user.auth_key),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            role: Set(user.role),
            status: Set(user.status),
            metadata: Set(user.metadata),
            created_at: Unchanged(user.created_at),
            updated_at: Set(Utc::now()),
        };

        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).context("Failed to update user"),
        }
    }
}
