use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod query;
pub mod repositories;

pub use query::FindOptions;
pub use repositories::user::NewUser;

use crate::entities::users;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn find_user_by_auth_key(&self, auth_key: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_by_auth_key(auth_key).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_by_email(email).await
    }

    pub async fn find_user_by_email_and_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<users::Model>> {
        self.user_repo()
            .find_by_email_and_reset_code(email, code)
            .await
    }

    pub async fn find_user_by_email_and_activation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<users::Model>> {
        self.user_repo()
            .find_by_email_and_activation_code(email, code)
            .await
    }

    pub async fn user_email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn find_users(
        &self,
        options: FindOptions<users::Entity>,
    ) -> Result<Vec<users::Model>> {
        self.user_repo().find(options).await
    }

    pub async fn insert_user(&self, user: NewUser) -> Result<users::Model> {
        self.user_repo().insert(user).await
    }

    pub async fn save_user(&self, user: users::Model) -> Result<Option<users::Model>> {
        self.user_repo().save(user).await
    }
}
