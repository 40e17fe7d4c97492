use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    IdentityService, SeaOrmIdentityService, SeaOrmUserService, TokenIssuer, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub token_issuer: Arc<TokenIssuer>,

    pub identity_service: Arc<dyn IdentityService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // Fails fast on a missing signing key instead of rejecting every login
        let token_issuer = Arc::new(TokenIssuer::new(&config.auth)?);

        let identity_service = Arc::new(SeaOrmIdentityService::new(
            store.clone(),
            token_issuer.clone(),
            &config.auth,
        )) as Arc<dyn IdentityService + Send + Sync + 'static>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService + Send + Sync + 'static>;

        let config_arc = Arc::new(RwLock::new(config));

        Ok(Self {
            config: config_arc,
            store,
            token_issuer,
            identity_service,
            user_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
