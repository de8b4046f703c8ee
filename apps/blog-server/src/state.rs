//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::domain::SessionPolicy;
use inkwell_core::ports::{
    PasswordService, PostRepository, RateLimiter, SessionStore, UserRepository,
};
use inkwell_core::services::{AuthService, PostService};
use inkwell_infra::{
    Argon2Config, Argon2PasswordService, InMemoryPostRepository, InMemorySessionStore,
    InMemoryUserRepository,
};

use crate::config::{AppConfig, SessionBackend, SessionConfig};

/// Failures while wiring up the application.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(String),

    #[error("session store: {0}")]
    Sessions(String),

    #[error("password hashing: {0}")]
    Hashing(String),

    #[error("rate limiter: {0}")]
    RateLimit(String),
}

/// Site-wide settings the handlers read.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub session: SessionConfig,
    pub admin_signup_enabled: bool,
    /// Key client throttling on `Forwarded` / `X-Forwarded-For`.
    pub trust_proxy_headers: bool,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub settings: Arc<SiteSettings>,
    /// Throttle for credential endpoints; `None` disables it.
    pub login_limiter: Option<Arc<dyn RateLimiter>>,
}

/// The stores behind the services.
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub passwords: Arc<dyn PasswordService>,
}

impl Stores {
    /// Process-local stores. Everything is lost on restart.
    pub fn in_memory(passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            passwords,
        }
    }
}

impl AppState {
    /// Assemble services from already-built stores.
    pub fn from_stores(stores: Stores, settings: SiteSettings) -> Self {
        let policy = SessionPolicy {
            ttl: chrono::Duration::seconds(settings.session.ttl_secs),
        };

        Self {
            auth: AuthService::new(stores.users, stores.sessions, stores.passwords, policy),
            posts: PostService::new(stores.posts),
            settings: Arc::new(settings),
            login_limiter: None,
        }
    }

    pub fn with_login_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.login_limiter = Some(limiter);
        self
    }

    /// Build the application state from configuration.
    pub async fn build(config: &AppConfig) -> Result<Self, StartupError> {
        let passwords: Arc<dyn PasswordService> = Arc::new(
            Argon2PasswordService::with_config(Argon2Config::from_env())
                .map_err(|e| StartupError::Hashing(e.to_string()))?,
        );

        let mut stores = Stores::in_memory(passwords);
        Self::attach_database(config, &mut stores).await?;
        Self::attach_session_store(config, &mut stores).await?;

        let settings = SiteSettings {
            session: config.session.clone(),
            admin_signup_enabled: config.admin_signup_enabled,
            trust_proxy_headers: config.trust_proxy_headers,
        };
        let state = Self::from_stores(stores, settings);

        #[cfg(feature = "rate-limit")]
        let state = match &config.login_rate_limit {
            Some(limit) => {
                let limiter = inkwell_infra::InMemoryRateLimiter::new(limit)
                    .map_err(|e| StartupError::RateLimit(e.to_string()))?;
                state.with_login_limiter(Arc::new(limiter))
            }
            None => state,
        };

        tracing::info!(
            session_backend = ?config.session.backend,
            session_ttl_secs = config.session.ttl_secs,
            login_throttled = state.login_limiter.is_some(),
            "Application state initialized"
        );

        Ok(state)
    }

    #[cfg(feature = "postgres")]
    async fn attach_database(config: &AppConfig, stores: &mut Stores) -> Result<(), StartupError> {
        use inkwell_infra::database::connect;
        use inkwell_infra::{PostgresPostRepository, PostgresUserRepository};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Users and posts are kept in memory.");
            return Ok(());
        };

        let conn = connect(db_config)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        stores.users = Arc::new(PostgresUserRepository::new(conn.clone()));
        stores.posts = Arc::new(PostgresPostRepository::new(conn));
        Ok(())
    }

    #[cfg(not(feature = "postgres"))]
    async fn attach_database(_config: &AppConfig, _stores: &mut Stores) -> Result<(), StartupError> {
        tracing::info!("Running without postgres feature - users and posts are kept in memory");
        Ok(())
    }

    async fn attach_session_store(
        config: &AppConfig,
        stores: &mut Stores,
    ) -> Result<(), StartupError> {
        if config.session.backend == SessionBackend::Memory {
            return Ok(());
        }

        #[cfg(feature = "redis")]
        {
            let store = inkwell_infra::RedisSessionStore::new(&config.redis)
                .await
                .map_err(|e| StartupError::Sessions(e.to_string()))?;
            stores.sessions = Arc::new(store);
        }

        #[cfg(not(feature = "redis"))]
        {
            let _ = stores;
            tracing::warn!("SESSION_STORE=redis but the redis feature is disabled; using memory");
        }

        Ok(())
    }
}
