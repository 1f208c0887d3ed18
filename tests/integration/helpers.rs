//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use sessionkeeper_auth::{
    Argon2Verifier, CredentialVerifier, DeviceResolver, JwtIssuer, MemorySessionStore,
    MemoryUserDirectory, MetadataDeviceResolver, PgSessionStore, SessionController,
    SessionStore,
};
use sessionkeeper_core::config::{AuthConfig, DatabaseConfig};
use sessionkeeper_database::DatabasePool;
use sessionkeeper_database::repositories::UserRepository;
use sessionkeeper_entity::device::DeviceMetadata;
use sessionkeeper_entity::session::TokenPair;
use sessionkeeper_entity::user::{CreateUser, User};

/// Signing secret used by every test controller.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Password given to every test user.
pub const TEST_PASSWORD: &str = "password123";

/// Desktop Firefox user-agent.
pub const DESKTOP_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Mobile Safari user-agent.
pub const PHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";

/// Cheap Argon2 parameters so tests stay fast.
pub fn test_verifier() -> Argon2Verifier {
    Argon2Verifier::with_params(8 * 1024, 1, 1).expect("argon2 params")
}

/// Metadata for the first test device.
pub fn desktop() -> DeviceMetadata {
    DeviceMetadata::new("192.168.1.10", DESKTOP_UA)
}

/// Metadata for the second test device.
pub fn phone() -> DeviceMetadata {
    DeviceMetadata::new("10.20.30.40", PHONE_UA)
}

/// Present the same refresh token from `n` tasks at once and collect the
/// pairs of every call that succeeded.
pub async fn refresh_concurrently(
    controller: &SessionController,
    refresh_token: &str,
    meta: &DeviceMetadata,
    n: usize,
) -> Vec<TokenPair> {
    let mut handles = Vec::with_capacity(n);
    for _ in 0..n {
        let controller = controller.clone();
        let token = refresh_token.to_string();
        let meta = meta.clone();
        handles.push(tokio::spawn(async move {
            controller.refresh(&token, &meta).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        if let Ok(pair) = handle.await.expect("join") {
            winners.push(pair);
        }
    }
    winners
}

/// How many of `pairs` hold the refresh token currently stored for the device.
pub async fn count_current(
    store: &dyn SessionStore,
    user_id: Uuid,
    meta: &DeviceMetadata,
    pairs: &[TokenPair],
) -> usize {
    let device = MetadataDeviceResolver::new()
        .resolve(&meta.ip, &meta.user_agent)
        .expect("resolve device");
    let mut current = 0;
    for pair in pairs {
        if store
            .is_valid(user_id, &device, &pair.refresh_token)
            .await
            .expect("is_valid")
        {
            current += 1;
        }
    }
    current
}

/// In-memory application context
pub struct TestApp {
    /// Controller under test
    pub controller: SessionController,
    /// Backing session store, for assertions
    pub store: MemorySessionStore,
    /// Backing user directory
    pub users: MemoryUserDirectory,
}

impl TestApp {
    /// Create a new in-memory application
    pub fn new() -> Self {
        let store = MemorySessionStore::new();
        let users = MemoryUserDirectory::new();
        let controller = SessionController::new(
            Arc::new(test_verifier()),
            Arc::new(JwtIssuer::new(&AuthConfig::with_secret(TEST_SECRET)).expect("issuer")),
            Arc::new(MetadataDeviceResolver::new()),
            Arc::new(store.clone()),
            Arc::new(users.clone()),
            Duration::from_secs(5),
        );
        Self {
            controller,
            store,
            users,
        }
    }

    /// Create an active user with [`TEST_PASSWORD`]
    pub async fn create_test_user(&self, email: &str) -> User {
        let hash = test_verifier().hash(TEST_PASSWORD).expect("hash");
        self.users.add(email, hash).await
    }
}

/// PostgreSQL-backed application context, driven by `DATABASE_URL`
pub struct PgTestApp {
    /// Controller under test
    pub controller: SessionController,
    /// Database pool for direct queries
    pub db_pool: PgPool,
}

impl PgTestApp {
    /// Connect, migrate, and build a controller
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 60,
        };
        let db_pool = DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to test database")
            .into_pool();

        sessionkeeper_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let controller =
            SessionController::with_postgres(db_pool.clone(), &AuthConfig::with_secret(TEST_SECRET))
                .expect("controller");

        Self {
            controller,
            db_pool,
        }
    }

    /// Create a user with a unique email and [`TEST_PASSWORD`]
    pub async fn create_test_user(&self) -> User {
        UserRepository::new(self.db_pool.clone())
            .create(&CreateUser {
                email: format!("user-{}@example.com", Uuid::new_v4()),
                password_hash: Argon2Verifier::new().hash(TEST_PASSWORD).expect("hash"),
            })
            .await
            .expect("Failed to create test user")
    }

    /// Direct handle on the PostgreSQL store backing the controller
    pub fn store(&self) -> PgSessionStore {
        PgSessionStore::new(self.db_pool.clone())
    }

    /// Count unrevoked, unexpired sessions of a user
    pub async fn active_sessions(&self, user_id: Uuid) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND NOT revoked AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await
        .expect("count sessions")
    }
}
