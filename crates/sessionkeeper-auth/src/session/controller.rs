//! Session lifecycle controller: login, refresh rotation, and revocation.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use sqlx::PgPool;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use sessionkeeper_core::config::AuthConfig;
use sessionkeeper_core::error::{AppError, ErrorKind};
use sessionkeeper_database::repositories::UserRepository;
use sessionkeeper_entity::device::{Device, DeviceMetadata};
use sessionkeeper_entity::session::TokenPair;
use sessionkeeper_entity::user::Credentials;

use crate::context::AuthContext;
use crate::device::{DeviceResolver, MetadataDeviceResolver};
use crate::jwt::{JwtIssuer, TokenIssuer, TokenType};
use crate::password::{Argon2Verifier, CredentialVerifier};
use crate::user::UserDirectory;

use super::digest::hash_token;
use super::store::{PgSessionStore, SessionStore};

/// Longest accepted device display name, in characters.
pub const MAX_DEVICE_NAME_LEN: usize = 100;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const TOKEN_REVOKED: &str = "Refresh token is no longer valid";

/// Hashed once per controller and compared against when no usable account
/// matches, so every failed login costs one password check.
const DECOY_PASSWORD: &str = "sessionkeeper-decoy-password";

/// Orchestrates credential checks, token issuance, and session state.
///
/// Holds no per-request state; clones share the same collaborators.
#[derive(Clone)]
pub struct SessionController {
    /// Password verification.
    verifier: Arc<dyn CredentialVerifier>,
    /// Token minting and parsing.
    issuer: Arc<dyn TokenIssuer>,
    /// Device identity derivation.
    resolver: Arc<dyn DeviceResolver>,
    /// Session persistence.
    store: Arc<dyn SessionStore>,
    /// User lookup.
    users: Arc<dyn UserDirectory>,
    /// Deadline for each store or directory call.
    store_timeout: Duration,
    /// Lazily built hash of [`DECOY_PASSWORD`]; `None` if hashing failed.
    decoy_hash: Arc<OnceLock<Option<String>>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("issuer", &self.issuer)
            .field("store", &self.store)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Creates a controller from explicit collaborators.
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        issuer: Arc<dyn TokenIssuer>,
        resolver: Arc<dyn DeviceResolver>,
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            issuer,
            resolver,
            store,
            users,
            store_timeout,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Creates a controller wired to PostgreSQL with the default
    /// Argon2, JWT, and device resolver implementations.
    pub fn with_postgres(pool: PgPool, config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            Arc::new(Argon2Verifier::new()),
            Arc::new(JwtIssuer::new(config)?),
            Arc::new(MetadataDeviceResolver::new()),
            Arc::new(PgSessionStore::new(pool.clone())),
            Arc::new(UserRepository::new(pool)),
            config.store_timeout(),
        ))
    }

    /// Authenticate by password and open a session on the caller's device.
    pub async fn login(
        &self,
        credentials: &Credentials,
        meta: &DeviceMetadata,
    ) -> Result<TokenPair, AppError> {
        let device = self.resolver.resolve(&meta.ip, &meta.user_agent)?;

        let user = self
            .bounded(
                "user_directory.find_by_email",
                self.users.find_by_email(&credentials.email),
            )
            .await
            .map_err(|e| surface("login", e))?;

        let Some(user) = user else {
            self.compare_decoy(&credentials.password);
            info!(device_id = %device.id, "Login failed: unknown email");
            return Err(AppError::invalid_credentials(INVALID_CREDENTIALS));
        };

        if !user.is_active {
            self.compare_decoy(&credentials.password);
            warn!(user_id = %user.id, "Login attempt on inactive account");
            return Err(AppError::invalid_credentials(INVALID_CREDENTIALS));
        }

        if let Err(e) = self
            .verifier
            .compare(&user.password_hash, &credentials.password)
        {
            if e.kind == ErrorKind::Hashing {
                error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
            } else {
                info!(user_id = %user.id, device_id = %device.id, "Login failed: wrong password");
            }
            return Err(AppError::invalid_credentials(INVALID_CREDENTIALS));
        }

        let pair = self
            .issuer
            .issue_pair(user.id)
            .map_err(|e| surface("login", e.context("token_issuer.issue_pair")))?;

        self.bounded(
            "session_store.create",
            self.store.create(
                user.id,
                &hash_token(&pair.refresh_token),
                pair.refresh_expires_at,
                &device,
            ),
        )
        .await
        .map_err(|e| surface("login", e))?;

        info!(user_id = %user.id, device_id = %device.id, "User logged in");
        Ok(pair)
    }

    /// Rotate a refresh token.
    ///
    /// A valid token yields a new pair and revokes every session of the
    /// user, on all devices, before the new one is recorded. Any token that
    /// is not the current one for this device fails with `TokenRevoked`.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        meta: &DeviceMetadata,
    ) -> Result<TokenPair, AppError> {
        let claims = match self.issuer.parse(refresh_token) {
            Ok(claims) if claims.typ == TokenType::Refresh => claims,
            Ok(claims) => {
                warn!(user_id = %claims.sub, "Access token presented for refresh");
                return Err(AppError::token_revoked(TOKEN_REVOKED));
            }
            Err(e) => {
                debug!(error = %e, "Unparseable refresh token");
                return Err(AppError::token_revoked(TOKEN_REVOKED));
            }
        };
        let user_id = claims.user_id();

        let device = self.resolver.resolve(&meta.ip, &meta.user_agent)?;

        let valid = self
            .bounded(
                "session_store.is_valid",
                self.store.is_valid(user_id, &device, refresh_token),
            )
            .await
            .map_err(|e| surface("refresh", e))?;

        if !valid {
            warn!(
                user_id = %user_id,
                device_id = %device.id,
                "Refresh rejected: token revoked, superseded, or from another device"
            );
            return Err(AppError::token_revoked(TOKEN_REVOKED));
        }

        let pair = self
            .issuer
            .issue_pair(user_id)
            .map_err(|e| surface("refresh", e.context("token_issuer.issue_pair")))?;

        let revoked = self
            .bounded("session_store.revoke_all", self.store.revoke_all(user_id))
            .await
            .map_err(|e| surface("refresh", e))?;

        self.bounded(
            "session_store.create",
            self.store.create(
                user_id,
                &hash_token(&pair.refresh_token),
                pair.refresh_expires_at,
                &device,
            ),
        )
        .await
        .map_err(|e| {
            error!(user_id = %user_id, "Rotation failed after revocation; user is logged out");
            surface("refresh", e)
        })?;

        info!(
            user_id = %user_id,
            device_id = %device.id,
            revoked_sessions = revoked,
            "Refresh token rotated"
        );
        Ok(pair)
    }

    /// Revoke every session of the user. Repeating it is harmless.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AppError> {
        let revoked = self
            .bounded("session_store.revoke_all", self.store.revoke_all(user_id))
            .await
            .map_err(|e| surface("logout", e))?;

        info!(user_id = %user_id, revoked_sessions = revoked, "User logged out");
        Ok(())
    }

    /// Validate an access token and return the caller's identity.
    pub fn authenticate(&self, access_token: &str) -> Result<AuthContext, AppError> {
        let claims = self.issuer.parse(access_token).map_err(|e| {
            debug!(error = %e, "Access token rejected");
            AppError::invalid_token("Invalid access token")
        })?;

        if claims.typ != TokenType::Access {
            return Err(AppError::invalid_token("Invalid access token"));
        }

        Ok(AuthContext::from(&claims))
    }

    /// List the user's devices, most recently active first.
    pub async fn list_devices(&self, user_id: Uuid) -> Result<Vec<Device>, AppError> {
        self.bounded("session_store.list_devices", self.store.list_devices(user_id))
            .await
            .map_err(|e| surface("list_devices", e))
    }

    /// Fetch one of the user's devices.
    pub async fn get_device(&self, user_id: Uuid, device_id: &str) -> Result<Device, AppError> {
        self.bounded(
            "session_store.get_device",
            self.store.get_device(user_id, device_id),
        )
        .await
        .map_err(|e| surface("get_device", e))?
        .ok_or_else(|| AppError::not_found("Device not found"))
    }

    /// Give a device a display name.
    pub async fn rename_device(
        &self,
        user_id: Uuid,
        device_id: &str,
        name: &str,
    ) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Device name must not be empty"));
        }
        if name.chars().count() > MAX_DEVICE_NAME_LEN {
            return Err(AppError::validation(format!(
                "Device name must be at most {MAX_DEVICE_NAME_LEN} characters"
            )));
        }

        let renamed = self
            .bounded(
                "session_store.rename_device",
                self.store.rename_device(user_id, device_id, name),
            )
            .await
            .map_err(|e| surface("rename_device", e))?;

        if !renamed {
            return Err(AppError::not_found("Device not found"));
        }
        info!(user_id = %user_id, device_id = %device_id, "Device renamed");
        Ok(())
    }

    /// Forget a device. Its session goes with it.
    pub async fn delete_device(&self, user_id: Uuid, device_id: &str) -> Result<(), AppError> {
        let deleted = self
            .bounded(
                "session_store.delete_device",
                self.store.delete_device(user_id, device_id),
            )
            .await
            .map_err(|e| surface("delete_device", e))?;

        if !deleted {
            return Err(AppError::not_found("Device not found"));
        }
        info!(user_id = %user_id, device_id = %device_id, "Device deleted");
        Ok(())
    }

    /// Revoke the session of a single device. Repeating it is harmless.
    pub async fn revoke_device(&self, user_id: Uuid, device_id: &str) -> Result<(), AppError> {
        let revoked = self
            .bounded(
                "session_store.revoke_by_device",
                self.store.revoke_by_device(user_id, device_id),
            )
            .await
            .map_err(|e| surface("revoke_device", e))?;

        info!(
            user_id = %user_id,
            device_id = %device_id,
            revoked_sessions = revoked,
            "Device session revoked"
        );
        Ok(())
    }

    /// Spend the same hashing work as a real password check.
    fn compare_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.verifier.hash(DECOY_PASSWORD).ok());
        if let Some(hash) = decoy {
            let _ = self.verifier.compare(hash, password);
        }
    }

    /// Run a collaborator call under the store deadline, naming it in any
    /// error. Dropping the future on timeout rolls back open transactions.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(|e| e.context(op)),
            Err(_) => Err(AppError::timeout(format!(
                "{op}: no response within {:?}",
                self.store_timeout
            ))),
        }
    }
}

/// Log infrastructure failures in full and hand back the transport-safe form.
fn surface(op: &str, err: AppError) -> AppError {
    if err.kind.is_infrastructure() {
        error!(op, kind = %err.kind, error = %err, "Session operation failed");
    }
    err.surface()
}
