use crate::core::error::AuthError;
use crate::models::session::Session;
use crate::models::user::Role;
use crate::storage::store::{Store, StoreKey};
use crate::utils::auth::constant_time_eq;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// The single administrator identity, supplied by configuration
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Admin
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

/// Login gate backed by the session record in the store
pub struct AuthGate {
    store: Arc<Store>,
    identity: Credentials,
}

impl AuthGate {
    pub fn new(store: Arc<Store>, identity: Credentials) -> Self {
        Self { store, identity }
    }

    /// Check credentials and record a session on success
    ///
    /// A failed attempt leaves any existing session record untouched.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        // Evaluate both comparisons so a wrong email costs the same as a wrong password
        let email_ok = constant_time_eq(email, &self.identity.email);
        let password_ok = constant_time_eq(password, &self.identity.password);

        if !(email_ok && password_ok) {
            warn!("Rejected login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            email: self.identity.email.clone(),
            name: self.identity.name.clone(),
            role: self.identity.role,
            is_authenticated: true,
        };

        if !self.store.save(StoreKey::Session, &session) {
            warn!(email = %session.email, "Login accepted but session could not be stored");
        }

        info!(email = %session.email, "Administrator logged in");
        Ok(session)
    }

    pub fn logout(&self) {
        if self.store.remove(StoreKey::Session) {
            info!("Administrator logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.contains(StoreKey::Session)
    }

    pub fn current_user(&self) -> Option<Session> {
        self.store.load(StoreKey::Session)
    }
}
