//! Sign-in collaborator.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
}

/// Email/password pair accepted by [`StaticAuthProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Fails with [`ApiError::AuthFailure`] on rejected credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;

    /// Session state; the receiver sees every transition.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;

    fn current_user(&self) -> Option<User> {
        self.subscribe().borrow().clone()
    }
}

/// Accepts a fixed list of accounts.
pub struct StaticAuthProvider {
    accounts: Vec<Account>,
    state: watch::Sender<Option<User>>,
}

impl StaticAuthProvider {
    pub fn new(accounts: Vec<Account>) -> Self {
        let (state, _) = watch::channel(None);
        Self { accounts, state }
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::AuthFailure(
                "email and password are required".to_string(),
            ));
        }

        let known = self
            .accounts
            .iter()
            .any(|a| a.email.trim().eq_ignore_ascii_case(email) && a.password == password);
        if !known {
            debug!(email = %email, "Rejected sign-in");
            return Err(ApiError::AuthFailure("invalid credentials".to_string()));
        }

        let user = User {
            email: email.to_string(),
        };
        info!(email = %email, "Signed in");
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        if self.state.send_replace(None).is_some() {
            info!("Signed out");
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }
}
