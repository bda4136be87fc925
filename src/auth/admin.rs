//! Admin gate
//!
//! The configured secret is either a 64 character SHA-256 hex digest or, as a
//! fallback, the plaintext password. The gate is advisory: it decides which
//! mutations this client will issue, nothing more.

use crate::error::ApiError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Lowercase hex SHA-256 of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Compare `attempt` against the configured secret.
///
/// The secret is trimmed; a blank secret counts as not configured. The attempt
/// is compared as given.
pub fn check_secret(attempt: &str, configured: Option<&str>) -> Result<(), ApiError> {
    let secret = configured
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::NotConfigured)?;

    let ok = if is_sha256_hex(secret) {
        sha256_hex(attempt).eq_ignore_ascii_case(secret)
    } else {
        attempt == secret
    };

    if ok {
        Ok(())
    } else {
        Err(ApiError::WrongPassword)
    }
}

/// Decides whether an admin password attempt is valid.
#[async_trait]
pub trait AdminAuthority: Send + Sync {
    async fn verify(&self, attempt: &str) -> Result<(), ApiError>;

    /// Whether any secret exists to check against.
    fn is_configured(&self) -> bool;
}

/// Checks attempts against a locally configured secret.
#[derive(Debug, Clone, Default)]
pub struct SecretAuthority {
    secret: Option<String>,
}

impl SecretAuthority {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl AdminAuthority for SecretAuthority {
    async fn verify(&self, attempt: &str) -> Result<(), ApiError> {
        check_secret(attempt, self.secret.as_deref())
    }

    fn is_configured(&self) -> bool {
        self.secret
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Proof that the gate was open when it was issued.
///
/// Only [`AdminGate`] can create one. Mutation entry points take it by
/// reference.
#[derive(Debug)]
pub struct AdminCapability {
    _private: (),
}

pub struct AdminGate {
    authority: Arc<dyn AdminAuthority>,
    authorized: AtomicBool,
}

impl AdminGate {
    pub fn new(authority: Arc<dyn AdminAuthority>) -> Self {
        Self {
            authority,
            authorized: AtomicBool::new(false),
        }
    }

    /// Check `attempt` (trimmed) and open the gate on success. A failed
    /// attempt leaves the current state untouched.
    pub async fn authorize(&self, attempt: &str) -> Result<AdminCapability, ApiError> {
        match self.authority.verify(attempt.trim()).await {
            Ok(()) => {
                self.authorized.store(true, Ordering::SeqCst);
                info!("Admin gate unlocked");
                Ok(AdminCapability { _private: () })
            }
            Err(e) => {
                warn!(error = %e, "Admin authorization rejected");
                Err(e)
            }
        }
    }

    pub fn lock(&self) {
        if self.authorized.swap(false, Ordering::SeqCst) {
            info!("Admin gate locked");
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    pub fn is_configured(&self) -> bool {
        self.authority.is_configured()
    }

    pub fn capability(&self) -> Option<AdminCapability> {
        self.is_authorized().then_some(AdminCapability { _private: () })
    }

    /// Capability for a mutation, or `AdminRequired` when locked.
    pub fn require(&self) -> Result<AdminCapability, ApiError> {
        let configured = self.is_configured();
        match self.capability() {
            Some(cap) if configured => Ok(cap),
            _ => Err(ApiError::AdminRequired {
                not_configured: !configured,
            }),
        }
    }
}
