//! Authentication collaborators
//!
//! Sign-in goes through an [`AuthProvider`]. Mutations are additionally gated
//! by an [`AdminGate`] whose check is delegated to an [`AdminAuthority`], so a
//! server-side check can replace the bundled secret comparison.

pub mod admin;
pub mod provider;

pub use admin::{
    check_secret, is_sha256_hex, sha256_hex, AdminAuthority, AdminCapability, AdminGate,
    SecretAuthority,
};
pub use provider::{Account, AuthProvider, StaticAuthProvider, User};
