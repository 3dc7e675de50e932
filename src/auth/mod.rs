//! Caller authentication and credential lookup
//!
//! - [`IdentityProvider`] turns a bearer token into an [`Identity`].
//! - [`SecretStore`] maps an identity to the upstream [`Credential`].
//! - [`CredentialResolver`] performs the single per-batch lookup.

pub mod credential;
pub mod identity;
pub mod secrets;
pub mod types;


pub use credential::CredentialResolver;
pub use identity::{IdentityProvider, JwtIdentityProvider};
pub use secrets::{RestSecretStore, SecretStore, StaticSecretStore, secret_store_from_config};
pub use types::{Credential, Identity};
