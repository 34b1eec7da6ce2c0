//! People API module split into logical submodules
//!
//! - auth: Credential loading, refresh and interactive authorization
//! - connections: Contact list fetching

pub mod auth;
pub mod connections;

pub use auth::{try_authenticate, Credential, CredentialStore, FileTokenStore};
pub use connections::ContactsClient;
