//! Token storage and credential input.
//!
//! This module provides:
//! - `TokenPair`: the access/refresh token pair issued by the service
//! - `TokenStore`: the storage seam injected into every session handler
//! - `MemoryStore`, `FileStore`, `KeyringStore`: the storage backends
//! - `LoginForm`, `RegistrationForm`, `ExternalToken`: transient credential input
//!
//! Tokens are scoped to the origin of the service they were issued by.

pub mod file_store;
pub mod forms;
pub mod keyring_store;
pub mod store;
pub mod tokens;

pub use file_store::FileStore;
pub use forms::{ExternalToken, LoginForm, RegistrationForm};
pub use keyring_store::KeyringStore;
pub use store::{MemoryStore, TokenStore};
pub use tokens::{origin_of, origin_slug, TokenPair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
