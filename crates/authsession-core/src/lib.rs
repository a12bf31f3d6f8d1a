//! Core library for authsession.
//!
//! Talks to a token-issuing authentication service on behalf of a front end:
//! submits credentials, keeps the issued access/refresh token pair in an
//! origin-scoped store, presents the access token as a bearer credential and
//! trades the refresh token for a new pair when the service answers 401.
//!
//! The pieces fit together like this:
//! - `api::AuthClient` speaks HTTP to the service
//! - `auth::TokenStore` persists the token pair
//! - `session::SessionClient` runs the user-facing flows
//! - `dispatch::Dispatcher` maps named UI actions onto those flows
//! - `config::Config` picks the service and the store backend

pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod session;

pub use api::{ApiError, AuthClient};
pub use auth::{MemoryStore, TokenPair, TokenStore};
pub use config::{Config, StoreBackend};
pub use dispatch::{Action, ActionName, Dispatcher, Outcome};
pub use session::{Frontend, SessionClient};
