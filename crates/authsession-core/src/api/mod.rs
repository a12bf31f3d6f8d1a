//! REST client module for the authentication service.
//!
//! This module provides the `AuthClient` for the login, registration,
//! token exchange, refresh and validation endpoints.
//!
//! Protected endpoints use bearer token authentication with the access
//! token issued by the login or exchange endpoints.

pub mod client;
pub mod error;

pub use client::{AuthClient, MessageResponse, TokenResponse};
pub use error::ApiError;
