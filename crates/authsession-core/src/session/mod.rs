//! Session handlers: the operations a user can trigger against the
//! authentication service.
//!
//! Each handler runs one linear request chain, talks to the user only through
//! the injected `Frontend`, and reads and writes tokens only through the
//! injected `TokenStore`.

pub mod client;
pub mod frontend;
pub mod outcome;

pub use client::SessionClient;
pub use frontend::{Frontend, FrontendEvent, RecordingFrontend};
pub use outcome::{ExchangeOutcome, LoginOutcome, RegistrationOutcome, SessionStatus, ValidationOutcome};
