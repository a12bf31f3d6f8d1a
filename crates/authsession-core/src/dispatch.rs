//! Named UI actions and the dispatcher that routes them to session handlers.
//!
//! Front ends translate their own events (a form submit, a button, a
//! subcommand) into an `Action` and hand it to `Dispatcher::dispatch`. The
//! dispatcher never fails: a local error is logged and shown as a notice, so
//! the front end stays usable afterwards.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error};

use crate::auth::{ExternalToken, LoginForm, RegistrationForm};
use crate::session::client::error_notice;
use crate::session::{
    ExchangeOutcome, LoginOutcome, RegistrationOutcome, SessionClient, SessionStatus,
    ValidationOutcome,
};

/// The name a front end uses for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    PageLoad,
    Login,
    Register,
    Validate,
    Logout,
    Status,
}

impl ActionName {
    pub const ALL: [ActionName; 6] = [
        ActionName::PageLoad,
        ActionName::Login,
        ActionName::Register,
        ActionName::Validate,
        ActionName::Logout,
        ActionName::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::PageLoad => "page-load",
            ActionName::Login => "login",
            ActionName::Register => "register",
            ActionName::Validate => "validate",
            ActionName::Logout => "logout",
            ActionName::Status => "status",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for ActionName {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// A UI action together with the input it carries.
#[derive(Debug, Clone)]
pub enum Action {
    /// The page finished loading; `external_token` is the provider token
    /// field, possibly empty.
    PageLoaded { external_token: ExternalToken },
    Login(LoginForm),
    Register(RegistrationForm),
    ValidateToken,
    Logout,
    Status,
}

impl Action {
    pub fn name(&self) -> ActionName {
        match self {
            Action::PageLoaded { .. } => ActionName::PageLoad,
            Action::Login(_) => ActionName::Login,
            Action::Register(_) => ActionName::Register,
            Action::ValidateToken => ActionName::Validate,
            Action::Logout => ActionName::Logout,
            Action::Status => ActionName::Status,
        }
    }
}

/// What a dispatched action resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Exchange(ExchangeOutcome),
    Login(LoginOutcome),
    Registration(RegistrationOutcome),
    Validation(ValidationOutcome),
    LoggedOut,
    Status(SessionStatus),
    /// The handler hit a local error; it has been logged and shown.
    Failed,
}

pub struct Dispatcher {
    session: SessionClient,
}

impl Dispatcher {
    pub fn new(session: SessionClient) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionClient {
        &self.session
    }

    pub async fn dispatch(&self, action: Action) -> Outcome {
        let name = action.name();
        debug!(action = %name, "Dispatching action");

        let result = match action {
            Action::PageLoaded { external_token } => self
                .session
                .exchange_external_token(&external_token)
                .await
                .map(Outcome::Exchange),
            Action::Login(form) => self.session.submit_login(&form).await.map(Outcome::Login),
            Action::Register(form) => self
                .session
                .submit_registration(&form)
                .await
                .map(Outcome::Registration),
            Action::ValidateToken => self
                .session
                .validate_stored_token()
                .await
                .map(Outcome::Validation),
            Action::Logout => self.session.logout().map(|()| Outcome::LoggedOut),
            Action::Status => self.session.status().map(Outcome::Status),
        };

        match result {
            Ok(outcome) => {
                debug!(action = %name, ?outcome, "Action finished");
                outcome
            }
            Err(e) => {
                error!(action = %name, error = %format!("{:#}", e), "Action failed");
                self.session
                    .frontend()
                    .notify(&error_notice(&format!("{:#}", e)));
                Outcome::Failed
            }
        }
    }
}
