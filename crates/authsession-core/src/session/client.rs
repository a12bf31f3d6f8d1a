use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, AuthClient};
use crate::auth::{ExternalToken, LoginForm, RegistrationForm, TokenPair, TokenStore};

use super::{
    ExchangeOutcome, Frontend, LoginOutcome, RegistrationOutcome, SessionStatus, ValidationOutcome,
};

// ============================================================================
// Views and notices
// ============================================================================

pub const SUCCESS_VIEW: &str = "/success";
pub const LOGIN_VIEW: &str = "/login";
pub const LOGOUT_VIEW: &str = "/logout";

pub const INVALID_CREDENTIALS_NOTICE: &str = "invalid credentials";
pub const REGISTRATION_SUCCESS_NOTICE: &str = "Registration successful!";
pub const TOKEN_EXPIRED_NOTICE: &str = "Token has expired. Refreshing token.. Please try again";

/// Generic notice for a request that failed or a local error.
pub fn error_notice(cause: &dyn std::fmt::Display) -> String {
    format!("Error: {}", cause)
}

/// Runs the login, registration, exchange, validation and logout flows.
///
/// `Err` from a handler means a local failure (the token store could not be
/// read or written). Everything the service or the network does wrong is an
/// outcome, reported to the user or the log as the flow requires.
pub struct SessionClient {
    api: AuthClient,
    store: Arc<dyn TokenStore>,
    frontend: Arc<dyn Frontend>,
}

impl SessionClient {
    pub fn new(api: AuthClient, store: Arc<dyn TokenStore>, frontend: Arc<dyn Frontend>) -> Self {
        Self {
            api,
            store,
            frontend,
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn frontend(&self) -> &Arc<dyn Frontend> {
        &self.frontend
    }

    fn store_tokens(&self, pair: &TokenPair) -> Result<()> {
        if pair.refresh_token.is_empty() {
            warn!("Token response carried no refresh token, storing an empty one");
        }
        self.store.set(pair).context("Failed to store token pair")?;
        info!("Token pair stored");
        Ok(())
    }

    fn notify_request_failed(&self, err: &ApiError) {
        self.frontend.notify(&error_notice(err));
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Log in with username and password, then confirm the new access token
    /// against the success view before navigating there.
    pub async fn submit_login(&self, form: &LoginForm) -> Result<LoginOutcome> {
        debug!(username = %form.username, "Submitting login");

        let response = match self.api.login(&form.username, &form.password).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Login request failed");
                self.notify_request_failed(&e);
                return Ok(LoginOutcome::TransportFailed);
            }
        };

        let Some(pair) = response.token_pair() else {
            warn!(status = %response.status, "Login response carried no access token");
            self.frontend.notify(INVALID_CREDENTIALS_NOTICE);
            return Ok(LoginOutcome::InvalidCredentials);
        };

        self.store_tokens(&pair)?;

        match self.api.probe_success(&pair.access_token).await {
            Ok(status) if status.is_success() => {
                info!(username = %form.username, "Login successful");
                self.frontend.navigate(SUCCESS_VIEW);
                Ok(LoginOutcome::LoggedIn)
            }
            Ok(status) => {
                // No user feedback here, only the log
                debug!(%status, "Success view refused the new access token");
                Ok(LoginOutcome::ProbeRejected(status))
            }
            Err(e) => {
                error!(error = %e, "Success view probe failed");
                self.notify_request_failed(&e);
                Ok(LoginOutcome::TransportFailed)
            }
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new account. Only HTTP 201 counts as success.
    pub async fn submit_registration(&self, form: &RegistrationForm) -> Result<RegistrationOutcome> {
        debug!(username = %form.username, email = %form.email, "Submitting registration");

        let response = match self
            .api
            .register(&form.email, &form.username, &form.password)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Registration request failed");
                self.notify_request_failed(&e);
                return Ok(RegistrationOutcome::TransportFailed);
            }
        };

        if response.status == StatusCode::CREATED {
            info!(username = %form.username, "Registration successful");
            self.frontend.notify(REGISTRATION_SUCCESS_NOTICE);
            self.frontend.navigate(LOGIN_VIEW);
            return Ok(RegistrationOutcome::Registered);
        }

        warn!(status = %response.status, "Registration refused");
        let notice = match response.message {
            Some(ref message) => error_notice(message),
            None => error_notice(&format!(
                "registration failed with status {}",
                response.status.as_u16()
            )),
        };
        self.frontend.notify(&notice);
        Ok(RegistrationOutcome::Rejected(response.status))
    }

    // =========================================================================
    // External provider exchange
    // =========================================================================

    /// Trade an external provider token for a token pair. Does nothing when
    /// the token input is empty.
    pub async fn exchange_external_token(&self, token: &ExternalToken) -> Result<ExchangeOutcome> {
        let Some(token) = token.value() else {
            debug!("No external token present, skipping exchange");
            return Ok(ExchangeOutcome::Skipped);
        };

        let response = match self.api.exchange_github(token).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Token exchange request failed");
                self.notify_request_failed(&e);
                return Ok(ExchangeOutcome::TransportFailed);
            }
        };

        match response.token_pair() {
            Some(pair) => {
                self.store_tokens(&pair)?;
                info!("External token exchanged");
                Ok(ExchangeOutcome::Exchanged)
            }
            None => {
                warn!(status = %response.status, "Token exchange refused");
                if let Some(ref message) = response.message {
                    self.frontend.notify(message);
                }
                Ok(ExchangeOutcome::Rejected(response.status))
            }
        }
    }

    // =========================================================================
    // Validation and refresh
    // =========================================================================

    /// Check the stored access token against the service. On 401 the stored
    /// refresh token is traded for a new pair, once. Failures of this flow are
    /// logged but never shown.
    pub async fn validate_stored_token(&self) -> Result<ValidationOutcome> {
        let access_token = self
            .store
            .access_token()
            .context("Failed to read access token")?;
        if access_token.is_none() {
            debug!("No access token stored, validating without one");
        }

        let response = match self.api.validate_token(access_token.as_deref()).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Token validation request failed");
                return Ok(ValidationOutcome::TransportFailed);
            }
        };

        if response.status.is_success() {
            match response.message {
                Some(ref message) => self.frontend.notify(message),
                None => warn!("Validation response carried no message"),
            }
            return Ok(ValidationOutcome::Valid {
                message: response.message,
            });
        }

        match ApiError::from_status(response.status, &response.body) {
            ApiError::Unauthorized => {
                info!("Access token rejected, refreshing");
                self.frontend.notify(TOKEN_EXPIRED_NOTICE);
                self.refresh_once().await
            }
            err => {
                warn!(error = %err, "Token validation refused");
                Ok(ValidationOutcome::Rejected(response.status))
            }
        }
    }

    /// The stored refresh token, with an empty entry counting as none.
    fn stored_refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .refresh_token()
            .context("Failed to read refresh token")?
            .filter(|t| !t.is_empty()))
    }

    async fn refresh_once(&self) -> Result<ValidationOutcome> {
        let Some(refresh_token) = self.stored_refresh_token()? else {
            warn!("Access token expired and no refresh token is stored");
            return Ok(ValidationOutcome::RefreshFailed);
        };

        let response = match self.api.refresh(&refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Token refresh request failed");
                return Ok(ValidationOutcome::RefreshFailed);
            }
        };

        match response.token_pair() {
            Some(pair) => {
                self.store_tokens(&pair)?;
                info!("Access token refreshed");
                Ok(ValidationOutcome::Refreshed)
            }
            None => {
                warn!(
                    status = %response.status,
                    message = response.message.as_deref().unwrap_or(""),
                    "Token refresh refused"
                );
                Ok(ValidationOutcome::RefreshFailed)
            }
        }
    }

    // =========================================================================
    // Logout and status
    // =========================================================================

    /// Forget both tokens and go to the logout view. Navigation happens even
    /// if the store could not be cleared; that failure is returned afterwards.
    pub fn logout(&self) -> Result<()> {
        let cleared = self.store.clear().context("Failed to clear stored tokens");
        if cleared.is_ok() {
            info!("Stored tokens cleared");
        }
        self.frontend.navigate(LOGOUT_VIEW);
        cleared
    }

    pub fn status(&self) -> Result<SessionStatus> {
        Ok(SessionStatus {
            has_access_token: self.store.access_token()?.is_some(),
            has_refresh_token: self.stored_refresh_token()?.is_some(),
        })
    }
}
