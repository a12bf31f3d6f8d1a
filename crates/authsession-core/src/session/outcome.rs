use reqwest::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Tokens stored, probe accepted, user sent to the success view.
    LoggedIn,
    /// Tokens stored but the probe of the success view was refused.
    /// The user gets no feedback in this case.
    ProbeRejected(StatusCode),
    /// The service answered without an access token.
    InvalidCredentials,
    TransportFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Rejected(StatusCode),
    TransportFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// No external token was present, nothing was sent.
    Skipped,
    Exchanged,
    Rejected(StatusCode),
    TransportFailed,
}

/// Where a stored-token validation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The access token was accepted; `message` is what the service said.
    Valid { message: Option<String> },
    /// The access token had expired and the single refresh replaced the pair.
    Refreshed,
    /// The access token had expired and the refresh did not produce a new one.
    RefreshFailed,
    /// The service refused for a reason other than expiry.
    Rejected(StatusCode),
    TransportFailed,
}

/// Presence of the two stored entries, without their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub has_access_token: bool,
    pub has_refresh_token: bool,
}
