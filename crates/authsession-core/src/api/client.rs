//! HTTP client for the authentication service.
//!
//! Every method maps to exactly one endpoint and returns the status together
//! with whatever the body carried. Deciding what counts as success is left to
//! the session handlers; the only error here is a request that never produced
//! a response.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::auth::TokenPair;

use super::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

pub const LOGIN_PATH: &str = "/auth";
pub const REGISTER_PATH: &str = "/auth/user";
pub const GITHUB_EXCHANGE_PATH: &str = "/auth/exchange/github";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const VALIDATE_PATH: &str = "/validate-token";
pub const SUCCESS_PATH: &str = "/success";

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegistrationRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

/// Superset of the bodies the service sends back: token responses carry
/// `AccessToken`/`refreshToken`, error and info responses carry `message`.
#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(rename = "AccessToken")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    message: Option<String>,
}

impl ResponseBody {
    /// Parse a body leniently. Empty or non-JSON bodies yield an empty value.
    fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

/// Response from an endpoint that may issue a token pair.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    pub status: StatusCode,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub message: Option<String>,
}

impl TokenResponse {
    fn from_body(status: StatusCode, text: &str) -> Self {
        let body = ResponseBody::parse(text);
        Self {
            status,
            access_token: body.access_token.filter(|t| !t.is_empty()),
            refresh_token: body.refresh_token,
            message: body.message,
        }
    }

    /// The issued token pair, if the response carried an access token.
    /// A missing refresh token is stored as an empty string.
    pub fn token_pair(&self) -> Option<TokenPair> {
        self.access_token.as_ref().map(|access| {
            TokenPair::new(
                access.clone(),
                self.refresh_token.clone().unwrap_or_default(),
            )
        })
    }
}

/// Response from an endpoint whose body is at most a `{"message": ...}` object.
#[derive(Debug, Clone)]
pub struct MessageResponse {
    pub status: StatusCode,
    pub message: Option<String>,
    pub body: String,
}

impl MessageResponse {
    fn from_body(status: StatusCode, body: String) -> Self {
        let message = ResponseBody::parse(&body).message;
        Self {
            status,
            message,
            body,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the authentication service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct AuthClient {
    client: Client,
    base_url: Url,
}

impl AuthClient {
    /// Create a client for the service at `base_url` with no request timeout.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client, optionally bounding every request by `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() || base_url.host().is_none() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(StatusCode, String), ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(path, %status, "POST completed");
        Ok((status, text))
    }

    async fn get_with_bearer(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<(StatusCode, String), ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, has_token = token.is_some(), "GET");

        let mut request = self.client.get(url).header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(path, %status, "GET completed");
        Ok((status, text))
    }

    /// POST /auth
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let (status, text) = self
            .post_json(LOGIN_PATH, &LoginRequest { username, password })
            .await?;
        Ok(TokenResponse::from_body(status, &text))
    }

    /// POST /auth/user
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = RegistrationRequest {
            email,
            username,
            password,
        };
        let (status, text) = self.post_json(REGISTER_PATH, &body).await?;
        Ok(MessageResponse::from_body(status, text))
    }

    /// POST /auth/exchange/github
    pub async fn exchange_github(&self, token: &str) -> Result<TokenResponse, ApiError> {
        let (status, text) = self
            .post_json(GITHUB_EXCHANGE_PATH, &ExchangeRequest { token })
            .await?;
        Ok(TokenResponse::from_body(status, &text))
    }

    /// POST /auth/refresh
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let (status, text) = self
            .post_json(REFRESH_PATH, &RefreshRequest { refresh_token })
            .await?;
        Ok(TokenResponse::from_body(status, &text))
    }

    /// GET /validate-token. Without a token the request goes out with no
    /// `Authorization` header and the service decides.
    pub async fn validate_token(&self, access_token: Option<&str>) -> Result<MessageResponse, ApiError> {
        let (status, text) = self.get_with_bearer(VALIDATE_PATH, access_token).await?;
        Ok(MessageResponse::from_body(status, text))
    }

    /// GET /success, used right after login to confirm the new token works.
    pub async fn probe_success(&self, access_token: &str) -> Result<StatusCode, ApiError> {
        let (status, _) = self.get_with_bearer(SUCCESS_PATH, Some(access_token)).await?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            AuthClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            AuthClient::new("mailto:someone@example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_is_origin_relative() {
        let client = AuthClient::new("http://localhost:8080/app/").unwrap();
        assert_eq!(
            client.endpoint(REFRESH_PATH).unwrap().as_str(),
            "http://localhost:8080/auth/refresh"
        );
    }

    #[test]
    fn test_response_body_parse_is_lenient() {
        let parsed = ResponseBody::parse("<html>oops</html>");
        assert!(parsed.access_token.is_none());
        assert!(parsed.message.is_none());

        let parsed = ResponseBody::parse(r#"{"AccessToken":"A","refreshToken":"R"}"#);
        assert_eq!(parsed.access_token.as_deref(), Some("A"));
        assert_eq!(parsed.refresh_token.as_deref(), Some("R"));
    }

    #[test]
    fn test_token_response_empty_access_token_is_absent() {
        let response = TokenResponse::from_body(StatusCode::OK, r#"{"AccessToken":""}"#);
        assert!(response.token_pair().is_none());
    }

    #[test]
    fn test_token_response_missing_refresh_token() {
        let response = TokenResponse::from_body(StatusCode::OK, r#"{"AccessToken":"A"}"#);
        let pair = response.token_pair().unwrap();
        assert_eq!(pair.access_token, "A");
        assert_eq!(pair.refresh_token, "");
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth"))
            .and(body_json(json!({"username": "ana", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"AccessToken": "A1", "refreshToken": "R1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let response = client.login("ana", "pw").await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.token_pair(), Some(TokenPair::new("A1", "R1")));
    }

    #[tokio::test]
    async fn test_refresh_sends_camel_case_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refreshToken": "R1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"AccessToken": "A2"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let response = client.refresh("R1").await.unwrap();
        assert_eq!(response.access_token.as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn test_validate_token_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate-token"))
            .and(header("Authorization", "Bearer A1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Token is valid"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let response = client.validate_token(Some("A1")).await.unwrap();
        assert!(response.status.is_success());
        assert_eq!(response.message.as_deref(), Some("Token is valid"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        // Bind then drop a listener so the port is very likely closed
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = AuthClient::new(&format!("http://127.0.0.1:{}", port)).unwrap();

        let err = client.login("ana", "pw").await.unwrap_err();
        assert!(err.is_transport());
    }
}
