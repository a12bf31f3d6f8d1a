use url::Url;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "authToken";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// The access/refresh token pair issued by the service.
///
/// No expiry is tracked: an expired access token is only discovered when a
/// protected endpoint answers 401.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens never end up in logs through `{:?}`
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// The origin (`scheme://host[:port]`) that scopes stored tokens.
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Turn an origin into a directory name safe on every platform.
pub fn origin_slug(origin: &str) -> String {
    let mut slug = String::with_capacity(origin.len());
    for c in origin.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}
