//! Credential input collected from the user for a single handler call.
//!
//! Nothing here is validated or persisted; the service decides what is
//! acceptable.

/// Username and password for `POST /auth`.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Email, username and password for `POST /auth/user`.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token handed over by an external identity provider (GitHub).
#[derive(Clone, Default)]
pub struct ExternalToken(pub String);

impl ExternalToken {
    /// The token, unless the input field was empty or only whitespace.
    pub fn value(&self) -> Option<&str> {
        let trimmed = self.0.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for ExternalToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ExternalToken").field(&"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_token_value() {
        assert_eq!(ExternalToken("gho_123".into()).value(), Some("gho_123"));
        assert_eq!(ExternalToken("  gho_123 \n".into()).value(), Some("gho_123"));
        assert_eq!(ExternalToken(String::new()).value(), None);
        assert_eq!(ExternalToken("   ".into()).value(), None);
    }

    #[test]
    fn test_debug_hides_password() {
        let form = LoginForm::new("ana", "hunter2");
        let debug = format!("{:?}", form);
        assert!(debug.contains("ana"));
        assert!(!debug.contains("hunter2"));
    }
}
