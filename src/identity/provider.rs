use serde::Deserialize;

/// Credentials submitted to the sign-in endpoint, in either JSON or form encoding.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Decides whether a username/password pair identifies a user.
/// The answer is a plain yes/no so callers cannot leak which half was wrong.
pub trait CredentialValidator: Send + Sync {
    fn validate(&self, req: &LoginRequest) -> bool;
}

/// Single fixed user, for the reference deployment.
pub struct StaticCredentialValidator {
    username: String,
    password: String,
}

impl StaticCredentialValidator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl Default for StaticCredentialValidator {
    fn default() -> Self { Self::new("John", "password") }
}

impl CredentialValidator for StaticCredentialValidator {
    fn validate(&self, req: &LoginRequest) -> bool {
        // Evaluate both comparisons so timing does not hint at which one failed.
        let user_ok = req.username == self.username;
        let pass_ok = req.password == self.password;
        user_ok & pass_ok
    }
}
