/// Supplies the current session token on demand. Every outbound call asks
/// this accessor instead of reading some ambient global; "no token" means
/// the session is gone and the caller should head back to login.
pub trait SessionSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Fixed token, handed over once. Suits tests and one-shot scripts.
pub struct StaticSession {
    token: String,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl SessionSource for StaticSession {
    fn access_token(&self) -> Option<String> {
        if self.token.trim().is_empty() {
            None
        } else {
            Some(self.token.clone())
        }
    }
}

/// Reads the token from an environment variable on every call, so an
/// external refresh (or logout) is picked up without restarting.
pub struct EnvSession {
    var: String,
}

impl EnvSession {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl SessionSource for EnvSession {
    fn access_token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.trim().is_empty())
    }
}
