//! Anti-forgery credentials attached to submissions.

use tracing::warn;

/// Cookie holding the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Request header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Supplies the anti-forgery token for outgoing submissions.
pub trait CredentialProvider: Send + Sync {
    /// Returns the current token, or `None` when no credential is set.
    fn token(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Reads the token from a `document.cookie` style string.
#[derive(Debug, Clone)]
pub struct CookieCredentials {
    cookies: String,
    name: String,
}

impl CookieCredentials {
    /// Reads the `csrftoken` cookie from `cookies`.
    pub fn new(cookies: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
            name: CSRF_COOKIE.to_string(),
        }
    }

    /// Reads a differently named cookie.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl CredentialProvider for CookieCredentials {
    fn token(&self) -> Option<String> {
        let prefix = format!("{}=", self.name);
        let raw = self
            .cookies
            .split(';')
            .map(str::trim)
            .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))?;

        match urlencoding::decode(raw) {
            Ok(token) => Some(token.into_owned()),
            Err(err) => {
                warn!(cookie = %self.name, error = %err, "Ignoring undecodable cookie");
                None
            }
        }
    }
}

/// A fixed token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    /// Always supplies `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Never supplies a token.
    pub const fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_token() {
        let creds = CookieCredentials::new("sessionid=abc; csrftoken=Xy%2B9z; theme=dark");
        assert_eq!(creds.token().as_deref(), Some("Xy+9z"));
    }

    #[test]
    fn test_cookie_absent() {
        assert_eq!(CookieCredentials::new("sessionid=abc").token(), None);
        assert_eq!(CookieCredentials::new("").token(), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let creds = CookieCredentials::new("mycsrftoken=nope; csrftoken=yes");
        assert_eq!(creds.token().as_deref(), Some("yes"));
    }

    #[test]
    fn test_custom_cookie_name() {
        let creds = CookieCredentials::new("csrftoken=a; xsrf=b").cookie_name("xsrf");
        assert_eq!(creds.token().as_deref(), Some("b"));
    }

    #[test]
    fn test_static_and_closure() {
        assert_eq!(StaticCredentials::new("t").token().as_deref(), Some("t"));
        assert_eq!(StaticCredentials::none().token(), None);

        let provider = || Some("live".to_string());
        assert_eq!(provider.token().as_deref(), Some("live"));
    }
}
