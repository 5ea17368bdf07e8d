//! Post-submission navigation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Moves the page to another location.
pub trait Navigator: Send + Sync {
    /// Navigates to `url`.
    fn navigate(&self, url: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, url: &str) {
        self(url);
    }
}

type Resolver = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Where to go after a successful submission.
#[derive(Clone)]
pub enum Redirect {
    /// A fixed URL.
    To(String),
    /// Computed from the response data. `None` skips navigation.
    Resolve(Resolver),
}

impl Redirect {
    /// Redirects to a fixed URL.
    pub fn to(url: impl Into<String>) -> Self {
        Self::To(url.into())
    }

    /// Redirects to a URL computed from the response data.
    pub fn resolve<F>(resolver: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self::Resolve(Arc::new(resolver))
    }

    /// Redirects to the string found under `field` in the response object.
    pub fn response_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::resolve(move |data| data.get(&field)?.as_str().map(str::to_string))
    }

    /// Returns the target for the given response data.
    pub fn target(&self, data: &Value) -> Option<String> {
        match self {
            Self::To(url) => Some(url.clone()),
            Self::Resolve(resolver) => resolver(data),
        }
    }
}

impl fmt::Debug for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::To(url) => f.debug_tuple("To").field(url).finish(),
            Self::Resolve(_) => f.write_str("Resolve(..)"),
        }
    }
}
