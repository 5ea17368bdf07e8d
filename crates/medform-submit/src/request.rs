//! Outgoing submission request.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use medform::{FieldValue, FormData};

use crate::error::{Result, SubmitError};

/// Submission method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns whether the form travels in the query string.
    pub const fn uses_query(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl FromStr for Method {
    type Err = SubmitError;

    fn from_str(s: &str) -> Result<Self> {
        [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete]
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SubmitError::InvalidRequest(format!("unsupported method: {s}")))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`, used whenever a file is attached.
    Multipart(FormData),
}

impl Body {
    /// Encodes form pairs as `application/x-www-form-urlencoded`.
    pub fn urlencoded(pairs: &[(String, String)]) -> String {
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A submission about to be sent.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Body,
}

impl Request {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: Body::Empty,
        }
    }

    /// Creates a request carrying a form's field set.
    ///
    /// Files force a multipart body. For GET the text fields are appended
    /// to the query string instead.
    pub fn from_form(method: Method, url: impl Into<String>, data: &FormData) -> Self {
        let mut request = Self::new(method, url);

        if method.uses_query() {
            let query = Body::urlencoded(&text_pairs(data));
            if !query.is_empty() {
                let separator = if request.url.contains('?') { '&' } else { '?' };
                request.url = format!("{}{separator}{query}", request.url);
            }
        } else if data.has_files() {
            request.body = Body::Multipart(data.clone());
        } else {
            request.body = Body::Form(text_pairs(data));
        }

        request
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns a header value, matching the name case-insensitively.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn text_pairs(data: &FormData) -> Vec<(String, String)> {
    data.iter()
        .filter_map(|(name, value)| match value {
            FieldValue::Text(text) => Some((name.to_string(), text.clone())),
            FieldValue::File { .. } => None,
        })
        .collect()
}
