//! Network exchange.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use medform::{FieldValue, FormData};
use reqwest::multipart;
use tracing::debug;

use crate::error::{Result, SubmitError};
use crate::request::{Body, Request};
use crate::response::Response;

/// A boxed future for async transport operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Performs one request/response exchange.
///
/// # Example
///
/// ```ignore
/// struct Offline;
///
/// impl Transport for Offline {
///     fn send<'a>(&'a self, _request: Request) -> BoxFuture<'a, Result<Response>> {
///         Box::pin(async move { Err(SubmitError::Network("offline".into())) })
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response, whatever its status.
    fn send<'a>(&'a self, request: Request) -> BoxFuture<'a, Result<Response>>;
}

/// Transport backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Bounds every exchange. Expiry surfaces as [`SubmitError::Timeout`].
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, request: Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
                .map_err(|e| SubmitError::InvalidRequest(e.to_string()))?;

            let mut builder = self.client.request(method, &request.url);
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            builder = match request.body {
                Body::Empty => builder,
                Body::Form(pairs) => builder.form(&pairs),
                Body::Multipart(data) => builder.multipart(multipart_form(data)?),
            };
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| {
                    v.to_str()
                        .ok()
                        .map(|v| (k.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            debug!(status, bytes = body.len(), "Received response");
            Ok(Response {
                status,
                headers,
                body,
            })
        })
    }
}

fn multipart_form(data: FormData) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for (name, value) in data.iter() {
        form = match value {
            FieldValue::Text(text) => form.text(name.to_string(), text.clone()),
            FieldValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let mut part = multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(content_type) = content_type {
                    part = part.mime_str(content_type)?;
                }
                form.part(name.to_string(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_form_accepts_files() {
        let mut data = FormData::new().with("patient", "42");
        data.append_file(
            "scan",
            "ct.nii.gz",
            Some("application/gzip".to_string()),
            vec![1, 2, 3],
        );
        assert!(multipart_form(data).is_ok());
    }

    #[test]
    fn test_multipart_form_rejects_bad_mime() {
        let mut data = FormData::new();
        data.append_file("scan", "ct.bin", Some("not a mime".to_string()), vec![]);
        assert!(matches!(
            multipart_form(data),
            Err(SubmitError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_timeout_builder() {
        let transport = HttpTransport::new().with_timeout(Duration::from_secs(5));
        assert_eq!(transport.timeout, Some(Duration::from_secs(5)));
    }
}
