use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::Client;

use super::{HttpClient, TransportError};
use crate::request::HttpRequest;
use crate::response::HttpResponse;

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(Box::new(err))
    }
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    http: Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a preconfigured `reqwest::Client` (e.g. with timeouts or a
    /// proxy).
    pub fn with_http_client(client: Client) -> Self {
        Self { http: client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            mut headers,
            auth,
            body,
        } = request;

        let authorization: HeaderValue = auth
            .header_value()
            .parse()
            .map_err(|e| TransportError::Other(Box::new(e)))?;
        headers.insert(AUTHORIZATION, authorization);

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await;
        finish(status, headers, body)
    }
}

/// Turn a received response into the delegate outcome.
///
/// A non-2xx answer stays a [`TransportError::Status`] even when its body
/// could not be read; the body is then empty.
fn finish(
    status: StatusCode,
    headers: HeaderMap,
    body: Result<Bytes, reqwest::Error>,
) -> Result<HttpResponse, TransportError> {
    let body = match body {
        Ok(body) => body,
        Err(err) if !status.is_success() => {
            tracing::debug!(%status, error = %err, "failed to read error response body");
            Bytes::new()
        }
        Err(err) => return Err(err.into()),
    };

    let response = HttpResponse::new(status, headers, body);
    if !status.is_success() {
        return Err(TransportError::Status(Box::new(response)));
    }
    Ok(response)
}
