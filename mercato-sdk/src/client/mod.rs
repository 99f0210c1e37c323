//! Delegate HTTP clients.
//!
//! [`Transport`](crate::Transport) never talks to the network itself; it
//! builds an [`HttpRequest`] and hands it to an [`HttpClient`]. The default
//! delegate is [`ReqwestClient`], gated behind the `client` cargo feature
//! (on by default) so embedders bringing their own client do not pull in
//! `reqwest`.

#[cfg(feature = "client")]
mod reqwest_client;

#[cfg(feature = "client")]
pub use reqwest_client::ReqwestClient;

use async_trait::async_trait;

use crate::request::HttpRequest;
use crate::response::HttpResponse;

/// Failure reported by a delegate client.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Transport-level failure (DNS, TLS, connection reset, …). No response
    /// is available.
    #[error("http error: {0}")]
    Http(Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-2xx status code.
    #[error("request failed with status {}", .0.status)]
    Status(Box<HttpResponse>),

    /// Failure raised by a custom delegate.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// The response attached to this failure, if the server answered.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            TransportError::Status(response) => Some(response),
            _ => None,
        }
    }
}

/// Sends a request and receives either a response or a typed failure.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute `request`.
    ///
    /// Implementations return [`TransportError::Status`] for non-2xx
    /// answers so the response body stays available for classification.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use http::header::HeaderMap;

    #[test]
    fn test_status_error_exposes_response() {
        let response = HttpResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), "missing");
        let err = TransportError::Status(Box::new(response));

        assert_eq!(err.response().unwrap().status, StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "request failed with status 404 Not Found");
    }

    #[test]
    fn test_other_error_has_no_response() {
        let err = TransportError::Other("socket closed".into());
        assert!(err.response().is_none());
        assert_eq!(err.to_string(), "socket closed");
    }
}
