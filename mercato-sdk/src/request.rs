//! Request options and the request description handed to the delegate.

use bytes::Bytes;
use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::auth::BasicAuth;

pub const APPLICATION_JSON: &str = "application/json";

/// How request bodies are encoded and which content negotiation headers are
/// added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Serialization {
    /// Encode [`Body::Json`] as JSON and send `Content-Type` / `Accept:
    /// application/json` unless the caller already set them.
    #[default]
    Json,
    /// Send the body bytes as given without adding any headers.
    Raw,
}

/// A request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
}

impl Body {
    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        Ok(match self {
            Body::Json(value) => Bytes::from(serde_json::to_vec(value)?),
            Body::Text(text) => Bytes::from(text.clone()),
            Body::Bytes(bytes) => bytes.clone(),
        })
    }
}

/// Caller-supplied options for a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
    pub serialization: Serialization,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialize `body` to a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(Body::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn serialization(mut self, serialization: Serialization) -> Self {
        self.serialization = serialization;
        self
    }
}

/// A fully resolved request, ready for an [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub auth: BasicAuth,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Build the description from caller options.
    ///
    /// Query pairs are appended to `url`. `user_agent` and `auth` are
    /// applied last so they always win over caller headers.
    pub(crate) fn assemble(
        method: Method,
        mut url: Url,
        options: RequestOptions,
        auth: BasicAuth,
        user_agent: &HeaderValue,
    ) -> Result<Self, serde_json::Error> {
        let RequestOptions {
            mut headers,
            query,
            body,
            serialization,
        } = options;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        if serialization == Serialization::Json {
            let json = HeaderValue::from_static(APPLICATION_JSON);
            if !headers.contains_key(ACCEPT) {
                headers.insert(ACCEPT, json.clone());
            }
            if matches!(body, Some(Body::Json(_))) && !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, json);
            }
        }

        headers.insert(http::header::USER_AGENT, user_agent.clone());
        headers.remove(http::header::AUTHORIZATION);

        let body = body.as_ref().map(Body::to_bytes).transpose()?;

        Ok(Self {
            method,
            url,
            headers,
            auth,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{AUTHORIZATION, USER_AGENT};

    fn assemble(options: RequestOptions) -> HttpRequest {
        HttpRequest::assemble(
            Method::POST,
            Url::parse("https://api.mercato.io/v3/orders").unwrap(),
            options,
            BasicAuth::new("ck", "cs"),
            &HeaderValue::from_static("test-agent/1.0"),
        )
        .unwrap()
    }

    #[test]
    fn test_json_body_sets_content_headers() {
        let options = RequestOptions::new()
            .json(&serde_json::json!({ "status": "completed" }))
            .unwrap();
        let request = assemble(options);

        assert_eq!(request.headers[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(request.headers[ACCEPT], APPLICATION_JSON);
        assert_eq!(
            request.body.as_deref(),
            Some(br#"{"status":"completed"}"#.as_slice())
        );
    }

    #[test]
    fn test_raw_serialization_adds_nothing() {
        let options = RequestOptions::new()
            .body(Body::Text("a=b".to_string()))
            .serialization(Serialization::Raw);
        let request = assemble(options);

        assert!(!request.headers.contains_key(CONTENT_TYPE));
        assert!(!request.headers.contains_key(ACCEPT));
        assert_eq!(request.body.as_deref(), Some(b"a=b".as_slice()));
    }

    #[test]
    fn test_caller_content_type_is_kept() {
        let options = RequestOptions::new()
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/merge-patch+json"),
            )
            .json(&serde_json::json!({}))
            .unwrap();
        let request = assemble(options);

        assert_eq!(request.headers[CONTENT_TYPE], "application/merge-patch+json");
    }

    #[test]
    fn test_user_agent_and_authorization_are_overridden() {
        let options = RequestOptions::new()
            .header(USER_AGENT, HeaderValue::from_static("spoofed"))
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer stolen"));
        let request = assemble(options);

        assert_eq!(request.headers[USER_AGENT], "test-agent/1.0");
        assert!(!request.headers.contains_key(AUTHORIZATION));
        assert_eq!(request.auth, BasicAuth::new("ck", "cs"));
    }

    #[test]
    fn test_query_pairs_are_appended() {
        let options = RequestOptions::new()
            .query("per_page", "20")
            .query("status", "on hold");
        let request = assemble(options);

        assert_eq!(
            request.url.as_str(),
            "https://api.mercato.io/v3/orders?per_page=20&status=on+hold"
        );
    }
}
