//! Errors returned by [`Transport`](crate::Transport) and the classification
//! of failed responses.

use std::fmt;

use http::header::InvalidHeaderValue;
use http::{Method, StatusCode};
use serde_json::{Map, Value};

use crate::client::TransportError;
use crate::request::APPLICATION_JSON;

/// Body fields recognized as an API error code, in lookup order.
pub const ERROR_CODE_FIELDS: [&str; 2] = ["code", "error_code"];

/// Errors produced by the transport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The delegate failed and the failure carried no recognizable API
    /// error. This is the delegate's error, unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with a JSON error body.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("request url is empty")]
    EmptyUrl,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Only `http` and `https` targets are sent.
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    #[error("unsupported http method: {0}")]
    UnsupportedMethod(Method),

    /// Request body could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid user agent: {0}")]
    InvalidUserAgent(#[from] InvalidHeaderValue),

    /// Built without the `client` feature and no delegate was supplied.
    #[error("no http client configured")]
    MissingHttpClient,
}

impl Error {
    /// The structured API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// A failed request whose response carried a JSON error payload.
#[derive(Debug, thiserror::Error)]
#[error("api error (status {status}): {payload}")]
pub struct ApiError {
    pub status: StatusCode,
    pub payload: ApiErrorPayload,
    /// The delegate failure this error was built from.
    #[source]
    pub source: TransportError,
}

/// The parsed JSON error body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorPayload {
    /// The error code field. Non-string values are kept in their JSON form,
    /// e.g. `4012`, `null` or `{"id":7}`.
    pub code: String,
    pub message: Option<String>,
    pub data: Option<Value>,
    /// The whole body object, including fields not lifted above.
    pub raw: Map<String, Value>,
}

impl ApiErrorPayload {
    /// Parse an error body.
    ///
    /// Returns `None` unless the body is a JSON object holding one of
    /// [`ERROR_CODE_FIELDS`]. The field counts whatever its value is.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let Value::Object(raw) = serde_json::from_slice::<Value>(body).ok()? else {
            return None;
        };

        let code = match ERROR_CODE_FIELDS.iter().find_map(|field| raw.get(*field))? {
            Value::String(code) => code.clone(),
            other => other.to_string(),
        };

        Some(Self {
            code,
            message: raw
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            data: raw.get("data").cloned(),
            raw,
        })
    }
}

impl fmt::Display for ApiErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => f.write_str(&self.code),
        }
    }
}

/// Decide whether a delegate failure is an API error.
///
/// Only failures with a response whose `Content-Type` is exactly
/// `application/json` and whose body carries an error code are wrapped;
/// everything else is returned as [`Error::Transport`] untouched.
pub fn classify(err: TransportError) -> Error {
    let Some(response) = err.response() else {
        return Error::Transport(err);
    };
    if response.content_type() != Some(APPLICATION_JSON) {
        return Error::Transport(err);
    }

    let status = response.status;
    match ApiErrorPayload::from_body(&response.body) {
        Some(payload) => {
            tracing::debug!(%status, code = %payload.code, "api error response");
            Error::Api(ApiError {
                status,
                payload,
                source: err,
            })
        }
        None => Error::Transport(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::HttpResponse;
    use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

    fn status_error(content_type: Option<&'static str>, body: &'static str) -> TransportError {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        TransportError::Status(Box::new(HttpResponse::new(
            StatusCode::BAD_REQUEST,
            headers,
            body,
        )))
    }

    #[test]
    fn test_json_error_with_code_is_wrapped() {
        let err = status_error(
            Some("application/json"),
            r#"{"code":"invalid_param","message":"Invalid parameter(s): status","data":{"status":400}}"#,
        );

        let Error::Api(api) = classify(err) else {
            panic!("expected api error");
        };
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.payload.code, "invalid_param");
        assert_eq!(
            api.payload.message.as_deref(),
            Some("Invalid parameter(s): status")
        );
        assert_eq!(api.payload.data, Some(serde_json::json!({ "status": 400 })));
        assert!(matches!(api.source, TransportError::Status(_)));
        assert_eq!(
            api.to_string(),
            "api error (status 400 Bad Request): invalid_param: Invalid parameter(s): status"
        );
    }

    #[test]
    fn test_error_code_fallback_field_and_numeric_code() {
        let err = status_error(Some("application/json"), r#"{"error_code":4012}"#);
        let api = classify(err);
        assert_eq!(api.as_api().unwrap().payload.code, "4012");
    }

    #[test]
    fn test_any_code_value_counts() {
        for (body, code) in [
            (r#"{"code":null}"#, "null"),
            (r#"{"code":false}"#, "false"),
            (r#"{"code":{"id":7}}"#, r#"{"id":7}"#),
            (r#"{"code":["a"]}"#, r#"["a"]"#),
            (r#"{"error_code":null,"message":"gone"}"#, "null"),
        ] {
            let err = status_error(Some("application/json"), body);
            let Error::Api(api) = classify(err) else {
                panic!("expected api error for {body:?}");
            };
            assert_eq!(api.payload.code, code);
        }
    }

    #[test]
    fn test_code_field_wins_over_error_code() {
        let payload = ApiErrorPayload::from_body(br#"{"code":null,"error_code":"x"}"#).unwrap();
        assert_eq!(payload.code, "null");
    }

    #[test]
    fn test_no_response_is_passed_through() {
        let err = TransportError::Other("connection refused".into());
        let classified = classify(err);
        assert!(matches!(
            classified,
            Error::Transport(TransportError::Other(_))
        ));
        assert_eq!(classified.to_string(), "connection refused");
    }

    #[test]
    fn test_non_json_content_type_is_passed_through() {
        for content_type in [
            None,
            Some("text/html"),
            Some("application/json; charset=UTF-8"),
        ] {
            let err = status_error(content_type, r#"{"code":"invalid_param"}"#);
            assert!(matches!(classify(err), Error::Transport(_)));
        }
    }

    #[test]
    fn test_json_without_code_is_passed_through() {
        for body in [
            r#"{"message":"nope"}"#,
            r#"{"Code":"x"}"#,
            r#"["code"]"#,
            "not json",
            "",
        ] {
            let err = status_error(Some("application/json"), body);
            let Error::Transport(inner) = classify(err) else {
                panic!("expected transport error for {body:?}");
            };
            assert_eq!(inner.response().unwrap().text(), body);
        }
    }

    #[test]
    fn test_payload_keeps_raw_fields() {
        let payload =
            ApiErrorPayload::from_body(br#"{"code":"x","request_id":"abc"}"#).unwrap();
        assert_eq!(payload.raw["request_id"], "abc");
        assert_eq!(payload.to_string(), "x");
    }
}
