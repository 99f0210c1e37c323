//! Authenticated HTTP transport for the Mercato commerce REST API.
//!
//! [`Transport`] signs every outgoing request with HTTP Basic Auth
//! (consumer key / consumer secret), stamps a fixed `User-Agent`, hands the
//! request to a pluggable [`HttpClient`] and turns JSON error bodies into
//! [`ApiError`]s.
//!
//! The default delegate, [`ReqwestClient`], is behind the `client` feature
//! (enabled by default). Without it, pass your own client through
//! [`TransportBuilder::http_client`].
//!
//! ```ignore
//! use mercato_sdk::{Environment, RequestOptions, Transport};
//!
//! let transport = Transport::builder("ck_live", "cs_live")
//!     .environment(Environment::Sandbox)
//!     .build()?;
//! let response = transport.get("v3/orders", RequestOptions::new()).await?;
//! let orders: Vec<serde_json::Value> = response.json()?;
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::BasicAuth;
pub use client::{HttpClient, TransportError};
#[cfg(feature = "client")]
pub use client::ReqwestClient;
pub use error::{ApiError, ApiErrorPayload, Error};
pub use request::{Body, HttpRequest, RequestOptions, Serialization};
pub use response::HttpResponse;
pub use transport::{DEFAULT_USER_AGENT, Environment, Transport, TransportBuilder};

pub use http::Method;
