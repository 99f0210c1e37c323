//! The authenticated request adapter.

use std::fmt;
use std::sync::Arc;

use http::Method;
use http::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::BasicAuth;
use crate::client::HttpClient;
#[cfg(feature = "client")]
use crate::client::ReqwestClient;
use crate::error::{Error, classify};
use crate::request::{HttpRequest, RequestOptions};
use crate::response::HttpResponse;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("mercato-sdk/", env!("CARGO_PKG_VERSION"));

/// URL schemes the transport sends to.
const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Methods the transport accepts.
const STANDARD_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// Hosted Mercato API deployments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    /// Default API root for this deployment.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Environment::Production => "https://api.mercato.io/",
            Environment::Sandbox => "https://sandbox.api.mercato.io/",
        }
    }
}

/// Authenticating transport for the Mercato API.
///
/// Every request goes out with the consumer key / secret as Basic Auth and
/// the configured `User-Agent`, both overriding anything the caller put in
/// [`RequestOptions::headers`]. Relative targets are resolved against the
/// base URL.
///
/// Cloning is cheap; the delegate client is shared.
#[derive(Clone)]
pub struct Transport {
    client: Arc<dyn HttpClient>,
    base_url: Url,
    auth: BasicAuth,
    user_agent: String,
    user_agent_header: HeaderValue,
}

impl Transport {
    /// Production endpoint, default user agent, `reqwest` delegate.
    #[cfg(feature = "client")]
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::builder(consumer_key, consumer_secret).build()
    }

    pub fn builder(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> TransportBuilder {
        TransportBuilder {
            auth: BasicAuth::new(consumer_key, consumer_secret),
            user_agent: None,
            environment: Environment::default(),
            base_url: None,
            client: None,
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.auth.username
    }

    pub fn consumer_secret(&self) -> &str {
        &self.auth.password
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send an authenticated request.
    ///
    /// Delegate failures come back as [`Error::Transport`] unless the
    /// response is an `application/json` error body with an error code, in
    /// which case they become [`Error::Api`].
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, Error> {
        if !STANDARD_METHODS.contains(&method) {
            return Err(Error::UnsupportedMethod(method));
        }
        let url = self.resolve(url)?;

        tracing::debug!(%method, %url, "sending request");
        let request = HttpRequest::assemble(
            method,
            url,
            options,
            self.auth.clone(),
            &self.user_agent_header,
        )?;

        match self.client.execute(request).await {
            Ok(response) => {
                tracing::debug!(status = %response.status, "request succeeded");
                Ok(response)
            }
            Err(err) => Err(classify(err)),
        }
    }

    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.request(Method::GET, url, options).await
    }

    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.request(Method::POST, url, options).await
    }

    pub async fn put(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.request(Method::PUT, url, options).await
    }

    pub async fn patch(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.request(Method::PATCH, url, options).await
    }

    pub async fn delete(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, Error> {
        self.request(Method::DELETE, url, options).await
    }

    fn resolve(&self, target: &str) -> Result<Url, Error> {
        let target = target.trim();
        if target.is_empty() {
            return Err(Error::EmptyUrl);
        }
        let url = match Url::parse(target) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base_url.join(target)?,
            Err(e) => return Err(e.into()),
        };
        check_scheme(&url)?;
        Ok(url)
    }
}

fn check_scheme(url: &Url) -> Result<(), Error> {
    if SUPPORTED_SCHEMES.contains(&url.scheme()) {
        Ok(())
    } else {
        Err(Error::UnsupportedScheme(url.scheme().to_owned()))
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Transport`].
pub struct TransportBuilder {
    auth: BasicAuth,
    user_agent: Option<String>,
    environment: Environment,
    base_url: Option<Url>,
    client: Option<Arc<dyn HttpClient>>,
}

impl TransportBuilder {
    /// Override [`DEFAULT_USER_AGENT`].
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Select a hosted deployment. Ignored when [`base_url`](Self::base_url)
    /// is set.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Use a custom API root (self-hosted, proxy, mock server).
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Replace the default `reqwest` delegate. Required when the `client`
    /// feature is disabled.
    pub fn http_client(mut self, client: impl HttpClient + 'static) -> Self {
        self.client = Some(Arc::new(client));
        self
    }

    pub fn build(self) -> Result<Transport, Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());
        let user_agent_header = HeaderValue::from_str(&user_agent)?;

        let mut base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(self.environment.endpoint())?,
        };
        check_scheme(&base_url)?;
        // `Url::join` drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client: Arc<dyn HttpClient> = match self.client {
            Some(client) => client,
            #[cfg(feature = "client")]
            None => Arc::new(ReqwestClient::new()),
            #[cfg(not(feature = "client"))]
            None => return Err(Error::MissingHttpClient),
        };

        Ok(Transport {
            client,
            base_url,
            auth: self.auth,
            user_agent,
            user_agent_header,
        })
    }
}
