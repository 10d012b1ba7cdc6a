//! Client layer: authentication, transport plumbing, and request execution.

mod history;
mod id;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::{Blacklists, Campaigns, Contacts, Emails, Groups, Pushes, Sms};
use crate::domain::{
    DeserializationError, Envelope, Method, RequestDescriptor, ValidationError, build_uri,
};

pub use history::{HistoryEntry, RequestHistory};
pub use id::{ExternalIdGenerator, RandomExternalIdGenerator};

const DEFAULT_BASE_URL: &str = "https://api.redlink.pl";
const USER_AGENT: &str = concat!("redlink-rust-api-client/", env!("CARGO_PKG_VERSION"));

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
/// Raw response handed back by the transport: HTTP status plus body text.
///
/// Resource methods return it unchanged; turning it into an [`Envelope`] is
/// the caller's decision, via [`ApiResponse::envelope`].
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    /// Deserialize the body as a Redlink response envelope.
    pub fn envelope(&self) -> Result<Envelope, DeserializationError> {
        Envelope::from_json(&self.body)
    }
}

/// The external collaborator performing actual HTTP I/O.
///
/// The core builds a [`RequestDescriptor`] per call and hands it over; the
/// transport owns connection handling, TLS, timeouts, and retries (the core
/// performs none of those).
pub trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, Result<ApiResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, Result<ApiResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Patch => reqwest::Method::PATCH,
                Method::Delete => reqwest::Method::DELETE,
                Method::Options => reqwest::Method::OPTIONS,
            };

            let mut builder = self.client.request(method, &request.uri);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(ApiResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Redlink credentials.
///
/// The API key is mandatory. Accounts on API v2 additionally hold an
/// application key; when one is set, both `Authorization` and
/// `Application-Key` headers are sent.
pub struct Auth {
    api_key: String,
    application_key: Option<String>,
}

impl Auth {
    /// Create credentials from an API key. The key must be non-empty after
    /// trimming.
    pub fn api_key(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "apiKey" });
        }
        Ok(Self {
            api_key: trimmed.to_owned(),
            application_key: None,
        })
    }

    /// Attach the secondary application key.
    pub fn with_application_key(mut self, value: impl Into<String>) -> Self {
        self.application_key = Some(value.into());
        self
    }

    fn push_headers(&self, headers: &mut Vec<(String, String)>) {
        headers.push(("Authorization".to_owned(), self.api_key.clone()));

        if let Some(key) = &self.application_key {
            // Upstream only accepts purely alphanumeric application keys;
            // anything else is silently dropped rather than rejected. Kept
            // as observed.
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric()) {
                headers.push(("Application-Key".to_owned(), key.clone()));
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`RedlinkClient`].
pub enum RedlinkError {
    /// A payload or argument failed client-side validation; no request was
    /// made.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request body could not be serialized to JSON; no request was
    /// made.
    #[error("request body encoding failed: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The response body could not be deserialized into an envelope.
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    /// Failure at the transport boundary (network, TLS, timeout),
    /// propagated unchanged.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Clone)]
/// Builder for [`RedlinkClient`].
pub struct RedlinkClientBuilder {
    auth: Auth,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
    transport: Option<Arc<dyn HttpTransport>>,
    external_id_generator: Arc<dyn ExternalIdGenerator>,
    history_capacity: Option<usize>,
}

impl RedlinkClientBuilder {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: USER_AGENT.to_owned(),
            transport: None,
            external_id_generator: Arc::new(RandomExternalIdGenerator),
            history_capacity: None,
        }
    }

    /// Override the base URL (a trailing slash is trimmed).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Set an HTTP client timeout applied to the entire request. Only used
    /// by the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Inject a custom transport instead of the built-in `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Inject the generator used when creating resources without an
    /// explicit external id.
    pub fn external_id_generator(mut self, generator: Arc<dyn ExternalIdGenerator>) -> Self {
        self.external_id_generator = generator;
        self
    }

    /// Retain the last `capacity` requests for diagnostics.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<RedlinkClient, RedlinkError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                let client = builder
                    .build()
                    .map_err(|err| RedlinkError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(RedlinkClient {
            auth: self.auth,
            base_url: self.base_url,
            user_agent: self.user_agent,
            http: transport,
            external_id_generator: self.external_id_generator,
            history: self.history_capacity.map(|n| Arc::new(RequestHistory::new(n))),
        })
    }
}

#[derive(Clone)]
/// High-level Redlink client.
///
/// Resource families hang off accessor methods ([`RedlinkClient::contacts`],
/// [`RedlinkClient::groups`], ...); every resource method validates its
/// arguments locally, builds one request, executes it through the injected
/// transport, and returns the raw [`ApiResponse`].
pub struct RedlinkClient {
    auth: Auth,
    base_url: String,
    user_agent: String,
    http: Arc<dyn HttpTransport>,
    external_id_generator: Arc<dyn ExternalIdGenerator>,
    history: Option<Arc<RequestHistory>>,
}

impl RedlinkClient {
    /// Create a client with the default base URL and transport.
    pub fn new(auth: Auth) -> Result<Self, RedlinkError> {
        Self::builder(auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> RedlinkClientBuilder {
        RedlinkClientBuilder::new(auth)
    }

    /// Diagnostic request history, when enabled via
    /// [`RedlinkClientBuilder::history_capacity`].
    pub fn history(&self) -> Option<&RequestHistory> {
        self.history.as_deref()
    }

    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    pub fn emails(&self) -> Emails<'_> {
        Emails::new(self)
    }

    pub fn sms(&self) -> Sms<'_> {
        Sms::new(self)
    }

    pub fn pushes(&self) -> Pushes<'_> {
        Pushes::new(self)
    }

    pub fn blacklists(&self) -> Blacklists<'_> {
        Blacklists::new(self)
    }

    pub(crate) fn external_id_generator(&self) -> &dyn ExternalIdGenerator {
        self.external_id_generator.as_ref()
    }

    /// Shared request-execution helper behind every resource method and
    /// verb.
    pub(crate) async fn request(
        &self,
        method: Method,
        template: &str,
        path_params: &[(&str, String)],
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<ApiResponse, RedlinkError> {
        let uri = format!(
            "{}{}",
            self.base_url,
            build_uri(template, path_params, query)
        );

        let mut headers = vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("User-Agent".to_owned(), self.user_agent.clone()),
        ];
        self.auth.push_headers(&mut headers);

        let body = body
            .map(|value| serde_json::to_string(&value))
            .transpose()
            .map_err(RedlinkError::Encoding)?;

        let descriptor = RequestDescriptor {
            method,
            uri,
            headers,
            body,
        };

        tracing::debug!(
            method = %descriptor.method,
            uri = %descriptor.uri,
            "executing Redlink request"
        );

        let result = self.http.execute(&descriptor).await;

        if let Some(history) = &self.history {
            history.record(HistoryEntry {
                method,
                uri: descriptor.uri.clone(),
                status: result.as_ref().ok().map(ApiResponse::status),
            });
        }

        result.map_err(RedlinkError::Transport)
    }
}
