//! Shared HTTP client for the admin API.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shortlink_client::{HttpClient, MemoryStorage, SessionStore, TracingNavigator, TracingNotifier};
//! use shortlink_common::config::ApiConfig;
//!
//! # async fn run() -> shortlink_client::Result<()> {
//! let session = SessionStore::open(MemoryStorage::new(), Arc::new(TracingNavigator));
//! let http = HttpClient::new(&ApiConfig::default(), session, Arc::new(TracingNotifier))?;
//! let groups: serde_json::Value = http.get("/api/short-link/admin/v1/group", &[("page", "1")]).await?;
//! println!("{groups}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shortlink_common::config::ApiConfig;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};
use crate::middleware::{
    AuthHeaders, CallContext, EnvelopeUnwrap, Middleware, Next, Reply, RequestLog, SessionGuard,
    TransportErrors,
};
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Cheap to clone; clones share the connection pool and the chain.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    chain: Arc<[Arc<dyn Middleware>]>,
}

impl HttpClient {
    /// Client with the standard chain: logging, auth headers, error notices,
    /// 401 handling and envelope unwrapping.
    pub fn new(
        config: &ApiConfig,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        Self::builder(config).standard_chain(session, notifier, &config.success_codes).build()
    }

    /// Builder with base URL and timeout from `config` and an empty chain.
    pub fn builder(config: &ApiConfig) -> HttpClientBuilder {
        HttpClientBuilder::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a call. `path` is appended to the base URL verbatim.
    pub fn request(&self, method: Method, path: &str) -> Call<'_> {
        let url = format!("{}{}", self.base_url, path);
        Call {
            http: self,
            builder: self.client.request(method, url),
            ctx: CallContext::default(),
            cancel: None,
        }
    }

    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, path).query(query).send().await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path).json(body).send().await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path).json(body).send().await
    }

    pub async fn delete<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::DELETE, path).query(query).send().await
    }
}

/// One pending call. Nothing is sent until [`Call::send`].
pub struct Call<'a> {
    http: &'a HttpClient,
    builder: RequestBuilder,
    ctx: CallContext,
    cancel: Option<CancellationToken>,
}

impl Call<'_> {
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Self {
        self.builder = self.builder.query(query);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.json(body);
        self
    }

    /// Override the client-wide timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Fire-and-forget: suppress notices and 401 session expiry for this call.
    pub fn silent(mut self) -> Self {
        self.ctx.silent = true;
        self
    }

    /// Reject with [`ClientError::Cancelled`] as soon as `token` fires.
    pub fn cancel_on(mut self, token: &CancellationToken) -> Self {
        self.cancel = Some(token.clone());
        self
    }

    pub async fn send<T: DeserializeOwned>(self) -> Result<T> {
        self.dispatch().await?.json()
    }

    /// Run the chain and return the raw reply.
    pub async fn dispatch(self) -> Result<Reply> {
        let Call { http, builder, ctx, cancel } = self;
        let req = builder.build()?;
        let next = Next::new(&http.client, &http.chain);

        match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => Err(ClientError::Cancelled),
                reply = next.run(req, &ctx) => reply,
            },
            None => next.run(req, &ctx).await,
        }
    }
}

pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    chain: Vec<Arc<dyn Middleware>>,
}

impl HttpClientBuilder {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
            chain: Vec::new(),
        }
    }

    /// Append a middleware; earlier ones wrap later ones.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.chain.push(Arc::new(middleware));
        self
    }

    pub fn standard_chain(
        self,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        success_codes: &[String],
    ) -> Self {
        self.with(RequestLog)
            .with(AuthHeaders::new(Arc::clone(&session)))
            .with(TransportErrors::new(Arc::clone(&notifier)))
            .with(SessionGuard::new(session, Arc::clone(&notifier)))
            .with(EnvelopeUnwrap::new(notifier, success_codes.to_vec()))
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=utf-8"),
        );
        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(HttpClient {
            client,
            base_url: self.base_url,
            chain: self.chain.into(),
        })
    }
}
