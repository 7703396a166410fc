//! Request pipeline: an explicit, ordered middleware chain.
//!
//! Each [`Middleware`] sees the outgoing [`Request`] and the [`Reply`] coming
//! back from the rest of the chain. The innermost step is the transport, which
//! reads the whole body so later stages can inspect it without re-fetching.
//!
//! Standard order, outermost first:
//! [`RequestLog`] → [`AuthHeaders`] → [`TransportErrors`] → [`SessionGuard`] → [`EnvelopeUnwrap`].

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shortlink_common::Envelope;

use crate::error::{ClientError, Result};
use crate::notify::{Notice, Notifier};
use crate::session::SessionStore;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "token";
/// Header carrying the session username.
pub const USERNAME_HEADER: &str = "username";

pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please try again later";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Unexpected response from server";

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    async fn read(resp: reqwest::Response) -> Result<Self> {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        Ok(Self { status, headers, body })
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The `message` field of a JSON body, when present and non-blank.
    pub fn message(&self) -> Option<String> {
        let body: Value = serde_json::from_slice(&self.body).ok()?;
        body.get("message")?
            .as_str()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
    }
}

/// Per-call options visible to every middleware.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallContext {
    /// Fire-and-forget call: no notices, and a 401 does not expire the session.
    pub silent: bool,
}

#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, req: Request, ctx: &CallContext, next: Next<'_>) -> Result<Reply>;
}

/// The remainder of the chain after the current middleware.
pub struct Next<'a> {
    client: &'a Client,
    chain: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(client: &'a Client, chain: &'a [Arc<dyn Middleware>]) -> Self {
        Self { client, chain }
    }

    pub async fn run(self, req: Request, ctx: &CallContext) -> Result<Reply> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                head.handle(req, ctx, Next { client: self.client, chain: rest }).await
            }
            None => {
                let resp = self.client.execute(req).await?;
                Reply::read(resp).await
            }
        }
    }
}

// ── Logging ──────────────────────────────────────────────────────────────────

/// Debug-level record of each call: method, path, status, elapsed time.
/// Query strings and headers are never logged; both may carry credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLog;

#[async_trait]
impl Middleware for RequestLog {
    async fn handle(&self, req: Request, ctx: &CallContext, next: Next<'_>) -> Result<Reply> {
        let method = req.method().clone();
        let path = req.url().path().to_owned();
        let started = Instant::now();

        let result = next.run(req, ctx).await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(reply) => tracing::debug!(
                %method, %path, status = reply.status.as_u16(), elapsed_ms, "request completed"
            ),
            Err(e) => tracing::debug!(%method, %path, elapsed_ms, error = %e, "request failed"),
        }
        result
    }
}

// ── Credentials ──────────────────────────────────────────────────────────────

/// Attaches `token` and `username` headers while the session is authenticated.
/// Unauthenticated calls go out unchanged; the backend decides.
pub struct AuthHeaders {
    session: Arc<SessionStore>,
}

impl AuthHeaders {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

fn sensitive(value: &str) -> Result<HeaderValue> {
    let mut v = HeaderValue::from_bytes(value.as_bytes())?;
    v.set_sensitive(true);
    Ok(v)
}

#[async_trait]
impl Middleware for AuthHeaders {
    async fn handle(&self, mut req: Request, ctx: &CallContext, next: Next<'_>) -> Result<Reply> {
        if let Some(creds) = self.session.credentials() {
            let headers = req.headers_mut();
            headers.insert(HeaderName::from_static(TOKEN_HEADER), sensitive(&creds.token)?);
            headers.insert(HeaderName::from_static(USERNAME_HEADER), sensitive(&creds.username)?);
        }
        next.run(req, ctx).await
    }
}

// ── Failures ─────────────────────────────────────────────────────────────────

/// Network failures and non-2xx statuses become rejected calls plus an error notice.
pub struct TransportErrors {
    notifier: Arc<dyn Notifier>,
}

impl TransportErrors {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Middleware for TransportErrors {
    async fn handle(&self, req: Request, ctx: &CallContext, next: Next<'_>) -> Result<Reply> {
        match next.run(req, ctx).await {
            Ok(reply) if reply.status.is_success() => Ok(reply),
            Ok(reply) => {
                let message = reply.message().unwrap_or_else(|| REQUEST_FAILED_MESSAGE.to_owned());
                if !ctx.silent {
                    self.notifier.notify(Notice::error(message.clone()));
                }
                Err(ClientError::Api { status: reply.status.as_u16(), message })
            }
            Err(ClientError::Http(e)) => {
                if !ctx.silent {
                    self.notifier.notify(Notice::error(NETWORK_ERROR_MESSAGE));
                }
                Err(ClientError::Http(e))
            }
            Err(other) => Err(other),
        }
    }
}

/// A 401 ends the session that made the call: local state is cleared, the user
/// is warned and sent to login, and the call is rejected. Replies to
/// credentials already cleared or replaced by a newer login only reject.
/// See [`SessionStore::expire_if`].
pub struct SessionGuard {
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl SessionGuard {
    pub fn new(session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { session, notifier }
    }
}

#[async_trait]
impl Middleware for SessionGuard {
    async fn handle(&self, req: Request, ctx: &CallContext, next: Next<'_>) -> Result<Reply> {
        // Credentials are attached further out, so the header is already final.
        let sent_token = req
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let reply = next.run(req, ctx).await?;
        if reply.status != StatusCode::UNAUTHORIZED {
            return Ok(reply);
        }

        let message = reply.message().unwrap_or_else(|| "Unauthorized".to_owned());
        if !ctx.silent && self.session.expire_if(sent_token.as_deref()).needs_notice() {
            self.notifier.notify(Notice::warning(SESSION_EXPIRED_MESSAGE));
        }
        Err(ClientError::Unauthorized { message })
    }
}

// ── Envelope ─────────────────────────────────────────────────────────────────

/// Unwraps `{code, message, data}` on 2xx replies: success leaves only `data`
/// in the body, anything else is rejected as a domain error.
pub struct EnvelopeUnwrap {
    notifier: Arc<dyn Notifier>,
    success_codes: Vec<String>,
}

impl EnvelopeUnwrap {
    pub fn new(notifier: Arc<dyn Notifier>, success_codes: Vec<String>) -> Self {
        Self { notifier, success_codes }
    }
}

#[async_trait]
impl Middleware for EnvelopeUnwrap {
    async fn handle(&self, req: Request, ctx: &CallContext, next: Next<'_>) -> Result<Reply> {
        let mut reply = next.run(req, ctx).await?;
        if !reply.status.is_success() {
            return Ok(reply);
        }

        let envelope: Envelope = match serde_json::from_slice(&reply.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                if !ctx.silent {
                    self.notifier.notify(Notice::error(MALFORMED_RESPONSE_MESSAGE));
                }
                return Err(ClientError::Json(e));
            }
        };

        match envelope.into_result(&self.success_codes) {
            Ok(data) => {
                reply.body = serde_json::to_vec(&data)?;
                Ok(reply)
            }
            Err(failure) => {
                if !ctx.silent {
                    self.notifier.notify(Notice::error(failure.message.clone()));
                }
                Err(failure.into())
            }
        }
    }
}
