//! Authenticated client for the short-link admin API.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shortlink_client::{ShortLinkClient, TracingNavigator, TracingNotifier};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = shortlink_common::config::load(None)?;
//!     let client = ShortLinkClient::new(&config, Arc::new(TracingNotifier), Arc::new(TracingNavigator))?;
//!
//!     client.login("alice", "secret").await?;
//!     for group in client.groups().list().await? {
//!         println!("{} ({} links)", group.name, group.short_link_count);
//!     }
//!
//!     // Notifies the backend, clears the stored session, redirects once.
//!     client.logout().await;
//!     Ok(())
//! }
//! ```
//!
//! Every call goes through one middleware chain (see [`middleware`]): the
//! session's `token` and `username` headers are attached, `{code, message,
//! data}` envelopes are unwrapped, and a 401 ends the session.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod middleware;
pub mod notify;
pub mod session;
pub mod storage;

pub use client::ShortLinkClient;
pub use error::{ClientError, Result};
pub use http::{Call, HttpClient, HttpClientBuilder};
pub use notify::{Navigator, Notice, NoticeLevel, Notifier, TracingNavigator, TracingNotifier};
pub use session::{Credentials, Expiry, Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use tokio_util::sync::CancellationToken;
