//! `ShortLinkClient`: one HTTP client and one session, wired together.

use std::sync::Arc;

use shortlink_common::config::{AppConfig, LocationConfig};
use shortlink_common::models::{UserInfoResp, UserLoginReq, UserUpdateReq};
use shortlink_common::ViewMode;

use crate::api::{GeoClient, GroupApi, LinkApi, LocationApi, RecycleBinApi, StatsApi, UserApi};
use crate::error::Result;
use crate::http::HttpClient;
use crate::notify::{Navigator, Notifier};
use crate::session::{Session, SessionStore};
use crate::storage::{FileStorage, SessionStorage};

/// Entry point for front ends. Owns the session handle and the HTTP client
/// whose chain reads and expires it; clones share both.
#[derive(Clone)]
pub struct ShortLinkClient {
    http: HttpClient,
    session: Arc<SessionStore>,
    location: LocationConfig,
}

impl ShortLinkClient {
    /// Client persisting its session to `config.session.storage_path`.
    pub fn new(
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let storage = FileStorage::new(&config.session.storage_path);
        Self::with_storage(config, storage, notifier, navigator)
    }

    pub fn with_storage(
        config: &AppConfig,
        storage: impl SessionStorage + 'static,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let session = SessionStore::open(storage, navigator);
        let http = HttpClient::new(&config.api, Arc::clone(&session), notifier)?;
        Ok(Self { http, session, location: config.location.clone() })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(&self.http)
    }

    pub fn groups(&self) -> GroupApi<'_> {
        GroupApi::new(&self.http)
    }

    pub fn links(&self) -> LinkApi<'_> {
        LinkApi::new(&self.http)
    }

    pub fn recycle_bin(&self) -> RecycleBinApi<'_> {
        RecycleBinApi::new(&self.http)
    }

    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(&self.http)
    }

    pub fn location(&self) -> LocationApi<'_> {
        LocationApi::new(&self.http, &self.location)
    }

    /// Provider-direct geolocation, outside the authenticated chain.
    pub fn geo(&self) -> Result<GeoClient> {
        GeoClient::new(&self.location)
    }

    // ── Session ──────────────────────────────────────────────────────────────

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let req = UserLoginReq { username: username.to_owned(), password: password.to_owned() };
        self.session.login(&self.http, &req).await
    }

    pub async fn logout(&self) {
        self.session.logout(&self.http).await;
    }

    pub async fn check_session(&self) -> bool {
        self.session.check_session(&self.http).await
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> Result<()> {
        self.session.set_view_mode(mode)
    }

    pub async fn update_profile(&self, req: &UserUpdateReq) -> Result<()> {
        self.session.update_profile(&self.http, req).await
    }

    pub async fn refresh_profile(&self) -> Result<UserInfoResp> {
        self.session.refresh_profile(&self.http).await
    }
}
