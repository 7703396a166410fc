//! Session store: the client-held credential and profile state.
//!
//! A session is authenticated exactly when both `token` and `username` are
//! non-empty. That is computed, never stored, so it cannot drift. A record
//! with only one of the two, or a realname without credentials, is treated
//! as corrupt and forces a logout.
//!
//! Every mutation goes through [`SessionStore`]: persisted first, then
//! published in memory under one lock, so nobody observes a half-applied change.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use shortlink_common::models::{UserInfoResp, UserLoginReq, UserUpdateReq};
use shortlink_common::ViewMode;

use crate::api::UserApi;
use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::notify::Navigator;
use crate::storage::SessionStorage;

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub realname: String,
    pub view_mode: ViewMode,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty() && !self.username.is_empty()
    }

    /// Both credentials present or both absent, and no profile without them.
    pub fn is_consistent(&self) -> bool {
        self.token.is_empty() == self.username.is_empty()
            && (self.is_authenticated() || self.realname.is_empty())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("username", &self.username)
            .field("realname", &self.realname)
            .field("view_mode", &self.view_mode)
            .finish()
    }
}

/// The pair the backend needs to identify a session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// What a 401 did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The session that made the call was cleared; the user was sent to login.
    Cleared,
    /// Nobody was signed in; the user was sent to login.
    SignedOut,
    /// The call's credentials were already cleared or replaced. Nothing changed.
    Stale,
}

impl Expiry {
    /// Whether the user has to be told their session is over.
    pub fn needs_notice(self) -> bool {
        !matches!(self, Self::Stale)
    }
}

pub struct SessionStore {
    state: Mutex<Session>,
    storage: Box<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    /// Rehydrate from `storage`. Unreadable or inconsistent records are
    /// discarded and the store starts signed out.
    pub fn open(storage: impl SessionStorage + 'static, navigator: Arc<dyn Navigator>) -> Arc<Self> {
        let session = match storage.load() {
            Ok(Some(stored)) if stored.is_consistent() => stored,
            Ok(Some(_)) => {
                tracing::warn!("Discarding inconsistent stored session");
                discard(&storage);
                Session::default()
            }
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored session unreadable; starting signed out");
                discard(&storage);
                Session::default()
            }
        };

        Arc::new(Self {
            state: Mutex::new(session),
            storage: Box::new(storage),
            navigator,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Token and username, only while authenticated.
    pub fn credentials(&self) -> Option<Credentials> {
        let state = self.lock();
        state.is_authenticated().then(|| Credentials {
            token: state.token.clone(),
            username: state.username.clone(),
        })
    }

    pub fn view_mode(&self) -> ViewMode {
        self.lock().view_mode
    }

    /// Switch between normal and recycle-bin listing. Local only.
    pub fn set_view_mode(&self, mode: ViewMode) -> Result<()> {
        self.commit(|s| s.view_mode = mode)?;
        tracing::debug!(%mode, "View mode changed");
        Ok(())
    }

    /// Replace the profile name of the signed-in user.
    pub fn set_realname(&self, realname: impl Into<String>) -> Result<()> {
        let realname = realname.into();
        self.commit(|s| s.realname = realname).map(drop)
    }

    /// Adopt freshly issued credentials; the view mode is kept.
    fn establish(&self, token: String, username: String, realname: String) -> Result<Session> {
        if token.is_empty() || username.is_empty() {
            self.expire();
            return Err(ClientError::InvalidSession(
                "login response is missing token or username".into(),
            ));
        }
        self.commit(|s| {
            s.token = token;
            s.username = username;
            s.realname = realname;
        })
    }

    /// Apply `change` to a copy, persist it, then publish it. A storage
    /// failure leaves the current state untouched; an inconsistent result
    /// forces logout instead.
    fn commit(&self, change: impl FnOnce(&mut Session)) -> Result<Session> {
        let mut state = self.lock();
        let mut next = state.clone();
        change(&mut next);

        if !next.is_consistent() {
            drop(state);
            self.expire();
            return Err(ClientError::InvalidSession(
                "token and username must be set together".into(),
            ));
        }

        self.storage.save(&next)?;
        *state = next.clone();
        Ok(next)
    }

    /// Clear memory and storage. Returns whether an authenticated session was dropped.
    fn reset(&self) -> bool {
        let mut state = self.lock();
        self.clear_locked(&mut state)
    }

    fn clear_locked(&self, state: &mut Session) -> bool {
        let was_authenticated = state.is_authenticated();
        *state = Session::default();
        discard(self.storage.as_ref());
        was_authenticated
    }

    /// Local forced logout, used when the backend rejects the credentials.
    ///
    /// Redirects to login only if an authenticated session was actually
    /// cleared, so several calls failing together send the user there once.
    pub fn expire(&self) -> bool {
        let cleared = self.reset();
        if cleared {
            tracing::info!("Session expired");
            self.navigator.to_login();
        }
        cleared
    }

    /// Handle a 401 for a call that carried `sent_token` (`None` when it went
    /// out unauthenticated). The session is cleared only if it still holds
    /// that token; a reply to credentials that have since been replaced or
    /// already cleared changes nothing.
    pub fn expire_if(&self, sent_token: Option<&str>) -> Expiry {
        let outcome = {
            let mut state = self.lock();
            match sent_token {
                Some(token) if state.is_authenticated() && state.token == token => {
                    self.clear_locked(&mut state);
                    Expiry::Cleared
                }
                None if !state.is_authenticated() => Expiry::SignedOut,
                _ => Expiry::Stale,
            }
        };

        match outcome {
            Expiry::Cleared => tracing::info!("Session expired"),
            Expiry::SignedOut => tracing::debug!("Unauthorized while signed out"),
            Expiry::Stale => {
                tracing::debug!("Ignoring 401 for credentials no longer in use");
                return outcome;
            }
        }
        self.navigator.to_login();
        outcome
    }

    /// Authenticate against the backend and persist the new session.
    ///
    /// On any failure the previous session is left as it was, except when the
    /// backend answers success without usable credentials, which forces logout.
    pub async fn login(&self, http: &HttpClient, credentials: &UserLoginReq) -> Result<Session> {
        let resp = UserApi::new(http).login(credentials).await?;
        let session = self.establish(resp.token, resp.username, resp.realname)?;
        tracing::info!(username = %session.username, "Logged in");
        Ok(session)
    }

    /// Log out. Always succeeds locally.
    ///
    /// The backend is told first, silently and on a best-effort basis; then
    /// local state and storage are cleared and the user is sent to login.
    pub async fn logout(&self, http: &HttpClient) {
        if let Some(creds) = self.credentials() {
            if let Err(e) = UserApi::new(http).logout(&creds.username, &creds.token).await {
                tracing::debug!(error = %e, "Backend logout notification failed");
            }
        }
        self.reset();
        tracing::info!("Logged out");
        self.navigator.to_login();
    }

    /// Ask the backend whether the current credentials are still valid.
    /// Any doubt ends the session.
    pub async fn check_session(&self, http: &HttpClient) -> bool {
        let Some(creds) = self.credentials() else {
            return false;
        };

        match UserApi::new(http).check_login(&creds.username, &creds.token).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::info!(username = %creds.username, "Backend rejected session");
                self.logout(http).await;
                false
            }
            Err(e) => {
                // A 401 has already expired the session in the pipeline.
                if self.is_authenticated() {
                    tracing::warn!(error = %e, "Session check failed");
                    self.logout(http).await;
                }
                false
            }
        }
    }

    /// Update the profile on the backend; a new real name is mirrored locally.
    pub async fn update_profile(&self, http: &HttpClient, req: &UserUpdateReq) -> Result<()> {
        if !self.is_authenticated() {
            return Err(ClientError::InvalidSession("not logged in".into()));
        }
        UserApi::new(http).update(req).await?;
        if let Some(realname) = req.real_name.as_ref() {
            self.set_realname(realname.clone())?;
        }
        Ok(())
    }

    /// Re-read the signed-in user's profile and refresh the local real name.
    pub async fn refresh_profile(&self, http: &HttpClient) -> Result<UserInfoResp> {
        let creds = self
            .credentials()
            .ok_or_else(|| ClientError::InvalidSession("not logged in".into()))?;
        let info = UserApi::new(http).user_info(&creds.username).await?;
        self.set_realname(info.realname.clone())?;
        Ok(info)
    }
}

fn discard(storage: &dyn SessionStorage) {
    if let Err(e) = storage.clear() {
        tracing::warn!(error = %e, "Failed to clear stored session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNavigator(AtomicUsize);

    impl Navigator for CountingNavigator {
        fn to_login(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct BrokenStorage;

    impl SessionStorage for BrokenStorage {
        fn load(&self) -> io::Result<Option<Session>> {
            Ok(None)
        }
        fn save(&self, _: &Session) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
        fn clear(&self) -> io::Result<()> {
            Ok(())
        }
    }

    fn alice() -> Session {
        Session {
            token: "t1".into(),
            username: "alice".into(),
            realname: "Alice".into(),
            view_mode: ViewMode::Normal,
        }
    }

    fn store_with(session: Option<Session>) -> (Arc<SessionStore>, Arc<CountingNavigator>) {
        let nav = Arc::new(CountingNavigator::default());
        let storage = session.map_or_else(MemoryStorage::new, MemoryStorage::with);
        (SessionStore::open(storage, nav.clone()), nav)
    }

    fn assert_invariant(store: &SessionStore) {
        let s = store.snapshot();
        assert_eq!(s.is_authenticated(), !s.token.is_empty() && !s.username.is_empty());
        assert!(s.is_consistent(), "inconsistent session: {s:?}");
    }

    #[test]
    fn rehydrates_stored_session() {
        let (store, nav) = store_with(Some(alice()));
        assert!(store.is_authenticated());
        assert_eq!(store.snapshot().realname, "Alice");
        assert_eq!(nav.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn inconsistent_stored_session_is_discarded() {
        let half = Session { token: "t1".into(), ..Session::default() };
        let (store, _) = store_with(Some(half));
        assert_eq!(store.snapshot(), Session::default());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn establish_rejects_missing_username_and_forces_logout() {
        let (store, nav) = store_with(Some(alice()));
        let err = store.establish("t2".into(), String::new(), "Bob".into()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidSession(_)));
        assert!(!store.is_authenticated());
        assert_eq!(nav.0.load(Ordering::SeqCst), 1);
        assert_invariant(&store);
    }

    #[test]
    fn invariant_holds_across_mutation_sequences() {
        let (store, _) = store_with(None);
        assert_invariant(&store);

        store.set_view_mode(ViewMode::Recycle).unwrap();
        assert_invariant(&store);

        // realname without credentials is corrupt
        assert!(store.set_realname("Ghost").is_err());
        assert_invariant(&store);

        store.establish("t1".into(), "alice".into(), "Alice".into()).unwrap();
        assert_invariant(&store);
        assert!(store.is_authenticated());

        store.set_realname("Alice L.").unwrap();
        assert_invariant(&store);

        assert!(store.expire());
        assert_invariant(&store);
        assert!(!store.expire());
        assert_invariant(&store);
    }

    #[test]
    fn expire_redirects_only_when_a_session_was_cleared() {
        let (store, nav) = store_with(Some(alice()));
        assert!(store.expire());
        assert!(!store.expire());
        assert_eq!(nav.0.load(Ordering::SeqCst), 1);
        assert_eq!(store.view_mode(), ViewMode::Normal);
    }

    #[test]
    fn expire_if_clears_only_the_session_that_sent_the_token() {
        let (store, nav) = store_with(Some(alice()));

        assert_eq!(store.expire_if(Some("t0")), Expiry::Stale);
        assert!(store.is_authenticated());
        assert_eq!(nav.0.load(Ordering::SeqCst), 0);

        assert_eq!(store.expire_if(Some("t1")), Expiry::Cleared);
        assert!(!store.is_authenticated());
        assert_eq!(store.expire_if(Some("t1")), Expiry::Stale);
        assert_eq!(nav.0.load(Ordering::SeqCst), 1);
        assert_invariant(&store);
    }

    #[test]
    fn expire_if_without_token_redirects_when_signed_out() {
        let (store, nav) = store_with(None);
        assert_eq!(store.expire_if(None), Expiry::SignedOut);
        assert!(Expiry::SignedOut.needs_notice());
        assert_eq!(nav.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expire_if_without_token_keeps_a_later_login() {
        let (store, nav) = store_with(Some(alice()));
        assert_eq!(store.expire_if(None), Expiry::Stale);
        assert!(!Expiry::Stale.needs_notice());
        assert!(store.is_authenticated());
        assert_eq!(nav.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn storage_failure_leaves_state_untouched() {
        let nav = Arc::new(CountingNavigator::default());
        let store = SessionStore::open(BrokenStorage, nav);
        let err = store.establish("t1".into(), "alice".into(), "Alice".into()).unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn view_mode_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let nav: Arc<dyn Navigator> = Arc::new(CountingNavigator::default());

        let store = SessionStore::open(FileStorage::new(&path), Arc::clone(&nav));
        store.set_view_mode(ViewMode::Recycle).unwrap();
        drop(store);

        let reloaded = SessionStore::open(FileStorage::new(&path), nav);
        assert_eq!(reloaded.view_mode(), ViewMode::Recycle);
    }

    #[test]
    fn debug_output_redacts_token() {
        let out = format!("{:?}", alice());
        assert!(!out.contains("t1"));
        assert!(out.contains("<redacted>"));
        let creds = Credentials { token: "secret".into(), username: "alice".into() };
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
