#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shortlink_client::{
    HttpClient, MemoryStorage, Navigator, Notice, NoticeLevel, Notifier, Session, SessionStore,
};
use shortlink_common::config::{self, AppConfig};
use shortlink_common::ViewMode;
use wiremock::MockServer;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("shortlink_client=debug"))
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
pub struct CountingNavigator {
    redirects: AtomicUsize,
}

impl CountingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn alice() -> Session {
    Session {
        token: "t1".into(),
        username: "alice".into(),
        realname: "Alice".into(),
        view_mode: ViewMode::Normal,
    }
}

pub fn config_for(base_url: &str) -> AppConfig {
    config::from_toml(&format!("[api]\nbase_url = \"{base_url}\"\n")).unwrap()
}

/// Everything a pipeline test needs, wired against `base_url`.
pub struct Harness {
    pub http: HttpClient,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<CountingNavigator>,
}

impl Harness {
    pub fn new(base_url: &str, stored: Option<Session>) -> Self {
        init_tracing();
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(CountingNavigator::default());
        let storage = stored.map_or_else(MemoryStorage::new, MemoryStorage::with);
        let session = SessionStore::open(storage, navigator.clone());
        let http = HttpClient::new(&config_for(base_url).api, Arc::clone(&session), notifier.clone())
            .unwrap();
        Self { http, session, notifier, navigator }
    }

    pub fn signed_in(server: &MockServer) -> Self {
        Self::new(&server.uri(), Some(alice()))
    }

    pub fn signed_out(server: &MockServer) -> Self {
        Self::new(&server.uri(), None)
    }
}

pub fn envelope(code: &str, message: Option<&str>, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "code": code, "message": message, "data": data })
}

pub fn ok(data: serde_json::Value) -> serde_json::Value {
    envelope("0", None, data)
}
