//! End-to-end behavior of the request chain against a mocked admin backend.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{alice, ok, envelope, Harness};
use serde_json::{json, Value};
use shortlink_client::api::{GroupApi, LinkApi};
use shortlink_client::middleware::{NETWORK_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
use shortlink_client::{CancellationToken, ClientError, FileStorage, NoticeLevel, SessionStore};
use shortlink_common::models::{PageShortLinkReq, UserLoginReq};
use shortlink_common::ViewMode;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP: &str = "/api/short-link/admin/v1/group";
const LOGIN: &str = "/api/short-link/admin/v1/user/login";
const LOGOUT: &str = "/api/short-link/admin/v1/user/logout";
const CHECK_LOGIN: &str = "/api/short-link/admin/v1/user/check-login";

fn login_req() -> UserLoginReq {
    UserLoginReq { username: "alice".into(), password: "secret".into() }
}

#[tokio::test]
async fn success_envelope_resolves_to_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            { "gid": "g1", "name": "Default", "sortOrder": 0, "shortLinkCount": 3 }
        ]))))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let groups = GroupApi::new(&h.http).list().await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].gid, "g1");
    assert_eq!(groups[0].short_link_count, 3);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn domain_failure_rejects_with_backend_message_and_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("9999", Some("bad gid"), Value::Null)))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let err = GroupApi::new(&h.http).list().await.unwrap_err();

    assert_eq!(err.to_string(), "bad gid");
    assert_eq!(err.domain_code(), Some("9999"));
    assert_eq!(h.notifier.errors(), vec!["bad gid".to_owned()]);
    // Domain failures never touch the session.
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn blank_failure_message_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("A000001", Some("  "), Value::Null)))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let err = GroupApi::new(&h.http).list().await.unwrap_err();
    assert_eq!(err.to_string(), "Operation failed");
}

#[tokio::test]
async fn envelope_without_code_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let err = GroupApi::new(&h.http).list().await.unwrap_err();
    assert!(matches!(err, ClientError::Json(_)), "{err:?}");
    assert_eq!(h.notifier.notices().len(), 1);
}

#[tokio::test]
async fn unauthorized_clears_session_and_redirects_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "status": 401, "message": "invalid token" })),
        )
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let api = GroupApi::new(&h.http);
    let (a, b, c) = tokio::join!(api.list(), api.list(), api.list());

    for result in [a, b, c] {
        let err = result.unwrap_err();
        assert!(err.is_auth(), "{err:?}");
    }
    assert!(!h.session.is_authenticated());
    assert_eq!(h.session.snapshot().token, "");
    assert_eq!(h.navigator.redirects(), 1);

    let warnings: Vec<_> = h
        .notifier
        .notices()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, SESSION_EXPIRED_MESSAGE);
}

fn session_warnings(h: &Harness) -> usize {
    h.notifier
        .notices()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Warning && n.message == SESSION_EXPIRED_MESSAGE)
        .count()
}

#[tokio::test]
async fn unauthorized_while_signed_out_redirects_and_warns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "login required" })))
        .mount(&server)
        .await;

    let h = Harness::signed_out(&server);
    let err = GroupApi::new(&h.http).list().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized { ref message } if message == "login required"));
    assert_eq!(h.navigator.redirects(), 1);
    assert_eq!(session_warnings(&h), 1);
}

#[tokio::test]
async fn late_unauthorized_for_replaced_token_keeps_new_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .and(header("token", "t1"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "invalid token" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "token": "t2", "username": "alice", "realname": "Alice"
        }))))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let api = GroupApi::new(&h.http);
    let (listed, relogged) = tokio::join!(api.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.session.login(&h.http, &login_req()).await
    });

    assert!(listed.unwrap_err().is_auth());
    relogged.unwrap();
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.credentials().unwrap().token, "t2");
    assert_eq!(h.navigator.redirects(), 0);
    assert_eq!(session_warnings(&h), 0);
}

#[tokio::test]
async fn late_unauthorized_from_before_login_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "login required" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "token": "t1", "username": "alice", "realname": "Alice"
        }))))
        .mount(&server)
        .await;

    let h = Harness::signed_out(&server);
    let api = GroupApi::new(&h.http);
    let (listed, logged_in) = tokio::join!(api.list(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.session.login(&h.http, &login_req()).await
    });

    assert!(listed.unwrap_err().is_auth());
    assert_eq!(logged_in.unwrap(), alice());
    assert!(h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 0);
    assert_eq!(session_warnings(&h), 0);
}

#[tokio::test]
async fn server_error_surfaces_status_and_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let err = GroupApi::new(&h.http).list().await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 500, .. }), "{err:?}");
    assert_eq!(h.notifier.errors(), vec!["db down".to_owned()]);
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn network_failure_notifies_and_rejects() {
    // Nothing listens on port 1.
    let h = Harness::new("http://127.0.0.1:1", Some(alice()));
    let err = GroupApi::new(&h.http).list().await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)), "{err:?}");
    assert_eq!(h.notifier.errors(), vec![NETWORK_ERROR_MESSAGE.to_owned()]);
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn credentials_are_attached_while_authenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .and(header("token", "t1"))
        .and(header("username", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    assert!(GroupApi::new(&h.http).list().await.unwrap().is_empty());
}

#[tokio::test]
async fn no_credentials_are_sent_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&server)
        .await;

    let h = Harness::signed_out(&server);
    GroupApi::new(&h.http).list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("token").is_none());
    assert!(requests[0].headers.get("username").is_none());
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn login_populates_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "token": "t1", "username": "alice", "realname": "Alice"
        }))))
        .mount(&server)
        .await;

    let h = Harness::signed_out(&server);
    let session = h.session.login(&h.http, &login_req()).await.unwrap();

    assert_eq!(session, alice());
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.credentials().unwrap().token, "t1");
    assert_eq!(h.navigator.redirects(), 0);
}

#[tokio::test]
async fn failed_login_leaves_previous_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope("A000302", Some("wrong password"), Value::Null)),
        )
        .mount(&server)
        .await;

    let h = Harness::signed_out(&server);
    h.session.set_view_mode(ViewMode::Recycle).unwrap();
    let before = h.session.snapshot();

    let err = h.session.login(&h.http, &login_req()).await.unwrap_err();
    assert_eq!(err.to_string(), "wrong password");
    assert_eq!(h.session.snapshot(), before);
    assert_eq!(h.notifier.errors(), vec!["wrong password".to_owned()]);
}

#[tokio::test]
async fn login_without_token_forces_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({ "username": "alice" }))))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let err = h.session.login(&h.http, &login_req()).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidSession(_)), "{err:?}");
    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 1);
}

#[tokio::test]
async fn invalid_login_request_never_reaches_backend() {
    let server = MockServer::start().await;
    let h = Harness::signed_out(&server);

    let req = UserLoginReq { username: String::new(), password: "secret".into() };
    let err = h.session.login(&h.http, &req).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn logout_notifies_backend_then_clears_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(LOGOUT))
        .and(query_param("username", "alice"))
        .and(query_param("token", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    h.session.logout(&h.http).await;

    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 1);
}

#[tokio::test]
async fn logout_succeeds_with_unreachable_backend() {
    let h = Harness::new("http://127.0.0.1:1", Some(alice()));
    h.session.logout(&h.http).await;

    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 1);
    // The backend notification is silent.
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn logout_with_rejected_token_redirects_once() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(LOGOUT))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "status": 401, "message": "expired" })))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    h.session.logout(&h.http).await;

    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 1);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn check_session_keeps_valid_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHECK_LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(true))))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    assert!(h.session.check_session(&h.http).await);
    assert!(h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 0);
}

#[tokio::test]
async fn check_session_rejected_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHECK_LOGIN))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({ "success": false }))))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(LOGOUT))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(Value::Null)))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    assert!(!h.session.check_session(&h.http).await);
    assert!(!h.session.is_authenticated());
    assert_eq!(h.navigator.redirects(), 1);
}

#[tokio::test]
async fn check_session_without_credentials_skips_backend() {
    let server = MockServer::start().await;
    let h = Harness::signed_out(&server);

    assert!(!h.session.check_session(&h.http).await);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(h.navigator.redirects(), 0);
}

#[tokio::test]
async fn concurrent_requests_resolve_independently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!([])))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/short-link/admin/v1/link"))
        .and(query_param("gid", "g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "records": [{ "fullShortUrl": "s.io/abc", "originUrl": "https://a.io", "gid": "g1" }],
            "total": 1, "size": 10, "current": 1
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/short-link/admin/v1/title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("9999", Some("unreachable url"), Value::Null)))
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let groups = GroupApi::new(&h.http);
    let links = LinkApi::new(&h.http);
    let page_req = PageShortLinkReq::first("g1", 10);
    let (g, l, t) = tokio::join!(
        groups.list(),
        links.page(&page_req),
        links.url_title("https://nowhere.invalid"),
    );

    assert!(g.unwrap().is_empty());
    let page = l.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].full_short_url, "s.io/abc");
    assert_eq!(t.unwrap_err().to_string(), "unreachable url");
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn cancelled_call_rejects_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!([])))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let h = Harness::signed_in(&server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result: Result<Value, _> = h
        .http
        .request(reqwest::Method::GET, GROUP)
        .cancel_on(&token)
        .send()
        .await;

    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn view_mode_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let navigator = Arc::new(common::CountingNavigator::default());

    let store = SessionStore::open(FileStorage::new(&file), navigator.clone());
    store.set_view_mode(ViewMode::Recycle).unwrap();
    drop(store);

    let reopened = SessionStore::open(FileStorage::new(&file), navigator);
    assert_eq!(reopened.view_mode(), ViewMode::Recycle);
    assert!(!reopened.is_authenticated());
}
