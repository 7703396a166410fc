use serde::de::IgnoredAny;
use serde::Deserialize;
use shortlink_common::models::{UserInfoResp, UserLoginReq, UserLoginResp, UserRegisterReq, UserUpdateReq};
use shortlink_common::validation::validate_request;

use super::admin_path;
use crate::error::Result;
use crate::http::HttpClient;

/// `check-login` answers either a bare boolean or `{ "success": bool }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LoginCheck {
    Flag(bool),
    Wrapped {
        #[serde(default)]
        success: bool,
    },
}

impl LoginCheck {
    fn is_valid(&self) -> bool {
        match *self {
            Self::Flag(ok) | Self::Wrapped { success: ok } => ok,
        }
    }
}

pub struct UserApi<'a> {
    http: &'a HttpClient,
}

impl<'a> UserApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn register(&self, req: &UserRegisterReq) -> Result<()> {
        validate_request(req)?;
        let _: IgnoredAny = self.http.post(&admin_path("/user"), req).await?;
        Ok(())
    }

    /// Raw login call. Prefer [`SessionStore::login`](crate::SessionStore::login),
    /// which also records the issued credentials.
    pub async fn login(&self, req: &UserLoginReq) -> Result<UserLoginResp> {
        validate_request(req)?;
        self.http.post(&admin_path("/user/login"), req).await
    }

    /// Profile with phone and mail masked.
    pub async fn user_info(&self, username: &str) -> Result<UserInfoResp> {
        self.http.get(&admin_path(&format!("/user/{username}")), &()).await
    }

    /// Profile without masking.
    pub async fn actual_user_info(&self, username: &str) -> Result<UserInfoResp> {
        self.http.get(&admin_path(&format!("/actual/user/{username}")), &()).await
    }

    /// Whether `username` is already taken.
    pub async fn has_username(&self, username: &str) -> Result<bool> {
        self.http.get(&admin_path("/user/has-username"), &[("username", username)]).await
    }

    pub async fn update(&self, req: &UserUpdateReq) -> Result<()> {
        validate_request(req)?;
        let _: IgnoredAny = self.http.put(&admin_path("/user"), req).await?;
        Ok(())
    }

    pub async fn check_login(&self, username: &str, token: &str) -> Result<bool> {
        let check: LoginCheck = self
            .http
            .get(&admin_path("/user/check-login"), &[("username", username), ("token", token)])
            .await?;
        Ok(check.is_valid())
    }

    /// Tell the backend the session is over. Silent: no notices, and a
    /// rejected token does not trigger session expiry.
    pub async fn logout(&self, username: &str, token: &str) -> Result<()> {
        let _: IgnoredAny = self
            .http
            .request(reqwest::Method::DELETE, &admin_path("/user/logout"))
            .query(&[("username", username), ("token", token)])
            .silent()
            .send()
            .await?;
        Ok(())
    }
}
