//! IP geolocation, either through the backend's cache or straight from the provider.

use std::time::Duration;

use reqwest::Method;
use shortlink_common::config::LocationConfig;
use shortlink_common::models::IpLocation;

use super::admin_path;
use crate::error::{ClientError, Result};
use crate::http::{HttpClient, HttpClientBuilder};
use crate::middleware::RequestLog;

pub struct LocationApi<'a> {
    http: &'a HttpClient,
    timeout: Duration,
}

impl<'a> LocationApi<'a> {
    pub fn new(http: &'a HttpClient, config: &LocationConfig) -> Self {
        Self { http, timeout: config.timeout() }
    }

    /// Backend-cached lookup.
    pub async fn lookup(&self, ip: &str) -> Result<IpLocation> {
        self.http
            .request(Method::GET, &admin_path("/ip-location"))
            .query(&[("ip", ip)])
            .timeout(self.timeout)
            .send()
            .await
    }
}

/// Direct lookup against the third-party provider.
///
/// Runs on its own bare chain: no auth headers, no envelope, no session
/// handling. The provider's answer is returned as is; check
/// [`IpLocation::is_ok`] for its verdict.
#[derive(Clone)]
pub struct GeoClient {
    http: HttpClient,
    api_key: String,
}

impl GeoClient {
    pub fn new(config: &LocationConfig) -> Result<Self> {
        let http = HttpClientBuilder::new(&config.endpoint, config.timeout())
            .with(RequestLog)
            .build()?;
        Ok(Self { http, api_key: config.api_key.clone() })
    }

    /// Locate `ip`, or the caller's own address when `None`.
    pub async fn locate(&self, ip: Option<&str>) -> Result<IpLocation> {
        let mut params = vec![("key", self.api_key.as_str())];
        if let Some(ip) = ip.filter(|ip| !ip.is_empty()) {
            params.push(("ip", ip));
        }
        let reply = self.http.request(Method::GET, "").query(&params).dispatch().await?;
        if !reply.status.is_success() {
            return Err(ClientError::Api {
                status: reply.status.as_u16(),
                message: reply.message().unwrap_or_else(|| reply.status.to_string()),
            });
        }
        reply.json()
    }
}
