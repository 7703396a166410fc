use serde::de::IgnoredAny;
use shortlink_common::models::{
    BatchCreateShortLinkReq, BatchCreateShortLinkResp, CreateShortLinkReq, CreateShortLinkResp,
    PageShortLinkReq, ShortLinkRecord, UpdateShortLinkReq,
};
use shortlink_common::validation::validate_request;
use shortlink_common::Page;

use super::admin_path;
use crate::error::Result;
use crate::http::HttpClient;

pub struct LinkApi<'a> {
    http: &'a HttpClient,
}

impl<'a> LinkApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// One page of the active links in a group.
    pub async fn page(&self, req: &PageShortLinkReq) -> Result<Page<ShortLinkRecord>> {
        self.http.get(&admin_path("/link"), req).await
    }

    pub async fn create(&self, req: &CreateShortLinkReq) -> Result<CreateShortLinkResp> {
        validate_request(req)?;
        self.http.post(&admin_path("/link"), req).await
    }

    pub async fn batch_create(&self, req: &BatchCreateShortLinkReq) -> Result<BatchCreateShortLinkResp> {
        validate_request(req)?;
        self.http.post(&admin_path("/link/batch"), req).await
    }

    pub async fn update(&self, req: &UpdateShortLinkReq) -> Result<()> {
        validate_request(req)?;
        let _: IgnoredAny = self.http.put(&admin_path("/link"), req).await?;
        Ok(())
    }

    /// Page title of `url`, as fetched by the backend.
    pub async fn url_title(&self, url: &str) -> Result<String> {
        let title: Option<String> = self.http.get(&admin_path("/title"), &[("url", url)]).await?;
        Ok(title.unwrap_or_default())
    }
}
