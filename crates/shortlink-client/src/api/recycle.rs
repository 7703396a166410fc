use serde::de::IgnoredAny;
use shortlink_common::models::{RecycleBinOperateReq, RecycleBinPageReq, ShortLinkRecord};
use shortlink_common::Page;

use super::admin_path;
use crate::error::Result;
use crate::http::HttpClient;

/// Links moved out of the active listing. `save` moves a link in,
/// `recover` brings it back, `remove` deletes it for good.
pub struct RecycleBinApi<'a> {
    http: &'a HttpClient,
}

impl<'a> RecycleBinApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn page(&self, req: &RecycleBinPageReq) -> Result<Page<ShortLinkRecord>> {
        self.http.get(&admin_path("/recycle-bin/page"), req).await
    }

    pub async fn save(&self, req: &RecycleBinOperateReq) -> Result<()> {
        self.operate("/recycle-bin/save", req).await
    }

    pub async fn recover(&self, req: &RecycleBinOperateReq) -> Result<()> {
        self.operate("/recycle-bin/recover", req).await
    }

    pub async fn remove(&self, req: &RecycleBinOperateReq) -> Result<()> {
        self.operate("/recycle-bin/remove", req).await
    }

    async fn operate(&self, suffix: &str, req: &RecycleBinOperateReq) -> Result<()> {
        let _: IgnoredAny = self.http.post(&admin_path(suffix), req).await?;
        Ok(())
    }
}
