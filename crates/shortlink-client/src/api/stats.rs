use shortlink_common::models::{
    AccessRecord, ShortLinkAccessRecordReq, ShortLinkGroupAccessRecordReq, ShortLinkGroupStatsReq,
    ShortLinkStatsReq, ShortLinkStatsResp,
};
use shortlink_common::Page;

use super::admin_path;
use crate::error::Result;
use crate::http::HttpClient;

pub struct StatsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> StatsApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Aggregated visit statistics of one link over a date range.
    pub async fn link(&self, req: &ShortLinkStatsReq) -> Result<ShortLinkStatsResp> {
        self.fetch_stats("/stats", req).await
    }

    /// Aggregated visit statistics of every link in a group.
    pub async fn group(&self, req: &ShortLinkGroupStatsReq) -> Result<ShortLinkStatsResp> {
        self.fetch_stats("/stats/group", req).await
    }

    pub async fn access_records(&self, req: &ShortLinkAccessRecordReq) -> Result<Page<AccessRecord>> {
        self.http.get(&admin_path("/stats/access-record"), req).await
    }

    pub async fn group_access_records(
        &self,
        req: &ShortLinkGroupAccessRecordReq,
    ) -> Result<Page<AccessRecord>> {
        self.http.get(&admin_path("/stats/access-record/group"), req).await
    }

    // A range without visits comes back as `null` data.
    async fn fetch_stats<Q: serde::Serialize>(&self, suffix: &str, req: &Q) -> Result<ShortLinkStatsResp> {
        let stats: Option<ShortLinkStatsResp> = self.http.get(&admin_path(suffix), req).await?;
        Ok(stats.unwrap_or_default())
    }
}
