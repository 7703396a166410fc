use serde::de::IgnoredAny;
use shortlink_common::models::{
    ShortLinkGroupResp, ShortLinkGroupSaveReq, ShortLinkGroupSortReq, ShortLinkGroupUpdateReq,
};
use shortlink_common::validation::validate_request;

use super::admin_path;
use crate::error::Result;
use crate::http::HttpClient;

pub struct GroupApi<'a> {
    http: &'a HttpClient,
}

impl<'a> GroupApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn create(&self, name: &str) -> Result<()> {
        let req = ShortLinkGroupSaveReq { name: name.to_owned() };
        validate_request(&req)?;
        let _: IgnoredAny = self.http.post(&admin_path("/group"), &req).await?;
        Ok(())
    }

    /// The user's groups in their sort order.
    pub async fn list(&self) -> Result<Vec<ShortLinkGroupResp>> {
        let groups: Option<Vec<ShortLinkGroupResp>> = self.http.get(&admin_path("/group"), &()).await?;
        Ok(groups.unwrap_or_default())
    }

    pub async fn update(&self, req: &ShortLinkGroupUpdateReq) -> Result<()> {
        validate_request(req)?;
        let _: IgnoredAny = self.http.put(&admin_path("/group"), req).await?;
        Ok(())
    }

    pub async fn delete(&self, gid: &str) -> Result<()> {
        let _: IgnoredAny = self.http.delete(&admin_path("/group"), &[("gid", gid)]).await?;
        Ok(())
    }

    pub async fn sort(&self, req: &ShortLinkGroupSortReq) -> Result<()> {
        let _: IgnoredAny = self.http.post(&admin_path("/group/sort"), req).await?;
        Ok(())
    }
}
