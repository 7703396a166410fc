//! Short links: creation, paging and editing.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `validDateType` value meaning the link never expires.
pub const VALID_DATE_PERMANENT: i32 = 0;
/// `validDateType` value meaning the link expires at `validDate`.
pub const VALID_DATE_CUSTOM: i32 = 1;

/// One short link as listed by the paging endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub short_uri: String,
    pub full_short_url: String,
    pub origin_url: String,
    pub gid: String,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub valid_date: Option<String>,
    #[serde(default)]
    pub describe: String,
    #[serde(default)]
    pub valid_date_type: Option<i32>,
    #[serde(default)]
    pub enable_status: Option<i32>,
    #[serde(default)]
    pub total_pv: i64,
    #[serde(default)]
    pub total_uv: i64,
    #[serde(default)]
    pub total_uip: i64,
    #[serde(default)]
    pub today_pv: Option<i64>,
    #[serde(default)]
    pub today_uv: Option<i64>,
    #[serde(default)]
    pub today_uip: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortLinkReq {
    #[validate(url(message = "Origin URL must be a valid URL"))]
    pub origin_url: String,

    #[validate(length(min = 1, message = "Group id cannot be empty"))]
    pub gid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date_type: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortLinkResp {
    pub full_short_url: String,
    pub origin_url: String,
    pub gid: String,
}

/// Batch creation; `origin_urls` is newline-separated, as the backend expects.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateShortLinkReq {
    #[validate(length(min = 1, message = "At least one origin URL is required"))]
    pub origin_urls: String,

    #[validate(length(min = 1, message = "Group id cannot be empty"))]
    pub gid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date_type: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<String>,
}

impl BatchCreateShortLinkReq {
    pub fn new<I, S>(gid: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origin_urls = urls
            .into_iter()
            .map(|u| u.as_ref().trim().to_owned())
            .filter(|u| !u.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            origin_urls,
            gid: gid.into(),
            valid_date_type: None,
            valid_date: None,
            describe: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkBaseInfo {
    pub full_short_url: String,
    pub origin_url: String,
    #[serde(default)]
    pub describe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateShortLinkResp {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub base_link_infos: Vec<ShortLinkBaseInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShortLinkReq {
    #[validate(length(min = 1, message = "Short URL cannot be empty"))]
    pub full_short_url: String,

    #[validate(url(message = "Origin URL must be a valid URL"))]
    pub origin_url: String,

    pub gid: String,

    pub valid_date_type: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageShortLinkReq {
    pub gid: String,
    pub current: i64,
    pub size: i64,
}

impl PageShortLinkReq {
    pub fn first(gid: impl Into<String>, size: i64) -> Self {
        Self { gid: gid.into(), current: 1, size }
    }
}
