//! Visit statistics, per link and per group.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date format the stats endpoints expect.
pub const STATS_DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(STATS_DATE_FORMAT).to_string()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkStatsReq {
    pub full_short_url: String,
    pub gid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_status: Option<i32>,
    pub start_date: String,
    pub end_date: String,
}

impl ShortLinkStatsReq {
    pub fn between(
        full_short_url: impl Into<String>,
        gid: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            full_short_url: full_short_url.into(),
            gid: gid.into(),
            enable_status: None,
            start_date: format_date(start),
            end_date: format_date(end),
        }
    }

    /// Stats for the current UTC day.
    pub fn today(full_short_url: impl Into<String>, gid: impl Into<String>) -> Self {
        let day = today();
        Self::between(full_short_url, gid, day, day)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkGroupStatsReq {
    pub gid: String,
    pub start_date: String,
    pub end_date: String,
}

impl ShortLinkGroupStatsReq {
    pub fn between(gid: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self { gid: gid.into(), start_date: format_date(start), end_date: format_date(end) }
    }

    pub fn today(gid: impl Into<String>) -> Self {
        let day = today();
        Self::between(gid, day, day)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkAccessRecordReq {
    pub full_short_url: String,
    pub gid: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_status: Option<i32>,
    pub current: i64,
    pub size: i64,
}

impl ShortLinkAccessRecordReq {
    pub fn from_stats(stats: &ShortLinkStatsReq, current: i64, size: i64) -> Self {
        Self {
            full_short_url: stats.full_short_url.clone(),
            gid: stats.gid.clone(),
            start_date: stats.start_date.clone(),
            end_date: stats.end_date.clone(),
            enable_status: stats.enable_status,
            current,
            size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkGroupAccessRecordReq {
    pub gid: String,
    pub start_date: String,
    pub end_date: String,
    pub current: i64,
    pub size: i64,
}

impl ShortLinkGroupAccessRecordReq {
    pub fn from_stats(stats: &ShortLinkGroupStatsReq, current: i64, size: i64) -> Self {
        Self {
            gid: stats.gid.clone(),
            start_date: stats.start_date.clone(),
            end_date: stats.end_date.clone(),
            current,
            size,
        }
    }
}

// ── Response rows ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PvUvUipStats {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub pv: i64,
    #[serde(default)]
    pub uv: i64,
    #[serde(default)]
    pub uip: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleCnStat {
    pub locale: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopIpStat {
    pub ip: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserStat {
    pub browser: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsStat {
    pub os: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UvTypeStat {
    pub uv_type: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStat {
    pub device: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkStat {
    pub network: String,
    pub cnt: i64,
    #[serde(default)]
    pub ratio: f64,
}

/// Dashboard payload for one link or one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkStatsResp {
    #[serde(default)]
    pub pv_uv_uip_stats_list: Vec<PvUvUipStats>,
    #[serde(default)]
    pub overall_pv_uv_uip_stats: Option<PvUvUipStats>,
    #[serde(default)]
    pub locale_cn_stats: Vec<LocaleCnStat>,
    /// 24 buckets, one per hour of day
    #[serde(default)]
    pub hour_stats: Vec<i64>,
    #[serde(default)]
    pub top_ip_stats: Vec<TopIpStat>,
    /// 7 buckets, Monday first
    #[serde(default)]
    pub weekday_stats: Vec<i64>,
    #[serde(default)]
    pub browser_stats: Vec<BrowserStat>,
    #[serde(default)]
    pub os_stats: Vec<OsStat>,
    #[serde(default)]
    pub uv_type_stats: Vec<UvTypeStat>,
    #[serde(default)]
    pub device_stats: Vec<DeviceStat>,
    #[serde(default)]
    pub network_stats: Vec<NetworkStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    pub ip: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub access_time: Option<String>,
}
