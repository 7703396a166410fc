//! Typed wrappers over the admin API, one per backend resource.
//!
//! Each wrapper borrows an [`HttpClient`](crate::HttpClient), so every call
//! runs through the same chain and session. Request bodies are validated
//! locally before anything is sent.

mod group;
mod link;
mod location;
mod recycle;
mod stats;
mod user;

pub use group::GroupApi;
pub use link::LinkApi;
pub use location::{GeoClient, LocationApi};
pub use recycle::RecycleBinApi;
pub use stats::StatsApi;
pub use user::UserApi;

use shortlink_common::config::ADMIN_API_PREFIX;

pub(crate) fn admin_path(suffix: &str) -> String {
    format!("{ADMIN_API_PREFIX}{suffix}")
}
