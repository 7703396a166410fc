//! Groups: named buckets of short links, ordered by the user.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShortLinkGroupSaveReq {
    #[validate(length(min = 1, max = 64, message = "Group name must be 1-64 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShortLinkGroupUpdateReq {
    #[validate(length(min = 1, message = "Group id cannot be empty"))]
    pub gid: String,

    #[validate(length(min = 1, max = 64, message = "Group name must be 1-64 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortGroup {
    pub gid: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLinkGroupSortReq {
    pub groups: Vec<SortGroup>,
}

impl ShortLinkGroupSortReq {
    /// Assign `sortOrder` 0, 1, 2, ... following the given gid order.
    pub fn from_order<I, S>(gids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups = gids
            .into_iter()
            .zip(0..)
            .map(|(gid, sort_order)| SortGroup { gid: gid.into(), sort_order })
            .collect();
        Self { groups }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkGroupResp {
    pub gid: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub short_link_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_request_follows_given_order() {
        let req = ShortLinkGroupSortReq::from_order(["b", "a", "c"]);
        let orders: Vec<_> = req.groups.iter().map(|g| (g.gid.as_str(), g.sort_order)).collect();
        assert_eq!(orders, vec![("b", 0), ("a", 1), ("c", 2)]);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["groups"][0]["sortOrder"], 0);
    }
}
