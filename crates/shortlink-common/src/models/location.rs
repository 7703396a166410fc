//! IP geolocation payloads (AMap-compatible shape, also mirrored by the backend cache).

use serde::{Deserialize, Serialize};

/// Lookup result. Providers return `[]` instead of a string for unknown
/// regions, so text fields accept either.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpLocation {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub infocode: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub province: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub adcode: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub rectangle: String,
}

impl IpLocation {
    /// Provider status `"1"` means the lookup succeeded.
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

fn text_or_empty<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_array_regions_become_empty_strings() {
        let loc: IpLocation = serde_json::from_value(serde_json::json!({
            "status": "1", "info": "OK", "infocode": "10000",
            "province": [], "city": [], "adcode": [], "rectangle": []
        }))
        .unwrap();
        assert!(loc.is_ok());
        assert!(loc.province.is_empty());
    }
}
