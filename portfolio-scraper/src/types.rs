use serde::{Deserialize, Serialize};

/// One person's record in the portfolio dataset.
///
/// `image_url` and `local_image` are always set or cleared together: a
/// candidate URL without a downloaded local copy is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub name: String,

    /// Absolute URL of the person's site, the scrape target.
    pub portfolio_url: String,

    /// Best candidate image found on the site, absolute URL.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Root-relative path of the downloaded copy, e.g.
    /// `/portfolio-images/portfolio-3.jpg`.
    #[serde(default)]
    pub local_image: Option<String>,

    /// Any other dataset fields, carried through the run unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"{
            "name": "A",
            "portfolioUrl": "https://a.example/",
            "role": "UX Designer",
            "cohort": 2024
        }"#;
        let entry: PortfolioEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "A");
        assert_eq!(entry.image_url, None);
        assert_eq!(entry.extra["role"], "UX Designer");

        let out = serde_json::to_string(&entry).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["role"], "UX Designer");
        assert_eq!(value["cohort"], 2024);
    }

    #[test]
    fn test_absent_image_fields_serialize_as_null() {
        let entry = PortfolioEntry {
            name: "A".to_string(),
            portfolio_url: "https://a.example/".to_string(),
            image_url: None,
            local_image: None,
            extra: serde_json::Map::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["imageUrl"].is_null());
        assert!(value["localImage"].is_null());
    }
}
