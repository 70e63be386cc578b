use serde::{Deserialize, Deserializer, Serialize};

/// Raw entry from the latest-movies feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeedEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tmdb_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

/// `page-{n}.json` body. Anything without a `result` array reads as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeedPage {
    #[serde(default)]
    pub result: Vec<FeedEntry>,
}

/// A feed entry baked into the static catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatestMovie {
    pub id: String,
    pub title: String,
    pub image: String,
    pub rating: f64,
    pub year: i32,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    pub description: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_page_accepts_numeric_and_empty_ids() {
        let json = r#"{"result": [
            {"imdb_id": "tt23743204", "tmdb_id": 1295179, "title": "Some Movie 2024",
             "embed_url": "https://example.test/embed/movie/tt23743204", "quality": "HD"},
            {"imdb_id": "", "tmdb_id": "42", "title": "Other"}
        ]}"#;
        let page: FeedPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.result[0].tmdb_id.as_deref(), Some("1295179"));
        assert_eq!(page.result[1].imdb_id, None);
        assert_eq!(page.result[1].tmdb_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_feed_page_without_result_is_empty() {
        let page: FeedPage = serde_json::from_str(r#"{"status": 404}"#).unwrap();
        assert!(page.result.is_empty());
    }
}
