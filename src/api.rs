use std::collections::BTreeSet;

pub const SKIP_SEGMENTS_PATH: &str = "/api/skipSegments";

/// Builds the skipSegments endpoint for an instance, or `None` if no
/// instance is configured.
pub fn skip_segments_url(instance: &str) -> Option<String> {
    let instance = instance.trim().trim_end_matches('/');
    if instance.is_empty() {
        return None;
    }

    Some(format!("{}{}", instance, SKIP_SEGMENTS_PATH))
}

/// Query parameters for a skipSegments request. `categories` is sent as a
/// JSON array string, e.g. `["intro","sponsor"]`.
pub fn query(
    video_id: &str,
    categories: &BTreeSet<String>,
) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
    Ok(vec![
        ("videoID", video_id.to_string()),
        ("categories", serde_json::to_string(categories)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url() {
        assert_eq!(
            skip_segments_url("https://sponsor.ajay.app").as_deref(),
            Some("https://sponsor.ajay.app/api/skipSegments")
        );
        assert_eq!(
            skip_segments_url("https://sb.example.org/ ").as_deref(),
            Some("https://sb.example.org/api/skipSegments")
        );
        assert_eq!(skip_segments_url(""), None);
        assert_eq!(skip_segments_url("   "), None);
    }

    #[test]
    fn categories_are_json() {
        let categories = ["sponsor", "intro"].iter().map(|c| c.to_string()).collect();
        let params = query("dQw4w9WgXcQ", &categories).unwrap();

        assert_eq!(
            params,
            vec![
                ("videoID", "dQw4w9WgXcQ".to_string()),
                ("categories", r#"["intro","sponsor"]"#.to_string()),
            ]
        );
    }
}
