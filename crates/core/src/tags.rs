//! Project tags are stored as one comma-separated string.

/// Split a stored tag string into trimmed, non-empty entries.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Normalize user input to the stored form (`None` when no tag survives).
pub fn normalize_tags(raw: Option<&str>) -> Option<String> {
    let tags = parse_tags(raw);
    (!tags.is_empty()).then(|| tags.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_tags(Some(" rust, web ,,  ,design")),
            vec!["rust", "web", "design"]
        );
    }

    #[test]
    fn missing_or_blank_means_no_tags() {
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some("")).is_empty());
        assert!(parse_tags(Some(" , ,")).is_empty());
    }

    #[test]
    fn normalize_rejoins_clean_entries() {
        assert_eq!(normalize_tags(Some("a , b,")), Some("a,b".to_string()));
        assert_eq!(normalize_tags(Some(" ,")), None);
    }
}
