//! JSON export

use fixhero_core::{Issue, Result};

/// Render issues as a pretty-printed JSON array
pub fn to_json(issues: &[Issue]) -> Result<String> {
    Ok(serde_json::to_string_pretty(issues)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trips() {
        let issues = vec![
            Issue::new("https://a.test", "A"),
            Issue::new("https://b.test", "B"),
        ];

        let json = to_json(&issues).unwrap();
        let parsed: Vec<Issue> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, issues);
    }

    #[test]
    fn test_empty_export_is_an_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}
