use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form user profile: attribute name → JSON value. No fixed schema.
///
/// Consumed read-only; the accessors below tolerate the shapes clients
/// actually send (arrays or comma-separated strings for list attributes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub Map<String, Value>);

/// Attributes folded into the text used for similarity matching, in order.
const MATCHING_ATTRIBUTES: &[&str] = &["summary", "skills", "education", "projects", "interests"];

impl UserProfile {
    /// Display name, if the profile carries one.
    pub fn name(&self) -> Option<&str> {
        ["name", "displayName"]
            .iter()
            .filter_map(|k| self.0.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    pub fn interests(&self) -> Vec<String> {
        self.string_list("interests")
    }

    pub fn skills(&self) -> Vec<String> {
        self.string_list("skills")
    }

    /// Flattens the descriptive attributes into one whitespace-joined string.
    pub fn text_for_matching(&self) -> String {
        MATCHING_ATTRIBUTES
            .iter()
            .filter_map(|k| self.0.get(*k))
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(map) => map
            .values()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> UserProfile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_interests_from_array() {
        let p = profile(json!({"interests": ["AI/ML", " Web Development ", ""]}));
        assert_eq!(p.interests(), vec!["AI/ML", "Web Development"]);
    }

    #[test]
    fn test_interests_from_comma_string() {
        let p = profile(json!({"interests": "Design, Cloud"}));
        assert_eq!(p.interests(), vec!["Design", "Cloud"]);
    }

    #[test]
    fn test_name_prefers_name_over_display_name() {
        let p = profile(json!({"name": "Asha", "displayName": "A."}));
        assert_eq!(p.name(), Some("Asha"));
        let p = profile(json!({"name": "  ", "displayName": "Sam"}));
        assert_eq!(p.name(), Some("Sam"));
        assert_eq!(UserProfile::default().name(), None);
    }

    #[test]
    fn test_text_for_matching_flattens_known_attributes() {
        let p = profile(json!({
            "summary": "Backend engineer",
            "skills": ["rust", "sql"],
            "age": 29,
            "education": {"degree": "BSc"}
        }));
        assert_eq!(p.text_for_matching(), "Backend engineer rust sql BSc");
    }
}
