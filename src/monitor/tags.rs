//! Monitor tags
//!
//! Keys are unique within a monitor. The collection keeps insertion order,
//! which is the order the platform returns and expects.

use serde::{Deserialize, Deserializer, Serialize};

/// A tag, as sent and returned by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Origin context, e.g. "CONTEXTLESS"; set by the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// e.g. "USER" or "RULE_BASED"; set by the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
            context: None,
            source: None,
        }
    }
}

/// Ordered tag collection with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag unless its key is already present.
    ///
    /// Returns false when the key existed; the existing entry is left as is.
    pub fn add(&mut self, key: &str, value: Option<&str>) -> bool {
        if self.get(key).is_some() {
            return false;
        }
        self.0.push(Tag::new(key, value.map(str::to_string)));
        true
    }

    /// Remove every tag with this key; returns how many were removed
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|t| t.key != key);
        before - self.0.len()
    }

    /// Key present, and when `value` is given, carrying that value
    pub fn contains(&self, key: &str, value: Option<&str>) -> bool {
        self.0
            .iter()
            .any(|t| t.key == key && value.map_or(true, |v| t.value.as_deref() == Some(v)))
    }

    /// Replace the value of an existing tag; false if the key is absent
    pub fn set_value(&mut self, key: &str, value: Option<&str>) -> bool {
        match self.0.iter_mut().find(|t| t.key == key) {
            Some(tag) => {
                tag.value = value.map(str::to_string);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.iter().find(|t| t.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Tag> for Tags {
    /// Later duplicates of a key are dropped
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for tag in iter {
            if tags.get(&tag.key).is_none() {
                tags.0.push(tag);
            }
        }
        tags
    }
}

impl<'de> Deserialize<'de> for Tags {
    /// Goes through [`FromIterator`], so duplicate keys collapse to the first
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<Tag>::deserialize(deserializer)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_existing_key_is_noop() {
        let mut tags = Tags::new();
        assert!(tags.add("env", Some("prod")));
        assert!(!tags.add("env", Some("staging")));
        assert!(!tags.add("env", None));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("env").unwrap().value.as_deref(), Some("prod"));
    }

    #[test]
    fn test_keys_unique_for_any_sequence() {
        let mut tags = Tags::new();
        let keys = ["a", "b", "a", "c", "b", "a", "d", "c"];
        for (i, key) in keys.iter().enumerate() {
            let value = i.to_string();
            tags.add(key, if i % 2 == 0 { Some(value.as_str()) } else { None });
        }
        let mut seen: Vec<_> = tags.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(seen, ["a", "b", "c", "d"]);
        seen.dedup();
        assert_eq!(seen.len(), tags.len());
    }

    #[test]
    fn test_contains_with_and_without_value() {
        let mut tags = Tags::new();
        tags.add("team", Some("web"));
        tags.add("critical", None);

        assert!(tags.contains("team", None));
        assert!(tags.contains("team", Some("web")));
        assert!(!tags.contains("team", Some("db")));
        assert!(tags.contains("critical", None));
        assert!(!tags.contains("critical", Some("yes")));
        assert!(!tags.contains("owner", None));
    }

    #[test]
    fn test_remove_and_set_value() {
        let mut tags: Tags = serde_json::from_value(json!([
            {"key": "env", "value": "prod"},
            {"key": "team"}
        ]))
        .unwrap();
        assert_eq!(tags.remove("missing"), 0);
        assert!(tags.set_value("team", Some("web")));
        assert!(!tags.set_value("missing", Some("x")));
        assert_eq!(tags.remove("env"), 1);
        assert_eq!(
            serde_json::to_value(&tags).unwrap(),
            json!([{"key": "team", "value": "web"}])
        );
    }

    #[test]
    fn test_platform_fields_round_trip() {
        let doc = json!([
            {"context": "CONTEXTLESS", "key": "app", "value": "shop", "source": "USER"}
        ]);
        let tags: Tags = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(serde_json::to_value(&tags).unwrap(), doc);
    }

    #[test]
    fn test_duplicate_keys_collapse_on_load() {
        let tags: Tags = serde_json::from_value(json!([
            {"key": "env", "value": "prod"},
            {"key": "team"},
            {"key": "env", "value": "staging"}
        ]))
        .unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("env", Some("prod")));
        assert!(!tags.contains("env", Some("staging")));
    }
}
