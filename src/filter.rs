//! List filters
//!
//! Turns a filter for the monitor list endpoint into a query string. Filters
//! can be built with the typed setters or parsed from a JSON mapping; parsing
//! rejects a recognized key with a value of the wrong shape and ignores keys
//! it does not know.

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{Error, Result};

/// One `tag=` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// Any tag with this key
    Key(String),
    /// Rendered as `key:value`
    KeyValue(String, String),
}

impl TagFilter {
    fn render(&self) -> String {
        match self {
            TagFilter::Key(key) => key.clone(),
            TagFilter::KeyValue(key, value) => format!("{}:{}", key, value),
        }
    }
}

/// Filter for [`crate::SyntheticApi::list_monitors`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorFilter {
    pub tags: Vec<TagFilter>,
    pub location: Option<String>,
    pub monitor_type: Option<String>,
    pub enabled: Option<bool>,
    pub assigned_apps: Vec<String>,
    pub management_zone: Option<i64>,
    pub credential_id: Option<String>,
    pub credential_owner: Option<String>,
}

impl MonitorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, key: impl Into<String>) -> Self {
        self.tags.push(TagFilter::Key(key.into()));
        self
    }

    pub fn tag_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(TagFilter::KeyValue(key.into(), value.into()));
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn monitor_type(mut self, monitor_type: impl Into<String>) -> Self {
        self.monitor_type = Some(monitor_type.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn assigned_app(mut self, app: impl Into<String>) -> Self {
        self.assigned_apps.push(app.into());
        self
    }

    pub fn management_zone(mut self, zone: i64) -> Self {
        self.management_zone = Some(zone);
        self
    }

    pub fn credential_id(mut self, id: impl Into<String>) -> Self {
        self.credential_id = Some(id.into());
        self
    }

    pub fn credential_owner(mut self, owner: impl Into<String>) -> Self {
        self.credential_owner = Some(owner.into());
        self
    }

    /// Parse a filter mapping such as `{"tags": ["env", {"team": "web"}], "enabled": true}`.
    ///
    /// `null` is the empty filter.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => return Err(Error::invalid_filter("filter", "expected a mapping")),
        };

        let mut filter = Self::default();
        if let Some(tags) = map.get("tags") {
            filter.tags = parse_tags(tags)?;
        }
        if let Some(location) = map.get("location") {
            filter.location = Some(expect_str("location", location)?);
        }
        if let Some(monitor_type) = map.get("type") {
            filter.monitor_type = Some(expect_str("type", monitor_type)?);
        }
        if let Some(enabled) = map.get("enabled") {
            filter.enabled = Some(
                enabled
                    .as_bool()
                    .ok_or_else(|| Error::invalid_filter("enabled", "expected a boolean"))?,
            );
        }
        if let Some(apps) = map.get("assignedApps") {
            filter.assigned_apps = expect_list("assignedApps", apps)?
                .iter()
                .map(|app| expect_str("assignedApps", app))
                .collect::<Result<_>>()?;
        }
        if let Some(zone) = map.get("managementZone") {
            filter.management_zone = Some(
                zone.as_i64()
                    .ok_or_else(|| Error::invalid_filter("managementZone", "expected an integer"))?,
            );
        }
        if let Some(id) = map.get("credentialId") {
            filter.credential_id = Some(expect_str("credentialId", id)?);
        }
        if let Some(owner) = map.get("credentialOwner") {
            filter.credential_owner = Some(expect_str("credentialOwner", owner)?);
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Form-encoded query string, without the leading `?`
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for tag in &self.tags {
            query.append_pair("tag", &tag.render());
        }
        if let Some(ref location) = self.location {
            query.append_pair("location", location);
        }
        if let Some(ref monitor_type) = self.monitor_type {
            query.append_pair("type", monitor_type);
        }
        if let Some(enabled) = self.enabled {
            query.append_pair("enabled", if enabled { "true" } else { "false" });
        }
        for app in &self.assigned_apps {
            query.append_pair("assignedApps", app);
        }
        if let Some(zone) = self.management_zone {
            query.append_pair("managementZone", &zone.to_string());
        }
        if let Some(ref id) = self.credential_id {
            query.append_pair("credentialId", id);
        }
        if let Some(ref owner) = self.credential_owner {
            query.append_pair("credentialOwner", owner);
        }
        query.finish()
    }

    /// `base` with the query string appended, if there is one
    pub fn apply(&self, base: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }
}

fn expect_str(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_filter(key, format!("expected a string, got {}", value)))
}

fn expect_list<'a>(key: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::invalid_filter(key, "expected a list"))
}

fn parse_tags(value: &Value) -> Result<Vec<TagFilter>> {
    expect_list("tags", value)?
        .iter()
        .map(|tag| match tag {
            Value::String(key) => Ok(TagFilter::Key(key.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(TagFilter::Key(n.to_string())),
            Value::Object(map) if map.len() == 1 => {
                let (key, value) = map.iter().next().ok_or_else(|| {
                    Error::invalid_filter("tags", "expected a single-key mapping")
                })?;
                let value = expect_str("tags", value)?;
                Ok(TagFilter::KeyValue(key.clone(), value))
            }
            other => Err(Error::invalid_filter(
                "tags",
                format!("unsupported tag entry {}", other),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enabled_must_be_boolean() {
        let err = MonitorFilter::from_value(&json!({"enabled": "true"})).unwrap_err();
        assert!(matches!(err, Error::InvalidFilterParameter { ref key, .. } if key == "enabled"));
    }

    #[test]
    fn test_shape_errors() {
        for bad in [
            json!({"tags": "env"}),
            json!({"tags": [1.5]}),
            json!({"tags": [{"a": "1", "b": "2"}]}),
            json!({"location": 7}),
            json!({"type": ["HTTP"]}),
            json!({"assignedApps": "APPLICATION-1"}),
            json!({"managementZone": "123"}),
            json!({"credentialId": false}),
            json!({"credentialOwner": null}),
            json!(["enabled"]),
        ] {
            assert!(
                matches!(
                    MonitorFilter::from_value(&bad),
                    Err(Error::InvalidFilterParameter { .. })
                ),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let filter = MonitorFilter::from_value(&json!({"colour": "blue"})).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.apply("https://t/api"), "https://t/api");
    }

    #[test]
    fn test_query_order_and_rendering() {
        let filter = MonitorFilter::from_value(&json!({
            "credentialOwner": "ops",
            "managementZone": 42,
            "enabled": false,
            "type": "HTTP",
            "location": "GEOLOCATION-1",
            "assignedApps": ["APPLICATION-1", "APPLICATION-2"],
            "credentialId": "CREDENTIALS_VAULT-1",
            "tags": ["critical", 7, {"env": "prod"}]
        }))
        .unwrap();
        assert_eq!(
            filter.to_query(),
            "tag=critical&tag=7&tag=env%3Aprod&location=GEOLOCATION-1&type=HTTP&enabled=false\
             &assignedApps=APPLICATION-1&assignedApps=APPLICATION-2&managementZone=42\
             &credentialId=CREDENTIALS_VAULT-1&credentialOwner=ops"
        );
    }

    #[test]
    fn test_builder_matches_parsed() {
        let built = MonitorFilter::new()
            .tag("critical")
            .tag_value("env", "prod")
            .enabled(true);
        let parsed =
            MonitorFilter::from_value(&json!({"tags": ["critical", {"env": "prod"}], "enabled": true}))
                .unwrap();
        assert_eq!(built, parsed);
        assert_eq!(
            built.apply("https://t/api"),
            "https://t/api?tag=critical&tag=env%3Aprod&enabled=true"
        );
    }
}
