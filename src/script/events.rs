//! Browser script events
//!
//! Each event document carries a `type` discriminator. It selects one of six
//! variants, and each variant keeps only the fields that were present in the
//! input, `null` values included, so writing an event back yields the same
//! document.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{present, Nullable};
use crate::error::{Error, Result};

/// Load a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateEvent {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wait: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub validate: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Value>,
}

/// Click or tap on an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub button: Nullable<u32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wait: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub validate: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

/// Run a JavaScript snippet in the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaScriptEvent {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub java_script: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wait: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

/// Pick options of a `<select>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptionEvent {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub selections: Nullable<Vec<Value>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wait: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub validate: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

/// Set cookies before the next step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieEvent {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cookies: Nullable<Vec<Value>>,
}

/// Type text into an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokesEvent {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub text_value: Nullable<String>,
    /// Hide the typed text in results
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub masked: Nullable<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub simulate_blur_event: Nullable<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub wait: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub validate: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

/// Discriminator of an interaction event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionKind {
    #[default]
    Click,
    Tap,
}

/// A step of a browser script
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    Navigate(NavigateEvent),
    Interaction(InteractionKind, InteractionEvent),
    JavaScript(JavaScriptEvent),
    SelectOption(SelectOptionEvent),
    Cookie(CookieEvent),
    Keystrokes(KeystrokesEvent),
}

impl BrowserEvent {
    /// Classify an event document by its `type` field
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => return Err(Error::UnknownEventType(other.to_string())),
            None => return Err(Error::UnknownEventType("<missing>".to_string())),
        };

        let event = match kind.as_str() {
            "navigate" => Self::Navigate(serde_json::from_value(value)?),
            "click" => Self::Interaction(InteractionKind::Click, serde_json::from_value(value)?),
            "tap" => Self::Interaction(InteractionKind::Tap, serde_json::from_value(value)?),
            "javascript" => Self::JavaScript(serde_json::from_value(value)?),
            "selectOption" => Self::SelectOption(serde_json::from_value(value)?),
            "cookie" => Self::Cookie(serde_json::from_value(value)?),
            "keystrokes" => Self::Keystrokes(serde_json::from_value(value)?),
            _ => return Err(Error::UnknownEventType(kind)),
        };
        Ok(event)
    }

    /// The `type` discriminator written for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "navigate",
            Self::Interaction(InteractionKind::Click, _) => "click",
            Self::Interaction(InteractionKind::Tap, _) => "tap",
            Self::JavaScript(_) => "javascript",
            Self::SelectOption(_) => "selectOption",
            Self::Cookie(_) => "cookie",
            Self::Keystrokes(_) => "keystrokes",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Navigate(e) => flat(&e.description),
            Self::Interaction(_, e) => flat(&e.description),
            Self::JavaScript(e) => flat(&e.description),
            Self::SelectOption(e) => flat(&e.description),
            Self::Cookie(e) => flat(&e.description),
            Self::Keystrokes(e) => flat(&e.description),
        }
    }

    /// Event document with exactly the fields that are set
    pub fn data(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn flat(field: &Nullable<String>) -> Option<&str> {
    field.as_ref().and_then(|value| value.as_deref())
}

/// Event fields with the discriminator in front
#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    event: &'a T,
}

impl Serialize for BrowserEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let kind = self.event_type();
        match self {
            Self::Navigate(event) => Tagged { kind, event }.serialize(serializer),
            Self::Interaction(_, event) => Tagged { kind, event }.serialize(serializer),
            Self::JavaScript(event) => Tagged { kind, event }.serialize(serializer),
            Self::SelectOption(event) => Tagged { kind, event }.serialize(serializer),
            Self::Cookie(event) => Tagged { kind, event }.serialize(serializer),
            Self::Keystrokes(event) => Tagged { kind, event }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BrowserEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
