use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property holding the url of the page the event was captured on
pub const CURRENT_URL: &str = "$current_url";
/// Property map of user properties to set on every event
pub const SET: &str = "$set";
/// Property map of user properties only set if not already present
pub const SET_ONCE: &str = "$set_once";
/// Prefix applied to keys mirrored into ['SET_ONCE']
pub const INITIAL_PREFIX: &str = "initial_";

/// An analytics event as handed over by the host pipeline. The event is
/// kept as the raw json object so every field the host sends (uuid,
/// timestamp, team id, a null or non-object `properties`) serializes back
/// exactly as it came in. Only an object `properties` is interpreted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginEvent {
    fields: Map<String, Value>,
}

impl PluginEvent {
    /// Event name e.g. `$pageview`
    pub fn event(&self) -> Option<&str> {
        self.fields.get("event").and_then(Value::as_str)
    }

    /// The property map, `None` when missing or not an object
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.fields.get("properties").and_then(Value::as_object)
    }

    pub fn properties_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.fields.get_mut("properties").and_then(Value::as_object_mut)
    }

    /// Returns the current page url if one is set.
    ///
    /// Returns `Ok(None)` when the property is missing or falsy (null, false,
    /// zero or an empty string), `Err` when it is set to anything other than a string
    pub fn current_url(&self) -> Result<Option<&str>> {
        let value = match self.properties().and_then(|p| p.get(CURRENT_URL)) {
            Some(value) if is_truthy(value) => value,
            _ => return Ok(None),
        };

        match value.as_str() {
            Some(url) => Ok(Some(url)),
            None => bail!("{} is not a string: {}", CURRENT_URL, value),
        }
    }
}

/// Loose truthiness of a json property value, mirroring how event
/// properties are treated by the analytics platform
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
