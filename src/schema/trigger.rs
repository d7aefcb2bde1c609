/// Animation-pattern triggers: the timed events of the output document.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A timed event that fires a set of actions in the animation pattern.
///
/// Only the fields this crate writes are typed. Everything else the template
/// carries (start/end actions, flags) passes through in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "startTime", default, deserialize_with = "time_field")]
    pub start_time: String,
    #[serde(rename = "endTime", default, deserialize_with = "time_field")]
    pub end_time: String,
    #[serde(
        rename = "transitionActions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transition_actions: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trigger {
    /// Build a trigger from `template`, replacing its name, window and
    /// transition actions. The template itself is left as it was.
    pub fn from_template(
        template: &Trigger,
        display_name: &str,
        start: f64,
        end: f64,
        transition_actions: Vec<Value>,
    ) -> Trigger {
        Trigger {
            display_name: display_name.to_string(),
            start_time: format_time(start),
            end_time: format_time(end),
            transition_actions: Some(transition_actions),
            extra: template.extra.clone(),
        }
    }
}

/// Format seconds the way the animation pattern stores times: the shortest
/// decimal that round-trips, with no trailing `.0`.
pub fn format_time(seconds: f64) -> String {
    format!("{}", seconds)
}

/// Accept a time written either as a string or as a bare number.
fn time_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n
            .as_f64()
            .map(format_time)
            .unwrap_or_else(|| n.to_string())),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a time string or number, found {}",
            other
        ))),
    }
}
