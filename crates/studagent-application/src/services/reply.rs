//! Lenient parsing of provider replies
//!
//! Models wrap JSON in code fences or prose. The first JSON value found in
//! the reply is used.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)```").ok());

/// Extract the first JSON object or array from a reply
pub fn extract_json(reply: &str) -> Option<Value> {
    let body = CODE_FENCE
        .as_ref()
        .and_then(|re| re.captures(reply))
        .and_then(|caps| caps.get(1))
        .map_or(reply, |m| m.as_str())
        .trim();

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(value);
    }
    let start = body.find(['{', '['])?;
    serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
}

/// Parse a list reply, accepting a bare array or an object wrapping one
///
/// Wrapped lists are looked up under `keys` first, then under the first
/// array-valued field.
pub fn parse_list<T: DeserializeOwned>(reply: &str, keys: &[&str]) -> Option<Vec<T>> {
    let list = match extract_json(reply)? {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let key = keys
                .iter()
                .find(|k| map.get(**k).is_some_and(Value::is_array))
                .map(|k| (*k).to_string())
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                })?;
            match map.remove(&key) {
                Some(Value::Array(items)) => items,
                _ => return None,
            }
        }
        _ => return None,
    };
    let parsed: Vec<T> = list
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if parsed.is_empty() { None } else { Some(parsed) }
}
