//! Reshape site listings into a name-keyed map.

use serde_json::{Map, Value};

/// Turn an `ok` site-listing envelope into `{ name: site, ... }`.
///
/// Anything that is not a successful envelope passes through untouched:
/// - `None`, `null`, or `{}` yield `None`;
/// - a body without `meta`, or whose `meta` is not exactly `{"rc": "ok"}`,
///   is returned as-is;
/// - an `ok` envelope without `data` is returned as-is.
///
/// Sites without a `name` are dropped. Non-string names are keyed by their
/// JSON text. A `data` value that is not an array yields an empty map.
pub fn reorganize_site_data(data: Option<Value>) -> Option<Value> {
    let mut envelope = match data? {
        Value::Object(map) if !map.is_empty() => map,
        Value::Object(_) | Value::Null => return None,
        other => return Some(other),
    };
    if !envelope.get("meta").is_some_and(is_ok_meta) || !envelope.contains_key("data") {
        return Some(Value::Object(envelope));
    }

    let sites = match envelope.remove("data") {
        Some(Value::Array(sites)) => sites,
        _ => Vec::new(),
    };

    let by_name: Map<String, Value> = sites
        .into_iter()
        .filter_map(|site| {
            let name = match site.get("name")? {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            };
            Some((name, site))
        })
        .collect();

    Some(Value::Object(by_name))
}

fn is_ok_meta(meta: &Value) -> bool {
    meta.as_object()
        .is_some_and(|m| m.len() == 1 && m.get("rc").and_then(Value::as_str) == Some("ok"))
}
