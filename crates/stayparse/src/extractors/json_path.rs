// ABOUTME: Defensive key-path resolution inside parsed embedded JSON.
// ABOUTME: Stops early on non-objects and on missing or falsy members.

use serde_json::Value;

/// Returns true for values that count as empty: null, false, 0, "", [] and {}.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Walks `path` key by key starting at `blob`.
///
/// Walking through anything that is not an object yields `None`. A missing
/// key yields `None`; a falsy member ends the walk and is returned as is, so
/// callers must treat every result as "value or nothing".
pub fn resolve<'a, S: AsRef<str>>(blob: Option<&'a Value>, path: &[S]) -> Option<&'a Value> {
    let mut current = blob?;
    for key in path {
        let map = current.as_object()?;
        let next = map.get(key.as_ref())?;
        if is_falsy(next) {
            return Some(next);
        }
        current = next;
    }
    Some(current)
}

/// Like [`resolve`] but drops falsy results.
pub fn resolve_present<'a, S: AsRef<str>>(
    blob: Option<&'a Value>,
    path: &[S],
) -> Option<&'a Value> {
    resolve(blob, path).filter(|v| !is_falsy(v))
}
