//! Field projection applied to serialized records.

use serde_json::Value;

/// Restrict `record` to the fields named in `select`, plus `always_keep`.
///
/// Non-object values are left untouched; projection only makes sense for
/// serialized entity maps. The record's `id` field always survives so
/// clients can follow up with detail requests.
pub fn project_fields(record: &mut Value, select: &[String], always_keep: &[&str]) {
    let Value::Object(map) = record else {
        return;
    };

    map.retain(|key, _| {
        key == "id"
            || select.iter().any(|field| field == key)
            || always_keep.contains(&key.as_str())
    });
}
