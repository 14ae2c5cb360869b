use serde_json::{Value, json};

/// Composes the stable fallback payload returned instead of an error when
/// upstream resolution fails or yields nothing.
///
/// The shape is identical regardless of cause - `items` and `tracks` are
/// always present and empty, `fallback` is always `true` - so consumers
/// check one flag instead of special-casing transport failures. Keys in
/// `extra` are merged in and override the base shape.
pub fn fallback_response(message: &str, extra: Value) -> Value {
    let mut body = json!({
        "items": [],
        "tracks": [],
        "message": message,
        "fallback": true,
    });

    if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }

    body
}
