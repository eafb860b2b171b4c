//! Classification of response bodies at the backend boundary.
//!
//! The backend sometimes answers `200 OK` with a body that describes a
//! failure. [`classify`] turns such bodies into a [`PayloadError`] before
//! anything tries to deserialize them, so callers only ever see a structural
//! `Result`.
//!
//! A body is error-shaped when any of these hold:
//! - its `status` is `"error"`, `"Error"`, `400` or `500`
//! - it carries a non-empty `errors` collection
//! - its `title` mentions `"validation errors"`

use serde_json::{Map, Value};

pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadErrorKind {
    /// The body reported an error status.
    Failed,
    /// The body carried field-level validation errors.
    Validation,
}

/// A logical failure reported inside a successful HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PayloadError {
    pub kind: PayloadErrorKind,
    pub message: String,
}

/// Pass a body through untouched, or reject it if it is error-shaped.
pub fn classify(body: Value) -> Result<Value, PayloadError> {
    match detect(&body) {
        Some(kind) => Err(PayloadError {
            kind,
            message: error_message(&body),
        }),
        None => Ok(body),
    }
}

fn detect(body: &Value) -> Option<PayloadErrorKind> {
    let object = body.as_object()?;

    let has_errors = object.get("errors").is_some_and(|errors| match errors {
        Value::Object(map) => !map.is_empty(),
        Value::Array(list) => !list.is_empty(),
        _ => false,
    });
    let validation_title = object
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|title| title.contains("validation errors"));
    if has_errors || validation_title {
        return Some(PayloadErrorKind::Validation);
    }

    object
        .get("status")
        .is_some_and(is_error_status)
        .then_some(PayloadErrorKind::Failed)
}

fn is_error_status(status: &Value) -> bool {
    match status {
        Value::String(s) => s == "error" || s == "Error",
        Value::Number(n) => matches!(n.as_u64(), Some(400 | 500)),
        _ => false,
    }
}

/// Best message for an error-shaped body: the flattened `errors`, then
/// `message`, then `title`, then a generic fallback.
pub fn error_message(body: &Value) -> String {
    if let Some(errors) = body.get("errors") {
        let mut messages = Vec::new();
        flatten_into(errors, &mut messages);
        if !messages.is_empty() {
            return messages.join(", ");
        }
    }
    body_message(body).unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

/// The `message` or `title` of a body, if it has a non-empty one.
pub fn body_message(body: &Value) -> Option<String> {
    ["message", "title"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
    })
}

fn flatten_into(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) if !text.is_empty() => out.push(text.clone()),
        Value::Array(items) => {
            items.iter().for_each(|item| flatten_into(item, out))
        }
        Value::Object(map) => flatten_map(map, out),
        Value::Number(_) | Value::Bool(_) => out.push(value.to_string()),
        _ => {}
    }
}

fn flatten_map(map: &Map<String, Value>, out: &mut Vec<String>) {
    for value in map.values() {
        flatten_into(value, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ordinary_bodies_pass_through() {
        let body = json!({ "payload": { "status": "error" } });
        assert_eq!(classify(body.clone()), Ok(body));

        let body = json!({ "payload": [1, 2, 3], "status": 200 });
        assert_eq!(classify(body.clone()), Ok(body));

        let body = json!({ "payload": null, "errors": {} });
        assert_eq!(classify(body.clone()), Ok(body));

        assert_eq!(classify(json!([1, 2])), Ok(json!([1, 2])));
    }

    #[test]
    fn error_status_is_detected() {
        for status in [json!("error"), json!("Error"), json!(400), json!(500)]
        {
            let body = json!({ "status": status, "message": "boom" });
            let err = classify(body).unwrap_err();
            assert_eq!(err.kind, PayloadErrorKind::Failed);
            assert_eq!(err.message, "boom");
        }
        assert!(classify(json!({ "status": "ERROR" })).is_ok());
        assert!(classify(json!({ "status": 404 })).is_ok());
    }

    #[test]
    fn validation_errors_are_flattened() {
        let body = json!({
            "title": "One or more validation errors occurred.",
            "errors": {
                "Email": ["Email is required"],
                "Password": ["Too short", "Needs a digit"]
            }
        });
        let err = classify(body).unwrap_err();
        assert_eq!(err.kind, PayloadErrorKind::Validation);
        assert_eq!(err.message, "Email is required, Too short, Needs a digit");
    }

    #[test]
    fn validation_title_alone_uses_title() {
        let body = json!({
            "title": "One or more validation errors occurred.",
            "status": 400
        });
        let err = classify(body).unwrap_err();
        assert_eq!(err.kind, PayloadErrorKind::Validation);
        assert_eq!(err.message, "One or more validation errors occurred.");
    }

    #[test]
    fn message_falls_back_to_default() {
        let err = classify(json!({ "status": "error" })).unwrap_err();
        assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);

        let err =
            classify(json!({ "status": 500, "message": "  " })).unwrap_err();
        assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
    }
}
