use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::Value;
use tracing::info;

use crate::{
    error::AppError,
    models::{CreateFeedback, NewFeedback},
};

pub fn validate_feedback(payload: CreateFeedback) -> Result<NewFeedback, AppError> {
    let name = required(payload.name)?;
    let feedback = required(payload.feedback)?;

    let (Some(name), Some(feedback)) = (name, feedback) else {
        return Err(AppError::MissingFields);
    };

    Ok(NewFeedback::new(name, feedback))
}

/// Text of a field, `None` when absent, blank or falsy (`null`, `false`, `0`).
/// Numbers and `true` are stored as their JSON text, arrays and objects are malformed.
fn required(value: Option<Value>) -> Result<Option<String>, AppError> {
    let text = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s,
        Some(Value::Array(_) | Value::Object(_)) => return Err(AppError::MalformedPayload),
    };

    let text = text.trim();

    Ok((!text.is_empty()).then(|| text.to_string()))
}

pub async fn log_request(request: Request, next: Next) -> Response {
    info!("{} request to {}", request.method(), request.uri());

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(name: Option<Value>, feedback: Option<Value>) -> CreateFeedback {
        CreateFeedback { name, feedback }
    }

    fn text(value: &str) -> Option<Value> {
        Some(Value::String(value.to_string()))
    }

    #[test]
    fn trims_both_fields() {
        let new_feedback =
            validate_feedback(payload(text("  Alice Test "), text("\tEnd-to-End verified!\n")))
                .unwrap();

        assert_eq!(new_feedback.name, "Alice Test");
        assert_eq!(new_feedback.feedback, "End-to-End verified!");
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let cases = [
            payload(None, None),
            payload(text("Alice"), None),
            payload(None, text("text")),
            payload(text(""), text("text")),
            payload(text("Alice"), text("")),
            payload(text("   "), text("text")),
            payload(text("Alice"), text("   ")),
            payload(Some(Value::Null), text("text")),
            payload(Some(json!(false)), text("text")),
            payload(text("Alice"), Some(json!(0))),
        ];

        for case in cases {
            assert!(matches!(validate_feedback(case), Err(AppError::MissingFields)));
        }
    }

    #[test]
    fn scalars_are_stored_as_text() {
        let new_feedback =
            validate_feedback(payload(Some(json!(42)), Some(json!(true)))).unwrap();

        assert_eq!(new_feedback.name, "42");
        assert_eq!(new_feedback.feedback, "true");

        let new_feedback = validate_feedback(payload(Some(json!(2.5)), text("ok"))).unwrap();
        assert_eq!(new_feedback.name, "2.5");
    }

    #[test]
    fn structured_values_are_malformed() {
        let cases = [
            payload(Some(json!({ "first": "Alice" })), text("text")),
            payload(text("Alice"), Some(json!(["a", "b"]))),
        ];

        for case in cases {
            assert!(matches!(validate_feedback(case), Err(AppError::MalformedPayload)));
        }
    }
}
