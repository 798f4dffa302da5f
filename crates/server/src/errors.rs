use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// JSON error envelope: `{"error": <title>, "detail": <message or field list>}`.
/// 404s deliberately bypass this type and go out as empty-body status codes.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<serde_json::Value>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail: detail.map(serde_json::Value::String) }
    }

    /// 422 with a `[{"field": ..., "error": ...}]` detail list.
    pub fn validation(errors: Vec<serde_json::Value>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            title: "Validation Error",
            detail: Some(serde_json::Value::Array(errors)),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.title });
        if let Some(detail) = self.detail {
            body["detail"] = detail;
        }
        (self.status, Json(body)).into_response()
    }
}
