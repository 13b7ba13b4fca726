use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::common::{ChatMessage, Document, DocumentVersion, SendChatRequest, VersionSummary};

pub const SEND_CHAT_PATH: &str = "/api/chats/send";

pub fn document_path(document_id: i64) -> String {
    format!("/api/shared-drive/files/{document_id}")
}

pub fn version_path(document_id: i64, version_number: i64) -> String {
    format!("/api/shared-drive/files/{document_id}/versions/{version_number}")
}

pub fn versions_path(document_id: i64) -> String {
    format!("/api/shared-drive/files/{document_id}/versions")
}

pub fn chats_path(employee_id: i64) -> String {
    format!("/api/employees/{employee_id}/chats")
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend answered {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Backend answered with an empty body")]
    Empty,

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No backend route for {0}")]
    InvalidRoute(String),
}

/// Backend REST surface used by both widgets.
#[async_trait]
pub trait OfficeApi: Send + Sync {
    async fn current_document(&self, document_id: i64) -> Result<Document, ApiError>;

    async fn document_version(
        &self,
        document_id: i64,
        version_number: i64,
    ) -> Result<DocumentVersion, ApiError>;

    async fn list_versions(&self, document_id: i64) -> Result<Vec<VersionSummary>, ApiError>;

    async fn employee_chats(&self, employee_id: i64) -> Result<Vec<ChatMessage>, ApiError>;

    async fn send_chat(&self, request: &SendChatRequest) -> Result<(), ApiError>;
}

/// Decodes a successful response. A blank body, `null` or `{}` is
/// [`ApiError::Empty`] rather than a decode failure.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::Empty);
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    let empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if empty {
        return Err(ApiError::Empty);
    }

    Ok(serde_json::from_value(value)?)
}

/// Pulls `detail` out of an error body. Non-string details (validation
/// lists) are shown as JSON.
pub fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        Some(serde_json::Value::Null) | None => "Unknown error".to_string(),
        Some(serde_json::Value::String(_)) => "Unknown error".to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(document_path(1), "/api/shared-drive/files/1");
        assert_eq!(versions_path(1), "/api/shared-drive/files/1/versions");
        assert_eq!(version_path(1, 2), "/api/shared-drive/files/1/versions/2");
        assert_eq!(chats_path(42), "/api/employees/42/chats");
    }

    #[test]
    fn blank_success_bodies_are_empty() {
        for body in ["", "  \n", "null", "{}"] {
            let result = parse_body::<Document>(body);
            assert!(matches!(result, Err(ApiError::Empty)), "body {body:?}");
        }
    }

    #[test]
    fn broken_json_is_a_decode_error() {
        assert!(matches!(
            parse_body::<Document>("{\"id\": "),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            parse_body::<Document>(r#"{"file_name": "a.docx"}"#),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn document_body_is_decoded() {
        let document: Document =
            parse_body(r#"{"id": 4, "current_version": 2, "content_html": "<p>x</p>"}"#).unwrap();
        assert_eq!(document.id, 4);
        assert_eq!(document.body().unwrap().as_str(), "<p>x</p>");

        let versions: Vec<VersionSummary> = parse_body("[]").unwrap();
        assert!(versions.is_empty());
    }

    #[test]
    fn detail_is_extracted() {
        assert_eq!(error_detail(r#"{"detail": "Employee is busy"}"#), "Employee is busy");
    }

    #[test]
    fn detail_falls_back_to_unknown_error() {
        assert_eq!(error_detail(""), "Unknown error");
        assert_eq!(error_detail("<html>502</html>"), "Unknown error");
        assert_eq!(error_detail(r#"{"error": "x"}"#), "Unknown error");
        assert_eq!(error_detail(r#"{"detail": null}"#), "Unknown error");
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let detail = error_detail(r#"{"detail": [{"msg": "field required"}]}"#);
        assert!(detail.contains("field required"));
    }
}
