use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of office file behind a shared-drive document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Word,
    Spreadsheet,
    Powerpoint,
    #[default]
    #[serde(other)]
    Other,
}

impl FileType {
    pub fn icon(self) -> &'static str {
        match self {
            FileType::Word => "📄",
            FileType::Spreadsheet => "📊",
            FileType::Powerpoint => "📽️",
            FileType::Other => "📄",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileType::Word => "Word Document",
            FileType::Spreadsheet => "Excel Spreadsheet",
            FileType::Powerpoint => "PowerPoint Presentation",
            FileType::Other => "Document",
        }
    }

    /// Fixed layout applied to the content container.
    pub fn theme(self) -> ContentTheme {
        match self {
            FileType::Word => ContentTheme {
                max_width: 816.0,
                padding: 72.0,
                font: ContentFont::Serif,
            },
            FileType::Spreadsheet => ContentTheme {
                max_width: 1200.0,
                padding: 16.0,
                font: ContentFont::Monospace,
            },
            FileType::Powerpoint => ContentTheme {
                max_width: 960.0,
                padding: 40.0,
                font: ContentFont::Sans,
            },
            FileType::Other => ContentTheme {
                max_width: 900.0,
                padding: 32.0,
                font: ContentFont::Sans,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFont {
    Serif,
    Sans,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTheme {
    pub max_width: f32,
    pub padding: f32,
    pub font: ContentFont,
}

/// Markup produced by the backend. Rendered as-is: the backend is the only
/// place allowed to sanitize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn from_backend(markup: String) -> Self {
        Self(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Current state of a shared-drive document, as returned by
/// `GET /api/shared-drive/files/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default)]
    pub current_version: i64,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub updated_by_name: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

impl Document {
    pub fn body(&self) -> Option<TrustedHtml> {
        usable_body(&self.content_html, &self.html)
    }
}

/// One immutable historical snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentVersion {
    pub id: i64,
    pub version_number: i64,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub change_summary: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentVersion {
    pub fn body(&self) -> Option<TrustedHtml> {
        usable_body(&self.content_html, &self.html)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionSummary {
    pub id: i64,
    pub version_number: i64,
    #[serde(default)]
    pub change_summary: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

fn usable_body(content_html: &Option<String>, html: &Option<String>) -> Option<TrustedHtml> {
    [content_html, html]
        .into_iter()
        .flatten()
        .find(|markup| !markup.trim().is_empty())
        .map(|markup| TrustedHtml::from_backend(markup.clone()))
}

/// A chat message exchanged with an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    #[serde(default)]
    pub sender_id: Option<i64>,
    #[serde(default)]
    pub sender_name: String,
    pub message: String,
    #[serde(deserialize_with = "timestamp::required")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Messages without a sender id (or id 0), or signed "You", were sent
    /// from this client.
    pub fn is_from_you(&self) -> bool {
        matches!(self.sender_id, None | Some(0)) || self.sender_name == "You"
    }
}

/// Body of `POST /api/chats/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendChatRequest {
    pub employee_id: i64,
    pub message: String,
}

/// The backend emits RFC 3339 as well as naive ISO timestamps (UTC).
mod timestamp {
    use super::*;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_file_type_falls_back_to_other() {
        let doc: Document =
            serde_json::from_str(r#"{"id": 3, "file_type": "pdf", "current_version": 1}"#).unwrap();
        assert_eq!(doc.file_type, FileType::Other);
        assert_eq!(doc.file_type.label(), "Document");
        assert_eq!(doc.file_type.icon(), "📄");
    }

    #[test]
    fn file_type_labels() {
        assert_eq!(FileType::Word.label(), "Word Document");
        assert_eq!(FileType::Spreadsheet.icon(), "📊");
        assert_eq!(FileType::Spreadsheet.label(), "Excel Spreadsheet");
        assert_eq!(FileType::Powerpoint.icon(), "📽️");
        assert_eq!(FileType::Powerpoint.label(), "PowerPoint Presentation");
    }

    #[test]
    fn themes_differ_per_file_type() {
        assert_eq!(FileType::Word.theme().font, ContentFont::Serif);
        assert_eq!(FileType::Spreadsheet.theme().font, ContentFont::Monospace);
        assert!(FileType::Spreadsheet.theme().max_width > FileType::Word.theme().max_width);
    }

    #[test]
    fn body_prefers_content_html_then_html() {
        let mut doc = Document {
            content_html: Some("<p>a</p>".into()),
            html: Some("<p>b</p>".into()),
            ..Default::default()
        };
        assert_eq!(doc.body().unwrap().as_str(), "<p>a</p>");

        doc.content_html = Some("   ".into());
        assert_eq!(doc.body().unwrap().as_str(), "<p>b</p>");

        doc.html = None;
        assert!(doc.body().is_none());
    }

    #[test]
    fn version_body_reads_html_alias() {
        let version: DocumentVersion = serde_json::from_str(
            r#"{"id": 9, "version_number": 2, "html": "<h1>v2</h1>", "created_at": null}"#,
        )
        .unwrap();
        assert_eq!(version.body().unwrap().as_str(), "<h1>v2</h1>");
        assert!(version.created_at.is_none());
    }

    #[test]
    fn parses_naive_and_rfc3339_timestamps() {
        let naive: ChatMessage = serde_json::from_str(
            r#"{"id": 1, "sender_id": 4, "sender_name": "Ada", "message": "hi", "timestamp": "2024-05-01T10:00:00.123456"}"#,
        )
        .unwrap();
        let zoned: ChatMessage = serde_json::from_str(
            r#"{"id": 2, "sender_id": null, "sender_name": "You", "message": "yo", "timestamp": "2024-05-01T12:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(
            naive.timestamp.format("%H:%M:%S").to_string(),
            "10:00:00"
        );
        assert_eq!(zoned.timestamp.format("%H:%M").to_string(), "10:00");
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        let result: Result<ChatMessage, _> = serde_json::from_str(
            r#"{"id": 1, "message": "hi", "timestamp": "yesterday"}"#,
        );
        assert!(result.is_err());
    }

    fn message(sender_id: Option<i64>, sender_name: &str) -> ChatMessage {
        ChatMessage {
            id: 1,
            sender_id,
            sender_name: sender_name.into(),
            message: "hello".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn classifies_own_messages() {
        assert!(message(None, "Alice").is_from_you());
        assert!(message(Some(0), "Alice").is_from_you());
        assert!(message(Some(12), "You").is_from_you());
        assert!(!message(Some(12), "you").is_from_you());
        assert!(!message(Some(12), "Alice").is_from_you());
    }
}
