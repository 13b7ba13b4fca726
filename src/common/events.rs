use super::commands::VersionChoice;
use super::types::{ChatMessage, Document, DocumentVersion, VersionSummary};

/// What came back for a content fetch.
#[derive(Debug, Clone)]
pub enum ContentPayload {
    Current(Document),
    Historical(DocumentVersion),
    /// The backend answered but had nothing to show.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailure {
    /// Non-2xx answer; carries the backend `detail`.
    Rejected(String),
    Network,
}

/// Results the network task reports back to the UI.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    ContentLoaded {
        document_id: i64,
        requested: VersionChoice,
        payload: ContentPayload,
    },
    VersionsLoaded {
        document_id: i64,
        versions: Vec<VersionSummary>,
    },
    ChatsLoaded {
        employee_id: i64,
        messages: Vec<ChatMessage>,
    },
    ChatSent {
        employee_id: i64,
    },
    ChatSendFailed {
        employee_id: i64,
        failure: SendFailure,
    },
}
