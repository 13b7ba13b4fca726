use crate::common::{ApiCommand, ApiEvent, ContentPayload, VersionChoice};

use super::chat_state::ChatState;
use super::document_state::DocumentViewerState;

/// Document the shell is resolving before it mounts the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDocument {
    pub document_id: i64,
    pub version: Option<i64>,
}

/// Local UI state of the window.
#[derive(Default)]
pub struct AppState {
    pub viewer: DocumentViewerState,
    pub chat: ChatState,
    pub pending_document: Option<PendingDocument>,
    pub document_input: String,
    pub version_input: String,
    pub employee_input: String,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the top-bar document fields. A blank version means "current".
    pub fn parse_document_request(&self) -> Option<PendingDocument> {
        let document_id = self.document_input.trim().parse().ok()?;
        let version = match self.version_input.trim() {
            "" => None,
            raw => Some(raw.parse().ok()?),
        };
        Some(PendingDocument {
            document_id,
            version,
        })
    }

    pub fn parse_employee(&self) -> Option<i64> {
        self.employee_input.trim().parse().ok()
    }

    /// Same document: re-mount the viewer directly. Otherwise resolve the
    /// document reference first and mount once it arrives.
    pub fn request_document(&mut self, request: PendingDocument) -> Vec<ApiCommand> {
        let open = self
            .viewer
            .document
            .clone()
            .filter(|document| document.id == request.document_id);

        if let Some(document) = open {
            self.pending_document = None;
            return self.viewer.open(document, request.version);
        }

        self.pending_document = Some(request);
        vec![ApiCommand::FetchContent {
            document_id: request.document_id,
            choice: VersionChoice::Current,
        }]
    }

    /// Routes a document result. The answer to a pending resolution mounts
    /// the viewer; everything else goes to the viewer as-is.
    pub fn route_document_event(&mut self, event: ApiEvent) -> Vec<ApiCommand> {
        let resolves_pending = matches!(
            (&self.pending_document, &event),
            (
                Some(pending),
                ApiEvent::ContentLoaded {
                    document_id,
                    requested: VersionChoice::Current,
                    ..
                },
            ) if pending.document_id == *document_id
        );
        if !resolves_pending {
            self.viewer.apply(event);
            return Vec::new();
        }

        let (Some(pending), ApiEvent::ContentLoaded { payload, .. }) =
            (self.pending_document.take(), event)
        else {
            return Vec::new();
        };
        match payload {
            ContentPayload::Current(document) => {
                self.viewer.open_fetched(document, pending.version)
            }
            _ => {
                self.viewer.show_missing(pending.document_id);
                Vec::new()
            }
        }
    }
}
