use super::types::SendChatRequest;

/// Which content the document viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionChoice {
    #[default]
    Current,
    Historical(i64),
}

impl VersionChoice {
    pub fn is_historical(self) -> bool {
        matches!(self, VersionChoice::Historical(_))
    }
}

/// Requests the UI hands to the network task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// Fetch current content (`Current`) or one historical version.
    FetchContent {
        document_id: i64,
        choice: VersionChoice,
    },
    FetchVersions {
        document_id: i64,
    },
    FetchChats {
        employee_id: i64,
    },
    SendChat(SendChatRequest),
}
