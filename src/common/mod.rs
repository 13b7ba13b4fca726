pub mod commands;
pub mod events;
pub mod types;

pub use commands::{ApiCommand, VersionChoice};
pub use events::{ApiEvent, ContentPayload, SendFailure};
pub use types::{
    ChatMessage, ContentFont, ContentTheme, Document, DocumentVersion, SendChatRequest,
    TrustedHtml, VersionSummary,
};
