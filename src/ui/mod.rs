pub mod app;
pub mod chat_state;
pub mod components;
pub mod document_state;
pub mod format;
pub mod html_layout;
pub mod state;

pub use app::OfficeApp;
