pub mod chat_area;
pub mod chat_panel;
pub mod document_viewer;
pub mod html_view;
pub mod input_bar;
pub mod version_selector;
