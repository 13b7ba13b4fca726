pub mod api;
pub mod client;
pub mod http;
pub mod poller;

pub use client::ApiClient;
pub use http::HttpOfficeApi;
pub use poller::Poller;
