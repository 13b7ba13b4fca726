use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::common::{ChatMessage, Document, DocumentVersion, SendChatRequest, VersionSummary};
use crate::config::BackendRoutes;

use super::api::{
    ApiError, OfficeApi, SEND_CHAT_PATH, chats_path, document_path, error_detail, parse_body,
    version_path, versions_path,
};

/// reqwest-backed implementation of [`OfficeApi`]. Single attempt per call,
/// no retries.
#[derive(Clone)]
pub struct HttpOfficeApi {
    client: Client,
    routes: BackendRoutes,
}

impl HttpOfficeApi {
    pub fn new(routes: BackendRoutes, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, routes })
    }

    fn url(&self, path: &str) -> Result<String, ApiError> {
        self.routes
            .resolve(path)
            .ok_or_else(|| ApiError::InvalidRoute(path.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        log::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        parse_body(&body)
    }
}

#[async_trait]
impl OfficeApi for HttpOfficeApi {
    async fn current_document(&self, document_id: i64) -> Result<Document, ApiError> {
        self.get_json(&document_path(document_id)).await
    }

    async fn document_version(
        &self,
        document_id: i64,
        version_number: i64,
    ) -> Result<DocumentVersion, ApiError> {
        self.get_json(&version_path(document_id, version_number))
            .await
    }

    async fn list_versions(&self, document_id: i64) -> Result<Vec<VersionSummary>, ApiError> {
        self.get_json(&versions_path(document_id)).await
    }

    async fn employee_chats(&self, employee_id: i64) -> Result<Vec<ChatMessage>, ApiError> {
        self.get_json(&chats_path(employee_id)).await
    }

    async fn send_chat(&self, request: &SendChatRequest) -> Result<(), ApiError> {
        let url = self.url(SEND_CHAT_PATH)?;
        log::debug!("POST {url} for employee {}", request.employee_id);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }
}
