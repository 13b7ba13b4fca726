use std::sync::Arc;

use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent, ContentPayload, SendFailure, VersionChoice};

use super::api::{ApiError, OfficeApi};

/// Background task turning UI commands into backend calls.
pub struct ApiClient<A> {
    api: Arc<A>,
    event_sender: mpsc::Sender<ApiEvent>,
    command_receiver: mpsc::Receiver<ApiCommand>,
}

impl<A: OfficeApi + 'static> ApiClient<A> {
    pub fn new(
        api: A,
        event_sender: mpsc::Sender<ApiEvent>,
        command_receiver: mpsc::Receiver<ApiCommand>,
    ) -> Self {
        Self {
            api: Arc::new(api),
            event_sender,
            command_receiver,
        }
    }

    /// Runs until every command sender is gone. Each command gets its own
    /// task so independent fetches overlap.
    pub async fn run(mut self) {
        log::info!("API event loop started");

        while let Some(command) = self.command_receiver.recv().await {
            let api = Arc::clone(&self.api);
            let event_sender = self.event_sender.clone();

            tokio::spawn(async move {
                if let Some(event) = execute(&*api, command).await {
                    if let Err(err) = event_sender.send(event).await {
                        log::warn!("Failed to notify UI: {err}");
                    }
                }
            });
        }

        log::info!("API event loop stopped");
    }
}

/// Performs one command. `None` means the failure was logged and the UI
/// keeps its current state.
pub async fn execute<A: OfficeApi + ?Sized>(api: &A, command: ApiCommand) -> Option<ApiEvent> {
    match command {
        ApiCommand::FetchContent {
            document_id,
            choice,
        } => {
            let result = match choice {
                VersionChoice::Current => api
                    .current_document(document_id)
                    .await
                    .map(ContentPayload::Current),
                VersionChoice::Historical(version_number) => api
                    .document_version(document_id, version_number)
                    .await
                    .map(ContentPayload::Historical),
            };

            let payload = match result {
                Ok(payload) => payload,
                Err(ApiError::Status { status, detail }) => {
                    log::info!(
                        "Document {document_id} ({choice:?}) unavailable: {status} {detail}"
                    );
                    ContentPayload::Missing
                }
                Err(ApiError::Empty) => {
                    log::info!("Document {document_id} ({choice:?}) came back empty");
                    ContentPayload::Missing
                }
                Err(err) => {
                    log::error!("Error fetching document {document_id} ({choice:?}): {err}");
                    return None;
                }
            };

            Some(ApiEvent::ContentLoaded {
                document_id,
                requested: choice,
                payload,
            })
        }
        ApiCommand::FetchVersions { document_id } => match api.list_versions(document_id).await {
            Ok(versions) => Some(ApiEvent::VersionsLoaded {
                document_id,
                versions,
            }),
            Err(err) => {
                log::error!("Error fetching versions of document {document_id}: {err}");
                None
            }
        },
        ApiCommand::FetchChats { employee_id } => match api.employee_chats(employee_id).await {
            Ok(messages) => Some(ApiEvent::ChatsLoaded {
                employee_id,
                messages,
            }),
            Err(err) => {
                log::error!("Error fetching chats for employee {employee_id}: {err}");
                None
            }
        },
        ApiCommand::SendChat(request) => {
            let employee_id = request.employee_id;
            match api.send_chat(&request).await {
                Ok(()) => Some(ApiEvent::ChatSent { employee_id }),
                Err(ApiError::Status { detail, .. }) => Some(ApiEvent::ChatSendFailed {
                    employee_id,
                    failure: SendFailure::Rejected(detail),
                }),
                Err(err) => {
                    log::error!("Error sending message to employee {employee_id}: {err}");
                    Some(ApiEvent::ChatSendFailed {
                        employee_id,
                        failure: SendFailure::Network,
                    })
                }
            }
        }
    }
}
