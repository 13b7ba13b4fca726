use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent, ChatMessage, SendChatRequest, SendFailure};
use crate::network::Poller;

pub const NETWORK_FAILURE_ALERT: &str = "Failed to send message. Please check your connection and try again.";

/// State of the employee chat widget.
#[derive(Default)]
pub struct ChatState {
    pub employee_id: Option<i64>,
    /// Ascending by timestamp.
    pub messages: Vec<ChatMessage>,
    pub input_text: String,
    pub sending: bool,
    /// Set after each successful fetch; cleared once the view scrolled.
    pub scroll_to_latest: bool,
    /// Blocking alert shown until dismissed.
    pub alert: Option<String>,
    poller: Option<Poller>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the widget to `employee_id` and (re)starts polling. The previous
    /// poller is stopped before the new one starts.
    pub fn mount(
        &mut self,
        employee_id: i64,
        runtime: &Handle,
        period: Duration,
        command_sender: mpsc::Sender<ApiCommand>,
    ) {
        let already_polling = self
            .poller
            .as_ref()
            .is_some_and(|poller| poller.employee_id() == employee_id && poller.is_running());
        if already_polling {
            return;
        }

        self.poller = None;
        self.employee_id = Some(employee_id);
        self.poller = Some(Poller::spawn(runtime, employee_id, period, command_sender));
        log::info!("Chat mounted for employee {employee_id}");
    }

    /// Stops polling and forgets the thread. The alert survives so a
    /// failure is still acknowledged.
    pub fn unmount(&mut self) {
        if self.poller.take().is_some() {
            log::info!("Chat unmounted");
        }
        self.employee_id = None;
        self.messages.clear();
        self.input_text.clear();
        self.sending = false;
        self.scroll_to_latest = false;
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    pub fn can_send(&self) -> bool {
        !self.sending && self.employee_id.is_some() && !self.input_text.trim().is_empty()
    }

    /// Starts a send of the trimmed input. The input stays as typed until the
    /// backend accepts the message.
    pub fn submit(&mut self) -> Option<ApiCommand> {
        if !self.can_send() {
            return None;
        }
        let employee_id = self.employee_id?;
        self.sending = true;

        Some(ApiCommand::SendChat(SendChatRequest {
            employee_id,
            message: self.input_text.trim().to_string(),
        }))
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Applies a network result; may ask for a follow-up fetch.
    pub fn apply(&mut self, event: ApiEvent) -> Option<ApiCommand> {
        match event {
            ApiEvent::ChatsLoaded { .. } | ApiEvent::ChatSent { .. }
                if self.employee_id.is_none() =>
            {
                log::debug!("Chat closed, dropping {event:?}");
                None
            }
            ApiEvent::ChatsLoaded {
                employee_id,
                mut messages,
            } => {
                messages.sort_by_key(|message| message.timestamp);
                log::debug!(
                    "Loaded {} messages for employee {employee_id}",
                    messages.len()
                );
                self.messages = messages;
                self.scroll_to_latest = true;
                None
            }
            ApiEvent::ChatSent { employee_id } => {
                self.sending = false;
                self.input_text.clear();
                Some(ApiCommand::FetchChats { employee_id })
            }
            ApiEvent::ChatSendFailed { failure, .. } => {
                self.sending = false;
                self.alert = Some(match failure {
                    SendFailure::Rejected(detail) => format!("Failed to send message: {detail}"),
                    SendFailure::Network => NETWORK_FAILURE_ALERT.to_string(),
                });
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn message(id: i64, minute: u32) -> ChatMessage {
        ChatMessage {
            id,
            sender_id: Some(3),
            sender_name: "Bob".into(),
            message: format!("message {id}"),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap(),
        }
    }

    fn mounted_without_poller(employee_id: i64) -> ChatState {
        ChatState {
            employee_id: Some(employee_id),
            ..ChatState::new()
        }
    }

    #[test]
    fn messages_are_displayed_oldest_first() {
        let mut chat = mounted_without_poller(1);
        chat.apply(ApiEvent::ChatsLoaded {
            employee_id: 1,
            messages: vec![message(3, 30), message(1, 10), message(2, 20)],
        });

        let ids: Vec<i64> = chat.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(chat.scroll_to_latest);
    }

    #[test]
    fn blank_input_never_sends() {
        let mut chat = mounted_without_poller(7);
        for input in ["", "   ", "\n\t "] {
            chat.input_text = input.to_string();
            assert!(!chat.can_send());
            assert!(chat.submit().is_none());
            assert!(!chat.sending);
        }
    }

    #[test]
    fn sending_posts_trimmed_message_once() {
        let mut chat = mounted_without_poller(7);
        chat.input_text = "  Hello ".into();

        assert_eq!(
            chat.submit(),
            Some(ApiCommand::SendChat(SendChatRequest {
                employee_id: 7,
                message: "Hello".into(),
            }))
        );
        assert!(chat.sending);
        assert!(chat.submit().is_none(), "no second send while in flight");
    }

    #[test]
    fn successful_send_clears_input_and_refetches() {
        let mut chat = mounted_without_poller(7);
        chat.input_text = "Hello".into();
        chat.submit();

        let follow_up = chat.apply(ApiEvent::ChatSent { employee_id: 7 });
        assert_eq!(follow_up, Some(ApiCommand::FetchChats { employee_id: 7 }));
        assert_eq!(chat.input_text, "");
        assert!(!chat.sending);
        assert!(chat.messages.is_empty(), "no optimistic insert");
    }

    #[test]
    fn rejected_send_alerts_with_server_detail() {
        let mut chat = mounted_without_poller(7);
        chat.input_text = "Hello".into();
        chat.submit();

        let follow_up = chat.apply(ApiEvent::ChatSendFailed {
            employee_id: 7,
            failure: SendFailure::Rejected("Unknown error".into()),
        });
        assert!(follow_up.is_none());
        assert_eq!(
            chat.alert.as_deref(),
            Some("Failed to send message: Unknown error")
        );
        assert_eq!(chat.input_text, "Hello");
        assert!(!chat.sending);

        chat.dismiss_alert();
        assert!(chat.alert.is_none());
    }

    #[test]
    fn network_failure_alerts_with_retry_prompt() {
        let mut chat = mounted_without_poller(7);
        chat.input_text = "Hello".into();
        chat.submit();

        chat.apply(ApiEvent::ChatSendFailed {
            employee_id: 7,
            failure: SendFailure::Network,
        });
        assert_eq!(chat.alert.as_deref(), Some(NETWORK_FAILURE_ALERT));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_history_still_polls_every_five_seconds() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut chat = ChatState::new();
        chat.mount(42, &Handle::current(), Duration::from_secs(5), tx);

        assert_eq!(
            rx.recv().await,
            Some(ApiCommand::FetchChats { employee_id: 42 })
        );
        chat.apply(ApiEvent::ChatsLoaded {
            employee_id: 42,
            messages: Vec::new(),
        });
        assert!(chat.messages.is_empty());

        let start = tokio::time::Instant::now();
        assert_eq!(
            rx.recv().await,
            Some(ApiCommand::FetchChats { employee_id: 42 })
        );
        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn remounting_same_employee_keeps_one_poller() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut chat = ChatState::new();
        chat.mount(42, &Handle::current(), Duration::from_secs(5), tx.clone());
        chat.mount(42, &Handle::current(), Duration::from_secs(5), tx.clone());
        drop(tx);

        tokio::time::sleep(Duration::from_millis(12_500)).await;
        let mut fetches = 0;
        while rx.try_recv().is_ok() {
            fetches += 1;
        }
        // Ticks at 0s, 5s and 10s from a single timer.
        assert_eq!(fetches, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_employee_replaces_the_poller() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut chat = ChatState::new();
        chat.mount(1, &Handle::current(), Duration::from_secs(5), tx.clone());
        assert_eq!(rx.recv().await, Some(ApiCommand::FetchChats { employee_id: 1 }));

        chat.mount(2, &Handle::current(), Duration::from_secs(5), tx);
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        let mut seen = Vec::new();
        while let Ok(command) = rx.try_recv() {
            seen.push(command);
        }
        assert_eq!(seen.len(), 3);
        assert!(
            seen.iter()
                .all(|command| *command == ApiCommand::FetchChats { employee_id: 2 })
        );
        assert_eq!(chat.employee_id, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_chat_cannot_send() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut chat = ChatState::new();
        chat.mount(9, &Handle::current(), Duration::from_secs(5), tx);
        assert!(rx.recv().await.is_some());
        chat.apply(ApiEvent::ChatsLoaded {
            employee_id: 9,
            messages: vec![message(1, 10)],
        });
        chat.input_text = "draft".into();

        chat.unmount();
        assert_eq!(chat.employee_id, None);
        assert!(chat.messages.is_empty());
        assert_eq!(chat.input_text, "");
        assert!(!chat.scroll_to_latest);

        chat.input_text = "hi".into();
        assert!(!chat.can_send());
        assert!(chat.submit().is_none());
    }

    #[test]
    fn results_after_close_are_dropped() {
        let mut chat = mounted_without_poller(9);
        chat.input_text = "Hello".into();
        chat.submit();
        chat.unmount();

        assert!(chat.apply(ApiEvent::ChatSent { employee_id: 9 }).is_none());
        assert!(!chat.sending);
        assert!(
            chat.apply(ApiEvent::ChatsLoaded {
                employee_id: 9,
                messages: vec![message(1, 10)],
            })
            .is_none()
        );
        assert!(chat.messages.is_empty());
        assert!(!chat.scroll_to_latest);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_stops_polling() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut chat = ChatState::new();
        chat.mount(9, &Handle::current(), Duration::from_secs(5), tx);
        assert!(rx.recv().await.is_some());
        assert!(chat.is_polling());

        chat.unmount();
        assert!(!chat.is_polling());
        assert_eq!(rx.recv().await, None);
    }
}
