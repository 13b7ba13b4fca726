use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::common::ApiCommand;

/// Periodic chat-history refresh for one employee.
///
/// Fires once immediately, then every `period`. The task lives exactly as
/// long as this value: dropping it aborts the timer.
pub struct Poller {
    employee_id: i64,
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn spawn(
        runtime: &Handle,
        employee_id: i64,
        period: Duration,
        command_sender: mpsc::Sender<ApiCommand>,
    ) -> Self {
        let handle = runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            log::debug!("Chat polling started for employee {employee_id} ({period:?})");

            loop {
                ticker.tick().await;
                if command_sender
                    .send(ApiCommand::FetchChats { employee_id })
                    .await
                    .is_err()
                {
                    log::debug!("Command channel closed; polling for {employee_id} ends");
                    break;
                }
            }
        });

        Self {
            employee_id,
            handle,
        }
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        log::debug!("Chat polling stopped for employee {}", self.employee_id);
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_every_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let _poller = Poller::spawn(&Handle::current(), 42, Duration::from_secs(5), tx);

        let start = tokio::time::Instant::now();

        assert_eq!(
            rx.recv().await,
            Some(ApiCommand::FetchChats { employee_id: 42 })
        );
        assert!(start.elapsed() < Duration::from_secs(1));

        assert_eq!(
            rx.recv().await,
            Some(ApiCommand::FetchChats { employee_id: 42 })
        );
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_stops_the_timer() {
        let (tx, mut rx) = mpsc::channel(8);
        let poller = Poller::spawn(&Handle::current(), 7, Duration::from_secs(5), tx);
        assert!(rx.recv().await.is_some());

        drop(poller);
        tokio::time::sleep(Duration::from_secs(20)).await;

        // The aborted task released its sender, so the channel is closed and empty.
        assert_eq!(rx.recv().await, None);
    }
}
