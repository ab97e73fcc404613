//! Shutdown coordination for graceful termination

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::cli::dispatcher::InFlightCommand;
use crate::input::InputCloser;

/// The console's termination flag. Once triggered it stays triggered.
#[derive(Debug)]
pub struct ShutdownController {
    triggered: AtomicBool,
    tx: watch::Sender<bool>,
}

impl ShutdownController {
    pub fn new() -> Arc<Self> {
        let (tx, _) = watch::channel(false);
        Arc::new(Self {
            triggered: AtomicBool::new(false),
            tx,
        })
    }

    /// Receiver that flips to `true` when shutdown is triggered.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Sets the flag and wakes every subscriber. Returns `false` if shutdown
    /// was already in progress.
    pub fn trigger_shutdown(&self, reason: &str) -> bool {
        if self.triggered.swap(true, Ordering::SeqCst) {
            debug!("Shutdown already in progress, ignoring additional request");
            return false;
        }

        info!("Initiating shutdown: {}", reason);
        self.tx.send_replace(true);
        true
    }

    pub fn is_shutdown_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The console loop exited on its own.
    Graceful,
    /// The loop did not exit within the join timeout and was aborted.
    Forced,
}

/// Handle to a running console loop, returned by `Console::start`.
///
/// Owns the loop task and the input it reads from, and runs the shutdown
/// sequence: set the flag, close the input, wake the loop, join it. A forced
/// shutdown aborts the loop together with the command it was running.
pub struct ShutdownCoordinator {
    shutdown: Arc<ShutdownController>,
    input: InputCloser,
    loop_task: Option<JoinHandle<()>>,
    in_flight: InFlightCommand,
    join_timeout: Option<Duration>,
    reads: Arc<AtomicUsize>,
}

impl ShutdownCoordinator {
    pub(crate) fn new(
        shutdown: Arc<ShutdownController>,
        input: InputCloser,
        loop_task: JoinHandle<()>,
        in_flight: InFlightCommand,
        join_timeout: Option<Duration>,
        reads: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            shutdown,
            input,
            loop_task: Some(loop_task),
            in_flight,
            join_timeout,
            reads,
        }
    }

    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        self.shutdown.clone()
    }

    /// Lines requested from the input so far.
    pub fn reads_performed(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.loop_task
            .as_ref()
            .is_none_or(|task| task.is_finished())
    }

    /// Waits for the loop to end by itself (`quit` or end of input).
    /// Cancel-safe.
    pub async fn closed(&mut self) {
        if let Some(task) = self.loop_task.as_mut() {
            if let Err(e) = task.await {
                warn!("Console loop ended abnormally: {}", e);
            }
            self.loop_task = None;
        }
    }

    /// Stops the console loop and waits for it to exit.
    pub async fn shutdown(mut self, reason: &str) -> ShutdownOutcome {
        self.shutdown.trigger_shutdown(reason);
        // Resolves a pending read as end of input.
        self.input.close();
        // The loop also watches the flag's channel, which trigger_shutdown
        // has already notified; that covers a read the close did not reach.

        let Some(mut task) = self.loop_task.take() else {
            return ShutdownOutcome::Graceful;
        };

        let Some(limit) = self.join_timeout else {
            if let Err(e) = task.await {
                warn!("Console loop ended abnormally: {}", e);
            }
            return ShutdownOutcome::Graceful;
        };

        match time::timeout(limit, &mut task).await {
            Ok(Ok(())) => {
                debug!("Console loop joined");
                ShutdownOutcome::Graceful
            }
            Ok(Err(e)) => {
                warn!("Console loop ended abnormally: {}", e);
                ShutdownOutcome::Graceful
            }
            Err(_) => {
                warn!(
                    "Console loop did not exit within {:?}, aborting it",
                    limit
                );
                task.abort();
                self.in_flight.abort();
                ShutdownOutcome::Forced
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_terminal_and_idempotent() {
        let controller = ShutdownController::new();
        assert!(!controller.is_shutdown_triggered());

        assert!(controller.trigger_shutdown("first"));
        assert!(!controller.trigger_shutdown("second"));
        assert!(controller.is_shutdown_triggered());
    }

    #[tokio::test]
    async fn test_subscribers_observe_trigger() {
        let controller = ShutdownController::new();
        let mut rx = controller.subscribe();

        let waiter = tokio::spawn(async move { rx.wait_for(|stop| *stop).await.is_ok() });
        controller.trigger_shutdown("test");

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_triggered_state() {
        let controller = ShutdownController::new();
        controller.trigger_shutdown("test");

        assert!(*controller.subscribe().borrow());
    }
}
