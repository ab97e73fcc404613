use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::controller::ZWaveController;
use crate::error::ControllerError;
use crate::event::ControllerEvent;
use crate::listener::{ControllerListener, ListenerSet};
use crate::node::ZWaveEndpoint;

#[derive(Debug, Clone)]
pub struct SimulatedControllerConfig {
    pub serial_port: String,
    pub storage_dir: PathBuf,
    pub library_version: String,
    pub home_id: u32,
    pub node_id: u8,
}

impl Default for SimulatedControllerConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyACM0".to_string(),
            storage_dir: PathBuf::from("./storage"),
            library_version: "Z-Wave 4.05".to_string(),
            home_id: 0xC0FF_EE01,
            node_id: 1,
        }
    }
}

/// In-process controller that behaves like a freshly connected stick:
/// starting it reports the controller info and the controller's own node.
pub struct SimulatedController {
    config: SimulatedControllerConfig,
    listeners: Arc<ListenerSet>,
    start_failure: Mutex<Option<ControllerError>>,
    starts: AtomicUsize,
}

impl SimulatedController {
    pub fn new(config: SimulatedControllerConfig) -> Self {
        Self {
            config,
            listeners: Arc::new(ListenerSet::new()),
            start_failure: Mutex::new(None),
            starts: AtomicUsize::new(0),
        }
    }

    /// Makes the next call to `start` fail with `error`.
    pub fn fail_next_start(&self, error: ControllerError) {
        *self.start_failure.lock() = Some(error);
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers `event` to every listener on the calling thread.
    pub fn emit(&self, event: ControllerEvent) {
        debug!(kind = event.kind(), "Emitting controller event");
        self.listeners.emit(&event);
    }
}

impl Default for SimulatedController {
    fn default() -> Self {
        Self::new(SimulatedControllerConfig::default())
    }
}

#[async_trait]
impl ZWaveController for SimulatedController {
    async fn start(&self) -> Result<(), ControllerError> {
        let failure = self.start_failure.lock().take();
        if let Some(error) = failure {
            return Err(error);
        }

        if self
            .starts
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ControllerError::AlreadyStarted);
        }

        info!(
            serial_port = %self.config.serial_port,
            storage_dir = %self.config.storage_dir.display(),
            "Starting simulated Z-Wave network"
        );

        let listeners = self.listeners.clone();
        let events = vec![
            ControllerEvent::ControllerInfo {
                library_version: self.config.library_version.clone(),
                home_id: self.config.home_id,
                node_id: self.config.node_id,
            },
            ControllerEvent::NodeAdded(ZWaveEndpoint::new(self.config.node_id, "Controller")),
        ];

        // Real controllers report from their I/O threads, not the caller's.
        tokio::spawn(async move {
            for event in &events {
                listeners.emit(event);
            }
        });

        Ok(())
    }

    fn add_listener(&self, listener: Arc<dyn ControllerListener>) {
        self.listeners.add(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_start_fails() {
        let controller = SimulatedController::default();

        controller.start().await.unwrap();
        let err = controller.start().await.unwrap_err();

        assert!(matches!(err, ControllerError::AlreadyStarted));
        assert_eq!(controller.start_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let controller = SimulatedController::default();
        controller.fail_next_start(ControllerError::connection("no such device"));

        let err = controller.start().await.unwrap_err();
        assert_eq!(err.to_string(), "Connection error: no such device");
        assert_eq!(controller.start_count(), 0);

        controller.start().await.unwrap();
        assert_eq!(controller.start_count(), 1);
    }
}
