use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ControllerError;
use crate::listener::ControllerListener;

#[async_trait]
pub trait ZWaveController: Send + Sync {
    /// Opens the connection to the controller hardware and starts the network.
    async fn start(&self) -> Result<(), ControllerError>;

    /// Registers a listener for lifecycle events. Listeners may be invoked
    /// from any thread the controller uses internally.
    fn add_listener(&self, listener: Arc<dyn ControllerListener>);
}
