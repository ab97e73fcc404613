use tracing::debug;
use wzwave_controller::{ControllerEvent, ControllerListener};

use crate::output::{Terminal, cause_lines};

/// Renders controller events on the console as they arrive, from whichever
/// thread the controller reports on.
#[derive(Clone)]
pub struct EventSink {
    terminal: Terminal,
}

impl EventSink {
    pub fn new(terminal: Terminal) -> Self {
        Self { terminal }
    }
}

impl ControllerListener for EventSink {
    fn on_event(&self, event: &ControllerEvent) {
        match event {
            ControllerEvent::ConnectionFailure(cause) => {
                let mut lines = vec![format!("Connection failure: {}", cause)];
                lines.extend(cause_lines(cause.as_ref()));
                self.terminal.err.lines(lines);
            }
            ControllerEvent::TransactionStarted(transaction) => {
                debug!(transaction = transaction.id(), "Transaction started");
            }
            other => {
                if let Some(message) = render_event(other) {
                    self.terminal.out.line(message);
                }
            }
        }
    }
}

/// Console line for an event, or `None` for events that are not printed.
pub fn render_event(event: &ControllerEvent) -> Option<String> {
    let message = match event {
        ControllerEvent::NodeAdded(node) => format!("Node added: {}", node),
        ControllerEvent::NodeUpdated(node) => format!("Node updated: {}", node),
        ControllerEvent::ConnectionFailure(cause) => format!("Connection failure: {}", cause),
        ControllerEvent::ControllerInfo {
            library_version,
            home_id,
            node_id,
        } => format!(
            "Controller info - library version: {}, home id: {}, node id: {}",
            library_version, home_id, node_id
        ),
        ControllerEvent::InclusionStarted => "Inclusion started".to_string(),
        ControllerEvent::Inclusion { node_info, success } => {
            format!("Inclusion - node info: {}, success: {}", node_info, success)
        }
        ControllerEvent::InclusionStopped => "Inclusion stopped".to_string(),
        ControllerEvent::ExclusionStarted => "Exclusion started".to_string(),
        ControllerEvent::Exclusion { node_info, success } => {
            format!("Exclusion - node info: {}, success: {}", node_info, success)
        }
        ControllerEvent::ExclusionStopped => "Exclusion stopped".to_string(),
        ControllerEvent::TransactionStarted(_) => return None,
    };
    Some(message)
}
