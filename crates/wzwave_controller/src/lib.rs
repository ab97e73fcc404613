//! Interface to a Z-Wave controller as seen by the console.
//!
//! The console only needs two things from a controller: a way to start the
//! network and a way to subscribe to its lifecycle events. Everything else
//! (serial framing, node model, transactions) stays behind [`ZWaveController`].

mod controller;
mod error;
mod event;
mod listener;
mod node;
mod simulated;

pub use controller::ZWaveController;
pub use error::ControllerError;
pub use event::{ControllerEvent, TransactionStartedEvent};
pub use listener::{ControllerListener, ListenerSet};
pub use node::{NodeInfo, ZWaveEndpoint};
pub use simulated::{SimulatedController, SimulatedControllerConfig};
