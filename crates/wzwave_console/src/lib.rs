//! WZWave console - an interactive command line for a Z-Wave controller.
//!
//! The console reads commands from a line-oriented input on its own task,
//! dispatches them against a [`CommandTable`], and renders asynchronous
//! controller events through an [`EventSink`] without disturbing the prompt.

pub mod cli;
pub mod error;
pub mod event_sink;
pub mod input;
pub mod output;
pub mod telemetry;

pub use cli::command::{CommandContext, CommandDescriptor, CommandFuture, CommandTable};
pub use cli::console::Console;
pub use cli::dispatcher::{DispatchOutcome, Dispatcher, InFlightCommand};
pub use cli::shutdown::{ShutdownController, ShutdownCoordinator, ShutdownOutcome};
pub use error::{CommandError, ConsoleError, Result};
pub use event_sink::EventSink;
pub use output::{ConsoleOutput, OutputBuffer, Terminal};
