//! Command-line interface module for operator input handling.

pub mod command;
pub mod commands;
pub mod console;
pub mod dispatcher;
pub mod shutdown;

pub use command::{CommandContext, CommandDescriptor, CommandTable};
pub use console::Console;
pub use shutdown::{ShutdownController, ShutdownCoordinator};
