//! Built-in console commands.

mod help;
mod quit;
mod start;

use crate::cli::command::CommandDescriptor;

pub fn get_all_commands() -> Vec<CommandDescriptor> {
    vec![help::descriptor(), quit::descriptor(), start::descriptor()]
}
