use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use wzwave_controller::ZWaveController;

use crate::cli::shutdown::ShutdownController;
use crate::error::{CommandError, ConsoleError};
use crate::output::ConsoleOutput;

/// Resolves to `Ok(true)` on success and `Ok(false)` when the arguments do
/// not match the command's syntax.
pub type CommandFuture = Pin<Box<dyn Future<Output = Result<bool, CommandError>> + Send>>;

type CommandHandler = Arc<dyn Fn(CommandContext, Vec<String>) -> CommandFuture + Send + Sync>;

/// What a handler can reach while it runs.
#[derive(Clone)]
pub struct CommandContext {
    pub controller: Arc<dyn ZWaveController>,
    pub commands: Arc<CommandTable>,
    pub shutdown: Arc<ShutdownController>,
    pub out: ConsoleOutput,
}

#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    syntax: String,
    handler: CommandHandler,
}

impl CommandDescriptor {
    pub fn new<F>(name: &str, description: &str, syntax: &str, handler: F) -> Self
    where
        F: Fn(CommandContext, Vec<String>) -> CommandFuture + Send + Sync + 'static,
    {
        Self {
            name: name.to_lowercase(),
            description: description.to_string(),
            syntax: syntax.to_string(),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn syntax(&self) -> &str {
        &self.syntax
    }

    /// Runs the handler with `args`, which exclude the command name itself.
    pub fn execute(&self, ctx: CommandContext, args: Vec<String>) -> CommandFuture {
        (self.handler)(ctx, args)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}

/// Registered commands keyed by lowercased name, kept in name order.
#[derive(Clone, Default, Debug)]
pub struct CommandTable {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), ConsoleError> {
        if self.commands.contains_key(descriptor.name()) {
            return Err(ConsoleError::DuplicateCommand(descriptor.name().to_string()));
        }
        self.commands.insert(descriptor.name().to_string(), descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(&name.to_lowercase())
    }

    /// `(name, description)` pairs in alphabetical order.
    pub fn list_sorted(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.commands
            .values()
            .map(|cmd| (cmd.name(), cmd.description()))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> CommandDescriptor {
        CommandDescriptor::new(name, &format!("{} command", name), name, |_, _| {
            Box::pin(async { Ok::<_, ConsoleError>(true) }) as CommandFuture
        })
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut table = CommandTable::new();
        table.register(noop("quit")).unwrap();

        assert_eq!(table.lookup("QUIT").unwrap().name(), "quit");
        assert_eq!(table.lookup("Quit").unwrap().name(), "quit");
        assert!(table.lookup("quitt").is_none());
    }

    #[test]
    fn test_names_are_normalized_on_register() {
        let mut table = CommandTable::new();
        table.register(noop("NetStart")).unwrap();

        assert_eq!(table.lookup("netstart").unwrap().name(), "netstart");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut table = CommandTable::new();
        table.register(noop("help")).unwrap();

        let err = table.register(noop("HELP")).unwrap_err();
        assert!(matches!(err, ConsoleError::DuplicateCommand(name) if name == "help"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_listing_is_sorted_regardless_of_registration_order() {
        let mut table = CommandTable::new();
        for name in ["start", "quit", "help", "exclude", "include"] {
            table.register(noop(name)).unwrap();
        }

        let names: Vec<&str> = table.list_sorted().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["exclude", "help", "include", "quit", "start"]);

        // The listing can be walked again.
        assert_eq!(table.list_sorted().count(), 5);
    }
}
