use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinError};
use tracing::{debug, warn};
use wzwave_controller::ZWaveController;

use crate::cli::command::{CommandContext, CommandDescriptor, CommandTable};
use crate::cli::shutdown::ShutdownController;
use crate::error::ConsoleError;
use crate::output::{ConsoleOutput, cause_lines};

pub const UNKNOWN_COMMAND: &str = "Unknown command. Use 'help' command to list available commands.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No tokens; nothing was run.
    Empty,
    Unknown,
    Completed,
    InvalidSyntax,
    /// The handler returned an error.
    Failed,
    /// The handler panicked or was aborted.
    Crashed,
}

/// Abort handle of the handler currently running, shared with whoever has to
/// stop it when the loop is torn down.
#[derive(Clone, Default)]
pub struct InFlightCommand {
    slot: Arc<Mutex<Option<(String, AbortHandle)>>>,
}

impl InFlightCommand {
    fn set(&self, name: &str, handle: AbortHandle) {
        *self.slot.lock() = Some((name.to_string(), handle));
    }

    fn clear(&self) {
        self.slot.lock().take();
    }

    /// Aborts the running handler. Returns `false` if none was running.
    pub fn abort(&self) -> bool {
        let running = self.slot.lock().take();
        match running {
            Some((name, handle)) => {
                warn!(command = %name, "Aborting command still in progress");
                handle.abort();
                true
            }
            None => false,
        }
    }
}

/// Resolves a token sequence against the command table and runs the handler,
/// containing every failure it raises.
pub struct Dispatcher {
    commands: Arc<CommandTable>,
    controller: Arc<dyn ZWaveController>,
    shutdown: Arc<ShutdownController>,
    out: ConsoleOutput,
    in_flight: InFlightCommand,
}

impl Dispatcher {
    pub fn new(
        commands: CommandTable,
        controller: Arc<dyn ZWaveController>,
        shutdown: Arc<ShutdownController>,
        out: ConsoleOutput,
    ) -> Self {
        Self {
            commands: Arc::new(commands),
            controller,
            shutdown,
            out,
            in_flight: InFlightCommand::default(),
        }
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn in_flight(&self) -> InFlightCommand {
        self.in_flight.clone()
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), ConsoleError> {
        Arc::make_mut(&mut self.commands).register(descriptor)
    }

    /// `tokens[0]` is the command name, the rest are its arguments.
    pub async fn dispatch(&self, tokens: &[String]) -> DispatchOutcome {
        let Some((name, args)) = tokens.split_first() else {
            return DispatchOutcome::Empty;
        };

        let Some(command) = self.commands.lookup(name) else {
            self.out.line(UNKNOWN_COMMAND);
            return DispatchOutcome::Unknown;
        };

        debug!(command = command.name(), args = ?args, "Dispatching console command");

        let ctx = CommandContext {
            controller: self.controller.clone(),
            commands: self.commands.clone(),
            shutdown: self.shutdown.clone(),
            out: self.out.clone(),
        };

        // Run on its own task so a panicking handler only takes down that task.
        let task = tokio::spawn(command.execute(ctx, args.to_vec()));
        self.in_flight.set(command.name(), task.abort_handle());
        let result = task.await;
        self.in_flight.clear();

        match result {
            Ok(Ok(true)) => DispatchOutcome::Completed,
            Ok(Ok(false)) => {
                self.out
                    .line(format!("Invalid syntax. Usage: {}", command.syntax()));
                DispatchOutcome::InvalidSyntax
            }
            Ok(Err(e)) => {
                let mut lines = vec![format!("Error executing command: {}", e)];
                lines.extend(cause_lines(&e));
                self.out.lines(lines);
                DispatchOutcome::Failed
            }
            Err(e) => {
                self.out.line(format!(
                    "Exception in command execution: {}",
                    describe_join_error(e)
                ));
                DispatchOutcome::Crashed
            }
        }
    }
}

fn describe_join_error(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    panic_message(error.into_panic())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "command panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::future;
    use std::time::Duration;

    use tokio::time;
    use wzwave_controller::SimulatedController;

    use super::*;
    use crate::cli::command::CommandFuture;

    fn dispatcher(commands: CommandTable) -> (Arc<Dispatcher>, crate::OutputBuffer) {
        let (out, buffer) = ConsoleOutput::memory();
        let dispatcher = Dispatcher::new(
            commands,
            Arc::new(SimulatedController::default()),
            ShutdownController::new(),
            out,
        );
        (Arc::new(dispatcher), buffer)
    }

    #[tokio::test]
    async fn test_nothing_to_abort_when_idle() {
        let (dispatcher, _) = dispatcher(CommandTable::new());

        assert!(!dispatcher.in_flight().abort());
        assert_eq!(dispatcher.dispatch(&[]).await, DispatchOutcome::Empty);
        assert!(!dispatcher.in_flight().abort());
    }

    #[tokio::test]
    async fn test_aborting_in_flight_command_ends_dispatch() {
        let mut commands = CommandTable::new();
        commands
            .register(CommandDescriptor::new("hang", "Never returns.", "hang", |_, _| {
                Box::pin(async {
                    future::pending::<()>().await;
                    Ok::<bool, ConsoleError>(true)
                }) as CommandFuture
            }))
            .unwrap();
        let (dispatcher, buffer) = dispatcher(commands);
        let in_flight = dispatcher.in_flight();

        let running = dispatcher.clone();
        let dispatch = tokio::spawn(async move { running.dispatch(&["hang".to_string()]).await });

        time::timeout(Duration::from_secs(2), async {
            while !in_flight.abort() {
                time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(dispatch.await.unwrap(), DispatchOutcome::Crashed);
        assert!(buffer.rendered_lines()[0].starts_with("Exception in command execution: "));
        assert!(!in_flight.abort());
    }
}
