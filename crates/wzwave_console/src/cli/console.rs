use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use wzwave_config::ConsoleConfig;
use wzwave_controller::ZWaveController;

use crate::cli::command::{CommandDescriptor, CommandTable};
use crate::cli::commands::get_all_commands;
use crate::cli::dispatcher::{DispatchOutcome, Dispatcher};
use crate::cli::shutdown::{ShutdownController, ShutdownCoordinator};
use crate::error::ConsoleError;
use crate::event_sink::EventSink;
use crate::input::{LineReader, ReadOutcome};
use crate::output::Terminal;

pub const BANNER: &str = "WZWaveConsole starting up...";
pub const READY: &str = "WZWaveConsole console ready.";

const DEFAULT_PROMPT: &str = "> ";
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Interactive console driving a [`ZWaveController`].
pub struct Console {
    dispatcher: Dispatcher,
    terminal: Terminal,
    shutdown: Arc<ShutdownController>,
    prompt: String,
    shutdown_timeout: Option<Duration>,
}

impl Console {
    /// Creates a console with the built-in `help`, `quit` and `start` commands.
    pub fn new(controller: Arc<dyn ZWaveController>, terminal: Terminal) -> Self {
        let mut commands = CommandTable::new();
        for command in get_all_commands() {
            let registered = commands.register(command);
            debug_assert!(registered.is_ok(), "built-in command registered twice");
        }

        let shutdown = ShutdownController::new();
        Self {
            dispatcher: Dispatcher::new(
                commands,
                controller,
                shutdown.clone(),
                terminal.out.clone(),
            ),
            terminal,
            shutdown,
            prompt: DEFAULT_PROMPT.to_string(),
            shutdown_timeout: Some(DEFAULT_SHUTDOWN_TIMEOUT),
        }
    }

    pub fn with_config(mut self, config: &ConsoleConfig) -> Self {
        self.prompt = config.prompt.clone();
        self.shutdown_timeout = config.shutdown_timeout;
        self
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), ConsoleError> {
        self.dispatcher.register(descriptor)
    }

    pub fn commands(&self) -> &CommandTable {
        self.dispatcher.commands()
    }

    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        self.shutdown.clone()
    }

    /// Listener that renders controller events on this console's terminal.
    pub fn event_sink(&self) -> EventSink {
        EventSink::new(self.terminal.clone())
    }

    /// Parses one input line and dispatches it. Blank lines are ignored.
    pub async fn process_line(&self, line: &str) -> DispatchOutcome {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        self.dispatcher.dispatch(&tokens).await
    }

    /// Runs the read-dispatch loop until the termination flag is set or the
    /// input ends.
    pub async fn run(&self, input: &mut LineReader) {
        self.terminal.out.print(BANNER);
        self.terminal.out.line(READY);

        let mut shutdown_rx = self.shutdown.subscribe();
        while !self.shutdown.is_shutdown_triggered() {
            self.terminal.out.print(&format!("\r{}", self.prompt));

            match input.read_line(&mut shutdown_rx).await {
                ReadOutcome::Line(line) => {
                    self.process_line(&line).await;
                }
                ReadOutcome::Undecodable(e) => {
                    self.terminal
                        .out
                        .line(format!("Exception in command execution: {}", e));
                }
                ReadOutcome::Closed => {
                    debug!("Console input closed");
                    break;
                }
            }
        }

        debug!("Console loop finished");
    }

    /// Spawns the loop on its own task, reading from `reader`. Must be called
    /// from within a tokio runtime.
    pub fn start<R>(self, reader: R) -> io::Result<ShutdownCoordinator>
    where
        R: BufRead + Send + 'static,
    {
        let (mut input, closer) = LineReader::spawn(reader)?;
        let reads = input.read_counter();
        let shutdown = self.shutdown.clone();
        let join_timeout = self.shutdown_timeout;
        let in_flight = self.dispatcher.in_flight();

        let loop_task = tokio::spawn(async move {
            self.run(&mut input).await;
        });

        Ok(ShutdownCoordinator::new(
            shutdown,
            closer,
            loop_task,
            in_flight,
            join_timeout,
            reads,
        ))
    }
}
