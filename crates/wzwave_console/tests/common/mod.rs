#![allow(dead_code)]

use std::io::{self, Cursor, Read};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use tokio::time;
use wzwave_console::{Console, ConsoleOutput, OutputBuffer, ShutdownCoordinator, Terminal};
use wzwave_controller::SimulatedController;

pub struct Harness {
    pub controller: Arc<SimulatedController>,
    pub console: Console,
    pub out: OutputBuffer,
    pub err: OutputBuffer,
}

pub fn harness() -> Harness {
    let controller = Arc::new(SimulatedController::default());
    let (out, out_buffer) = ConsoleOutput::memory();
    let (err, err_buffer) = ConsoleOutput::memory();
    let console = Console::new(controller.clone(), Terminal::new(out, err));

    Harness {
        controller,
        console,
        out: out_buffer,
        err: err_buffer,
    }
}

/// Runs `console` over `script` until the loop ends by itself.
pub async fn run_script(console: Console, script: impl Into<Vec<u8>>) -> ShutdownCoordinator {
    let script: Vec<u8> = script.into();
    let mut handle = console
        .start(Cursor::new(script))
        .expect("console should start");
    time::timeout(Duration::from_secs(5), handle.closed())
        .await
        .expect("console loop should finish");
    handle
}

/// Polls `buffer` until one of its lines equals `line`.
pub async fn wait_for_line(buffer: &OutputBuffer, line: &str) -> bool {
    let deadline = time::Instant::now() + Duration::from_secs(2);
    while time::Instant::now() < deadline {
        if buffer.rendered_lines().iter().any(|l| l == line) {
            return true;
        }
        time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Input that blocks until a line is sent, like an idle terminal.
/// End of input once every sender is dropped.
pub struct ChannelInput {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Cursor<Vec<u8>>,
}

impl ChannelInput {
    pub fn new() -> (Self, mpsc::Sender<Vec<u8>>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                rx,
                pending: Cursor::new(Vec::new()),
            },
            tx,
        )
    }
}

impl Read for ChannelInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.pending.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            match self.rx.recv() {
                Ok(bytes) => self.pending = Cursor::new(bytes),
                Err(_) => return Ok(0),
            }
        }
    }
}
