//! Line-atomic terminal output shared between the console loop and
//! controller event threads.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

/// A cloneable handle to one output stream.
///
/// Every line is written as `"\r" + text + "\n"` so it overwrites a pending
/// prompt. A call to [`ConsoleOutput::lines`] holds the stream for the whole
/// block, so concurrent writers never interleave inside it.
#[derive(Clone)]
pub struct ConsoleOutput {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleOutput {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// In-memory output, mostly useful in tests.
    pub fn memory() -> (Self, OutputBuffer) {
        let buffer = OutputBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    pub fn line(&self, text: impl AsRef<str>) {
        self.lines([text]);
    }

    pub fn lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut writer = self.writer.lock();
        let result = lines
            .into_iter()
            .try_for_each(|line| write!(writer, "\r{}\n", line.as_ref()))
            .and_then(|_| writer.flush());

        if let Err(e) = result {
            warn!("Failed to write console output: {}", e);
        }
    }

    /// Writes `text` as is, without a line prefix or terminator.
    pub fn print(&self, text: &str) {
        let mut writer = self.writer.lock();
        if let Err(e) = writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
        {
            warn!("Failed to write console output: {}", e);
        }
    }
}

/// Standard and error streams of the console.
#[derive(Clone)]
pub struct Terminal {
    pub out: ConsoleOutput,
    pub err: ConsoleOutput,
}

impl Terminal {
    pub fn new(out: ConsoleOutput, err: ConsoleOutput) -> Self {
        Self { out, err }
    }

    pub fn stdio() -> Self {
        Self::new(ConsoleOutput::stdout(), ConsoleOutput::stderr())
    }
}

/// Shared byte buffer behind [`ConsoleOutput::memory`].
#[derive(Clone, Default)]
pub struct OutputBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Completed lines as a terminal would show them: text after the last
    /// carriage return of each line. An unterminated tail (a prompt) is left out.
    pub fn rendered_lines(&self) -> Vec<String> {
        let contents = self.contents();
        let mut lines: Vec<&str> = contents.split('\n').collect();
        lines.pop();

        lines
            .into_iter()
            .map(|line| line.rsplit('\r').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `caused by:` lines for the sources below `error`. A source whose message is
/// already part of the message above it is not repeated.
pub fn cause_lines(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut lines = Vec::new();
    let mut shown = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !shown.contains(&message) {
            lines.push(format!("  caused by: {}", message));
        }
        shown = message;
        source = cause.source();
    }
    lines
}
