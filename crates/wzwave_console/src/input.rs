//! Blocking line input driven one request at a time.
//!
//! Reading happens on a dedicated std thread so the console task can wait on
//! a read, a close request and the shutdown notification at the same time.
//! A read is only issued when the console asks for one, so nothing is read
//! after the console stops asking.

use std::io::{self, BufRead};
use std::string::FromUtf8Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tokio::sync::{mpsc, watch};
use tracing::debug;

type ReadReply = io::Result<Option<Vec<u8>>>;

#[derive(Debug)]
pub enum ReadOutcome {
    Line(String),
    /// The line was read but is not valid UTF-8.
    Undecodable(FromUtf8Error),
    /// End of stream, read error, input closed or shutdown requested.
    Closed,
}

pub struct LineReader {
    requests: mpsc::Sender<()>,
    replies: mpsc::Receiver<ReadReply>,
    closed: watch::Receiver<bool>,
    reads: Arc<AtomicUsize>,
    in_flight: bool,
}

/// Closes a [`LineReader`]; a read in progress resolves as [`ReadOutcome::Closed`].
#[derive(Clone)]
pub struct InputCloser {
    tx: Arc<watch::Sender<bool>>,
}

impl InputCloser {
    pub fn close(&self) {
        self.tx.send_replace(true);
    }
}

impl LineReader {
    /// Moves `reader` onto a `console-input` thread.
    ///
    /// A std thread rather than `spawn_blocking`: the runtime waits for
    /// blocking tasks on shutdown, and a read on stdin may never return.
    pub fn spawn<R>(mut reader: R) -> io::Result<(Self, InputCloser)>
    where
        R: BufRead + Send + 'static,
    {
        let (request_tx, mut request_rx) = mpsc::channel::<()>(1);
        let (reply_tx, reply_rx) = mpsc::channel::<ReadReply>(1);
        let (closed_tx, closed_rx) = watch::channel(false);
        let reads = Arc::new(AtomicUsize::new(0));

        let counter = reads.clone();
        thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || {
                while request_rx.blocking_recv().is_some() {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let reply = read_one_line(&mut reader);
                    if reply_tx.blocking_send(reply).is_err() {
                        break;
                    }
                }
                debug!("Console input thread exiting");
            })?;

        Ok((
            Self {
                requests: request_tx,
                replies: reply_rx,
                closed: closed_rx,
                reads,
                in_flight: false,
            },
            InputCloser {
                tx: Arc::new(closed_tx),
            },
        ))
    }

    /// Number of reads issued against the underlying reader so far.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }

    /// Requests one line and waits for it, for the input to be closed, or for
    /// `shutdown` to flip to `true`, whichever happens first.
    pub async fn read_line(&mut self, shutdown: &mut watch::Receiver<bool>) -> ReadOutcome {
        if *self.closed.borrow() || *shutdown.borrow() {
            return ReadOutcome::Closed;
        }
        // A read abandoned by an earlier close is still owed a reply; wait for
        // that one instead of queueing another.
        if !self.in_flight {
            if self.requests.send(()).await.is_err() {
                return ReadOutcome::Closed;
            }
            self.in_flight = true;
        }

        let reply = tokio::select! {
            biased;
            _ = flag_set(&mut self.closed) => return ReadOutcome::Closed,
            _ = flag_set(shutdown) => return ReadOutcome::Closed,
            reply = self.replies.recv() => reply,
        };
        self.in_flight = false;

        match reply {
            Some(Ok(Some(bytes))) => match String::from_utf8(bytes) {
                Ok(line) => ReadOutcome::Line(line),
                Err(e) => ReadOutcome::Undecodable(e),
            },
            Some(Ok(None)) | None => ReadOutcome::Closed,
            Some(Err(e)) => {
                debug!("Console input read failed: {}", e);
                ReadOutcome::Closed
            }
        }
    }
}

fn read_one_line<R: BufRead>(reader: &mut R) -> ReadReply {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(buf))
}

/// Resolves once the watched flag is `true`; never resolves if the sender is
/// dropped before that.
async fn flag_set(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|set| *set).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn never_shutdown() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    #[tokio::test]
    async fn test_reads_lines_until_end_of_stream() {
        let (mut reader, _closer) = LineReader::spawn(Cursor::new("help\r\nquit\n")).unwrap();
        let (_tx, mut shutdown) = never_shutdown();

        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Line(l) if l == "help"));
        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Line(l) if l == "quit"));
        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Closed));
        assert_eq!(reader.read_counter().load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_reported_not_fatal() {
        let (mut reader, _closer) =
            LineReader::spawn(Cursor::new(b"\xff\xfe\nhelp\n".to_vec())).unwrap();
        let (_tx, mut shutdown) = never_shutdown();

        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Undecodable(_)));
        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Line(l) if l == "help"));
    }

    #[tokio::test]
    async fn test_closed_reader_issues_no_reads() {
        let (mut reader, closer) = LineReader::spawn(Cursor::new("help\n")).unwrap();
        let (_tx, mut shutdown) = never_shutdown();

        closer.close();

        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Closed));
        assert_eq!(reader.read_counter().load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_flag_short_circuits() {
        let (mut reader, _closer) = LineReader::spawn(Cursor::new("help\n")).unwrap();
        let (tx, mut shutdown) = never_shutdown();

        tx.send_replace(true);

        assert!(matches!(reader.read_line(&mut shutdown).await, ReadOutcome::Closed));
        assert_eq!(reader.read_counter().load(Ordering::SeqCst), 0);
    }
}
