//! Tests for the operator stop trigger

use std::io::{BufRead, Cursor, Read};
use std::sync::mpsc;
use std::time::Duration;

use docserve::server::shutdown::{line_entered, watch_for_line};

/// A reader that blocks until the test lets it go.
struct Gate(mpsc::Receiver<Vec<u8>>, Cursor<Vec<u8>>);

impl Read for Gate {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.fill_buf()?;
        self.1.read(buf)
    }
}

impl BufRead for Gate {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        if self.1.position() as usize >= self.1.get_ref().len() {
            // Sender dropped means end of input.
            let next = self.0.recv().unwrap_or_default();
            self.1 = Cursor::new(next);
        }
        self.1.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.1.consume(amt);
    }
}

#[tokio::test]
async fn test_enter_triggers_shutdown() {
    let rx = watch_for_line(Cursor::new(b"\n".to_vec()));

    tokio::time::timeout(Duration::from_secs(2), line_entered(rx))
        .await
        .expect("a typed line should trigger shutdown");
}

#[tokio::test]
async fn test_any_line_triggers_shutdown() {
    let rx = watch_for_line(Cursor::new(b"quit\n".to_vec()));
    assert!(rx.await.is_ok());
}

#[tokio::test]
async fn test_closed_input_never_triggers() {
    let rx = watch_for_line(Cursor::new(Vec::new()));

    let result = tokio::time::timeout(Duration::from_millis(100), line_entered(rx)).await;
    assert!(result.is_err(), "closed input must not stop the server");
}

#[tokio::test]
async fn test_pending_read_does_not_block_caller() {
    let (feed, gate) = mpsc::channel();
    let rx = watch_for_line(Gate(gate, Cursor::new(Vec::new())));

    // Nothing typed yet: the trigger stays pending, and dropping it returns
    // right away even though the reader thread is still blocked.
    let waited = tokio::time::timeout(Duration::from_millis(50), line_entered(rx)).await;
    assert!(waited.is_err());

    feed.send(b"\n".to_vec()).unwrap();
}
