use std::io::{BufRead, BufReader};

use tokio::sync::oneshot;

/// Resolves when the operator asks the server to stop: Ctrl-C, or a line
/// (usually just Enter) typed on stdin.
pub async fn operator_signal() {
    let enter = watch_for_line(BufReader::new(std::io::stdin()));

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }

        _ = line_entered(enter) => {}
    }
}

/// Reads one line from `reader` on a plain OS thread.
///
/// Blocking reads cannot be cancelled. The thread is detached and never
/// joined, so it cannot hold up runtime shutdown the way `tokio::io::stdin`
/// does. The sender is dropped unsent when input ends without a line.
pub fn watch_for_line<R>(reader: R) -> oneshot::Receiver<()>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    std::thread::spawn(move || {
        let mut reader = reader;
        let mut line = String::new();

        match reader.read_line(&mut line) {
            Ok(n) if n > 0 => {
                let _ = tx.send(());
            }
            _ => {}
        }
    });

    rx
}

/// Resolves once a line arrives. No terminal attached (input closed or
/// unreadable) means it never resolves and Ctrl-C is the only trigger.
pub async fn line_entered(rx: oneshot::Receiver<()>) {
    if rx.await.is_err() {
        std::future::pending::<()>().await;
    }
}
