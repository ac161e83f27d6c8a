use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::input::InputEvent;

/// Forward every parsable line of `reader` as an [`InputEvent`].
///
/// Malformed lines are logged and skipped. Returns once the input is exhausted
/// or the receiving side has gone away.
pub async fn forward_events<R>(reader: R, tx: mpsc::Sender<InputEvent>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        match InputEvent::parse_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring malformed input {:?}: {}", line, e),
        }
    }

    forwarded
}

/// Spawn a task reading JSON-lines events from stdin.
pub fn spawn_stdin_reader(capacity: usize) -> (mpsc::Receiver<InputEvent>, JoinHandle<usize>) {
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let count = forward_events(stdin, tx).await;
        tracing::info!("Input stream closed after {} events", count);
        count
    });
    (rx, handle)
}
