// [libs/infra/cracker-session/src/tailer.rs]
//! Polling follow-reader for the cracker's `.hcout` file.
//!
//! Not built on a file-change-notify API: the outfile and zap files are
//! both plain regular files on local disk, so a periodic re-read of the
//! appended tail is sufficient and keeps this crate dependency-light.

use std::path::PathBuf;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio::sync::{mpsc, oneshot};

use agent_cracker_proto::decode_crack_line;
use agent_domain_models::CrackResult;

use crate::events::SessionEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs until `stop` resolves. Reads whatever bytes have been appended
/// to `path` since the last poll, splits complete lines, decodes each
/// as a crack line, and forwards successes on `events`. A line that
/// fails to decode is dropped with a logged warning — never taken as a
/// reason to stop tailing.
pub async fn run(
    path: PathBuf,
    events: mpsc::Sender<SessionEvent>,
    mut stop: oneshot::Receiver<()>,
) -> std::io::Result<()> {
    let mut file = File::open(&path).await?;
    let mut offset: u64 = 0;
    let mut pending = String::new();

    loop {
        let new_len = file.metadata().await?.len();
        if new_len > offset {
            file.seek(SeekFrom::Start(offset)).await?;
            let mut buf = Vec::with_capacity((new_len - offset) as usize);
            file.read_to_end(&mut buf).await?;
            offset = new_len;

            pending.push_str(&String::from_utf8_lossy(&buf));
            while let Some(idx) = pending.find('\n') {
                let line: String = pending.drain(..=idx).collect();
                let line = line.trim_end_matches(['\r', '\n']);
                if line.is_empty() {
                    continue;
                }
                deliver_line(line, &events).await;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = &mut stop => {
                drain_remaining(&mut file, &mut pending, &events).await?;
                return Ok(());
            }
        }
    }
}

async fn drain_remaining(
    file: &mut File,
    pending: &mut String,
    events: &mpsc::Sender<SessionEvent>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await?;
    pending.push_str(&String::from_utf8_lossy(&buf));
    for line in pending.split('\n') {
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            deliver_line(line, events).await;
        }
    }
    Ok(())
}

async fn deliver_line(line: &str, events: &mpsc::Sender<SessionEvent>) {
    match decode_crack_line(line) {
        Ok(result) => {
            let _ = events.send(SessionEvent::Crack(result)).await;
        }
        Err(warning) => {
            tracing::warn!(?warning, line, "dropping malformed crack line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn tails_appended_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.hcout");
        std::fs::write(&path, b"").unwrap();

        let (events_tx, mut events_rx) = mpsc::channel(5);
        let (stop_tx, stop_rx) = oneshot::channel();

        let tail_path = path.clone();
        let handle = tokio::spawn(run(tail_path, events_tx, stop_rx));

        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "1700000000:abc123:616263").unwrap();
        drop(f);

        let event = tokio::time::timeout(Duration::from_secs(2), events_rx.recv())
            .await
            .expect("event delivered before timeout")
            .expect("channel open");

        match event {
            SessionEvent::Crack(result) => {
                assert_eq!(result.hash, "abc123");
                assert_eq!(result.plaintext, "abc");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
