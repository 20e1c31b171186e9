// [libs/infra/cracker-session/src/stdout_reader.rs]
//! The stdout worker: classifies each line as a status object or a
//! diagnostic, and is also responsible for awaiting process exit,
//! draining the tailer, and publishing the wait result.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tokio::sync::{mpsc, oneshot};

use agent_cracker_proto::{classify_stdout_line, StdoutLine};

use crate::events::{SessionDone, SessionEvent};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    stdout: ChildStdout,
    mut child: Child,
    events: mpsc::Sender<SessionEvent>,
    done: oneshot::Sender<SessionDone>,
    tail_stop: oneshot::Sender<()>,
    mut kill_rx: oneshot::Receiver<()>,
    grace_period: Duration,
) {
    let mut lines = BufReader::new(stdout).lines();
    let mut kill_pending = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(text)) => deliver_line(&text, &events).await,
                    Ok(None) => break,
                    Err(error) => {
                        tracing::warn!(%error, "stdout read failed");
                        break;
                    }
                }
            }
            _ = &mut kill_rx, if kill_pending => {
                kill_pending = false;
                let _ = child.start_kill();
            }
        }
    }

    let wait_result = child.wait().await;

    tokio::time::sleep(grace_period).await;
    let _ = tail_stop.send(());

    let outcome = match wait_result {
        Ok(status) => SessionDone::Exited(status),
        Err(error) => SessionDone::WaitFailed(error.to_string()),
    };
    let _ = done.send(outcome);
}

async fn deliver_line(text: &str, events: &mpsc::Sender<SessionEvent>) {
    match classify_stdout_line(text) {
        StdoutLine::Status(status) => {
            let _ = events.send(SessionEvent::Status(status)).await;
        }
        StdoutLine::Diagnostic { message, is_info } => {
            let _ = events
                .send(SessionEvent::Stdout {
                    text: message,
                    is_info,
                })
                .await;
        }
    }
}
