// [libs/infra/cracker-session/src/session.rs]
//! Construction, start, kill, and cleanup of one cracker child process.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

use agent_attack_params::{to_command_args, to_restore_args};
use agent_domain_models::{AttackMode, AttackParams};

use crate::errors::SessionError;
use crate::events::{SessionDone, SessionEvent};
use crate::{stdout_reader, tailer};

const EVENT_CHANNEL_CAPACITY: usize = 5;
const DRAIN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Paths owned by one session, needed for cleanup.
#[derive(Debug, Clone)]
struct SessionPaths {
    out_file: PathBuf,
    charset_files: Vec<PathBuf>,
    restore_file: Option<PathBuf>,
    zap_dir: PathBuf,
    retain_zaps_on_completion: bool,
}

/// A constructed, not-yet-started cracker session.
pub struct CrackerSession {
    id: String,
    argv: Vec<String>,
    binary_path: PathBuf,
    paths: SessionPaths,
    /// Benchmark runs emit no `--status-json` objects worth debouncing
    /// upstream; the supervisor consults this instead of inspecting
    /// the attack mode itself.
    skip_status: bool,
    events_tx: Option<mpsc::Sender<SessionEvent>>,
    events_rx: Option<mpsc::Receiver<SessionEvent>>,
    done_rx: Option<oneshot::Receiver<SessionDone>>,
    tail_stop_tx: Option<oneshot::Sender<()>>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl CrackerSession {
    /// Builds argv, materializes scratch files, and constructs (but does
    /// not start) the child process.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        mut params: AttackParams,
        binary_path: &Path,
        files_path: &Path,
        out_path: &Path,
        zap_path: &Path,
        status_timer: u64,
        outfile_check_timer: u64,
        retain_zaps_on_completion: bool,
    ) -> Result<Self, SessionError> {
        let out_file = out_path.join(format!("{id}.hcout"));
        create_output_file(&out_file)?;

        let mut charset_files = Vec::new();
        let mut raw_charsets = params.mask_custom_charsets.0.clone();
        for (i, entry) in raw_charsets.iter_mut().enumerate() {
            if entry.trim().is_empty() {
                continue;
            }
            let scratch_path = out_path.join(format!("{id}-charset{}.txt", i + 1));
            std::fs::write(&scratch_path, entry.as_bytes()).map_err(|e| SessionError::ScratchFile {
                path: scratch_path.display().to_string(),
                source: e,
            })?;
            charset_files.push(scratch_path.clone());
            *entry = scratch_path.display().to_string();
        }
        params.mask_custom_charsets = agent_domain_models::CustomCharsets(raw_charsets);

        let restore_file = params
            .restore_file_path
            .as_ref()
            .map(PathBuf::from)
            .filter(|p| p.exists());

        let argv = if let Some(restore) = &restore_file {
            to_restore_args(id, &restore.display().to_string())
        } else {
            to_command_args(
                &params,
                files_path,
                id,
                &params.hash_file,
                &out_file.display().to_string(),
                &zap_path.display().to_string(),
                status_timer,
                outfile_check_timer,
            )?
        };

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let skip_status = params.attack_mode == AttackMode::Benchmark;

        Ok(Self {
            id: id.to_string(),
            argv,
            binary_path: binary_path.to_path_buf(),
            paths: SessionPaths {
                out_file,
                charset_files,
                restore_file,
                zap_dir: zap_path.to_path_buf(),
                retain_zaps_on_completion,
            },
            skip_status,
            events_tx: Some(events_tx),
            events_rx: Some(events_rx),
            done_rx: None,
            tail_stop_tx: None,
            kill_tx: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Whether this session's attack mode is benchmark — no task-level
    /// status debouncing applies, since there is no task to report to.
    pub fn skip_status(&self) -> bool {
        self.skip_status
    }

    /// Takes the event receiver. Must be called once, before or after
    /// `start`; the supervisor owns it for the life of the task.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<SessionEvent>> {
        self.events_rx.take()
    }

    pub fn take_done(&mut self) -> Option<oneshot::Receiver<SessionDone>> {
        self.done_rx.take()
    }

    /// Spawns the child, attaches its pipes, and starts the three
    /// stream workers plus the tail-then-drain exit sequence.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(&self.argv)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(SessionError::SpawnFailed)?;

        if let Err(error) = tokio::fs::File::open(&self.paths.out_file).await {
            let _ = child.start_kill();
            return Err(SessionError::TailFailed(error));
        }

        let stdout = child.stdout.take().expect("stdout piped");
        let stderr = child.stderr.take().expect("stderr piped");

        let (tail_stop_tx, tail_stop_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let (kill_tx, kill_rx) = oneshot::channel();

        let events_tx = self
            .events_tx
            .clone()
            .expect("events_tx not yet consumed by start");

        let tail_events = events_tx.clone();
        let tail_path = self.paths.out_file.clone();
        tokio::spawn(async move {
            if let Err(error) = tailer::run(tail_path, tail_events, tail_stop_rx).await {
                tracing::warn!(%error, "output-file tailer exited with an error");
            }
        });

        let stderr_events = events_tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = stderr_events.send(SessionEvent::Stderr(line)).await;
            }
        });

        self.done_rx = Some(done_rx);
        self.tail_stop_tx = Some(tail_stop_tx);
        self.kill_tx = Some(kill_tx);

        tokio::spawn(stdout_reader::run(
            stdout,
            child,
            events_tx,
            done_tx,
            self.tail_stop_tx.take().expect("set above"),
            kill_rx,
            DRAIN_GRACE_PERIOD,
        ));

        Ok(())
    }

    /// Best-effort terminate: signals the stdout worker (which owns the
    /// child handle) to kill the process. A session that has already
    /// finished — or was never started — is treated as success.
    pub async fn kill(&mut self) -> Result<(), SessionError> {
        if let Some(kill_tx) = self.kill_tx.take() {
            let _ = kill_tx.send(());
        }
        Ok(())
    }

    /// Removes the outfile, charset scratch files, restore file, and
    /// (unless configured to retain) the zap directory. Idempotent:
    /// missing files are not an error.
    pub fn cleanup(&self) -> std::io::Result<()> {
        remove_if_exists(&self.paths.out_file)?;
        for charset_file in &self.paths.charset_files {
            remove_if_exists(charset_file)?;
        }
        if let Some(restore_file) = &self.paths.restore_file {
            remove_if_exists(restore_file)?;
        }
        if !self.paths.retain_zaps_on_completion {
            match std::fs::remove_dir_all(&self.paths.zap_dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn create_output_file(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map(|_| ())
        .map_err(|e| SessionError::ScratchFile {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(not(unix))]
fn create_output_file(path: &Path) -> Result<(), SessionError> {
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| SessionError::ScratchFile {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_domain_models::{AttackMode, CustomCharsets};

    fn dictionary_params(hash_file: &str, wordlist: &str) -> AttackParams {
        AttackParams {
            attack_mode: AttackMode::Dictionary,
            hash_type: 0,
            hash_file: hash_file.to_string(),
            wordlist: Some(wordlist.to_string()),
            rule_list: None,
            mask: None,
            mask_list: None,
            mask_custom_charsets: CustomCharsets::default(),
            mask_increment: None,
            optimized_kernels: false,
            slow_candidates: false,
            skip: None,
            limit: None,
            backend_devices: None,
            opencl_device_types: None,
            additional_args: Vec::new(),
            enable_additional_hash_types: false,
            restore_file_path: None,
        }
    }

    #[test]
    fn constructs_output_file_and_argv_for_dictionary_attack() {
        let dir = tempfile::tempdir().unwrap();
        let files_path = dir.path().join("files");
        let out_path = dir.path().join("output");
        let zap_path = dir.path().join("zaps");
        std::fs::create_dir_all(&files_path).unwrap();
        std::fs::create_dir_all(&out_path).unwrap();
        std::fs::create_dir_all(&zap_path).unwrap();
        std::fs::write(files_path.join("rockyou.txt"), b"").unwrap();

        let params = dictionary_params("/t/h.txt", "rockyou.txt");
        let session = CrackerSession::new(
            "s1",
            params,
            Path::new("/usr/bin/hashcat"),
            &files_path,
            &out_path,
            &zap_path,
            3,
            5,
            false,
        )
        .unwrap();

        assert!(out_path.join("s1.hcout").exists());
        assert!(session.argv().contains(&"/t/h.txt".to_string()));
        assert!(session
            .argv()
            .contains(&files_path.join("rockyou.txt").display().to_string()));
    }

    #[test]
    fn restore_file_present_switches_to_restore_argv() {
        let dir = tempfile::tempdir().unwrap();
        let files_path = dir.path().join("files");
        let out_path = dir.path().join("output");
        let zap_path = dir.path().join("zaps");
        std::fs::create_dir_all(&files_path).unwrap();
        std::fs::create_dir_all(&out_path).unwrap();
        std::fs::create_dir_all(&zap_path).unwrap();

        let restore_path = dir.path().join("restore-marker");
        std::fs::write(&restore_path, b"").unwrap();

        let mut params = dictionary_params("/t/h.txt", "rockyou.txt");
        params.restore_file_path = Some(restore_path.display().to_string());

        let session = CrackerSession::new(
            "s1", params, Path::new("/usr/bin/hashcat"), &files_path, &out_path, &zap_path, 3, 5,
            false,
        )
        .unwrap();

        assert_eq!(
            session.argv(),
            &[
                "--session".to_string(),
                "attack-s1".to_string(),
                "--restore-file-path".to_string(),
                restore_path.display().to_string(),
                "--restore".to_string(),
            ]
        );
    }

    #[test]
    fn cleanup_removes_output_and_charset_scratch_files() {
        let dir = tempfile::tempdir().unwrap();
        let files_path = dir.path().join("files");
        let out_path = dir.path().join("output");
        let zap_path = dir.path().join("zaps");
        std::fs::create_dir_all(&files_path).unwrap();
        std::fs::create_dir_all(&out_path).unwrap();
        std::fs::create_dir_all(&zap_path).unwrap();

        let mut params = dictionary_params("/t/h.txt", "rockyou.txt");
        params.mask_custom_charsets =
            CustomCharsets::from_entries(["abc".to_string()]);
        std::fs::write(files_path.join("rockyou.txt"), b"").unwrap();

        let session = CrackerSession::new(
            "s1", params, Path::new("/usr/bin/hashcat"), &files_path, &out_path, &zap_path, 3, 5,
            false,
        )
        .unwrap();

        assert!(out_path.join("s1-charset1.txt").exists());

        session.cleanup().unwrap();
        assert!(!out_path.join("s1.hcout").exists());
        assert!(!out_path.join("s1-charset1.txt").exists());
        assert!(!zap_path.exists());

        // Idempotent: calling again on an already-cleaned session is fine.
        session.cleanup().unwrap();
    }
}
