// [apps/agent/src/bootstrap.rs]
//! Startup collaborator: config-file discovery, the data-directory
//! layout, the PID lock that keeps two agents from sharing one data
//! directory, and the interactive `init` prompt.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};

use crate::errors::BootstrapError;

const CONFIG_FILE_NAME: &str = "cipherswarmagent.yaml";

/// Search order: current directory, then the OS config directory, then
/// the user's home directory. An explicit `--config` always wins.
pub fn discover_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    config_search_candidates().into_iter().find(|path| path.exists())
}

fn config_search_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(CONFIG_FILE_NAME),
        PathBuf::from("cipherswarmagent.yml"),
    ];
    if let Some(dirs) = ProjectDirs::from("", "", "cipherswarm") {
        candidates.push(dirs.config_dir().join(CONFIG_FILE_NAME));
    }
    if let Some(dirs) = BaseDirs::new() {
        candidates.push(dirs.home_dir().join(format!(".{CONFIG_FILE_NAME}")));
    }
    candidates
}

/// Where a freshly-created config file should live when none was
/// found: the OS config directory, falling back to the current
/// directory if that can't be determined.
pub fn default_config_write_path() -> PathBuf {
    ProjectDirs::from("", "", "cipherswarm")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

pub fn default_data_path() -> PathBuf {
    ProjectDirs::from("", "", "cipherswarm")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("cipherswarm-data"))
}

/// Creates the subdirectories a session or the bootstrap process write
/// into. Tolerates directories that already exist.
pub fn ensure_data_dirs(data_path: &Path) -> Result<(), BootstrapError> {
    for sub in [
        data_path.to_path_buf(),
        data_path.join("files"),
        data_path.join("hashlists"),
        data_path.join("zaps"),
        data_path.join("output"),
        data_path.join("restore"),
        data_path.join("logs"),
    ] {
        std::fs::create_dir_all(&sub).map_err(|source| BootstrapError::DataDir { path: sub, source })?;
    }
    Ok(())
}

/// A held PID lock; removed automatically when dropped.
pub struct PidLock {
    path: PathBuf,
}

impl Drop for PidLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Claims `path` as this process's PID lock. A lock file naming a
/// still-alive process is a hard failure; a stale one (process no
/// longer running) is silently reclaimed.
pub fn acquire_pid_lock(path: &Path) -> Result<PidLock, BootstrapError> {
    if let Ok(existing) = std::fs::read_to_string(path) {
        if let Ok(pid) = existing.trim().parse::<u32>() {
            if process_is_alive(pid) {
                return Err(BootstrapError::AlreadyRunning(path.to_path_buf()));
            }
        }
    }

    std::fs::write(path, std::process::id().to_string())
        .map_err(|source| BootstrapError::PidLock { path: path.to_path_buf(), source })?;

    Ok(PidLock { path: path.to_path_buf() })
}

#[cfg(target_os = "linux")]
fn process_is_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
fn process_is_alive(_pid: u32) -> bool {
    // No portable process-liveness check without a dedicated crate;
    // err on the side of treating any recorded PID as live so two
    // agents never race past the lock on platforms we can't probe.
    true
}

/// Interactive first-run setup: prompts for the API URL and a
/// 24-character API token, writes a minimal config file, and returns
/// its path.
pub fn run_init(explicit_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    use dialoguer::Input;

    let api_url: String = Input::new()
        .with_prompt("Coordinator API URL")
        .validate_with(|input: &String| -> Result<(), &str> {
            if reqwest::Url::parse(input).is_ok() {
                Ok(())
            } else {
                Err("enter a valid URL, e.g. https://coordinator.example.com")
            }
        })
        .interact_text()?;

    let api_token: String = Input::new()
        .with_prompt("API token (24 characters)")
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.chars().count() == 24 {
                Ok(())
            } else {
                Err("token must be exactly 24 characters")
            }
        })
        .interact_text()?;

    let config_path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_write_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data_path = default_data_path();
    let document = serde_yaml::to_string(&InitialConfigDocument {
        api_url,
        api_token,
        data_path,
    })?;
    std::fs::write(&config_path, document)?;

    Ok(config_path)
}

#[derive(serde::Serialize)]
struct InitialConfigDocument {
    api_url: String,
    api_token: String,
    data_path: PathBuf,
}
