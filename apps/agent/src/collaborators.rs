// [apps/agent/src/collaborators.rs]
//! Narrow interfaces for the two external collaborators the spec names
//! but leaves unspecified: the attack-file downloader and the cracker
//! binary updater. The core only ever calls `ensure_files(attack)` and
//! trusts the result — these traits exist so the control loop and
//! supervisor can depend on an interface instead of a concrete fetcher,
//! the same way they depend on `CoordinatorApi` rather than `reqwest`
//! directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use agent_domain_models::AttackDescriptor;

#[async_trait]
pub trait FileProvisioner: Send + Sync {
    /// Guarantees every file an attack references (wordlist, rule
    /// list, mask list, hash list) is present under `files_path` /
    /// `hashlists_path` before the session is constructed.
    async fn ensure_files(&self, attack: &AttackDescriptor, files_path: &Path, hashlists_path: &Path) -> anyhow::Result<()>;
}

#[async_trait]
pub trait CrackerUpdater: Send + Sync {
    /// Refreshes the local cracker binary. Only invoked when the agent
    /// is not configured to use whatever native cracker is already on
    /// the host.
    async fn update(&self) -> anyhow::Result<()>;
}

/// Verifies referenced files are already present rather than fetching
/// them — a real deployment swaps this for an HTTP downloader backed
/// by the coordinator's asset storage. Sufficient for a self-hosted
/// agent that shares a filesystem with its coordinator.
pub struct LocalFileProvisioner;

#[async_trait]
impl FileProvisioner for LocalFileProvisioner {
    async fn ensure_files(&self, attack: &AttackDescriptor, files_path: &Path, hashlists_path: &Path) -> anyhow::Result<()> {
        let hash_file = hashlists_path.join(format!("{}.txt", attack.hash_list_id));
        if !hash_file.exists() {
            anyhow::bail!("hash list not found at {}", hash_file.display());
        }

        for reference in [&attack.word_list, &attack.rule_list, &attack.mask_list] {
            if let Some(name) = reference {
                let path = files_path.join(name);
                if !path.exists() {
                    anyhow::bail!("referenced file not found at {}", path.display());
                }
            }
        }

        Ok(())
    }
}

/// No-op updater: assumes the cracker binary at the configured path is
/// already current. A deployment that does not run the bundled native
/// cracker replaces this with one that fetches a new release.
pub struct NoopCrackerUpdater {
    pub binary_path: PathBuf,
}

#[async_trait]
impl CrackerUpdater for NoopCrackerUpdater {
    async fn update(&self) -> anyhow::Result<()> {
        if !self.binary_path.exists() {
            anyhow::bail!("cracker binary not found at {}", self.binary_path.display());
        }
        Ok(())
    }
}
