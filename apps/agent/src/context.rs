// [apps/agent/src/context.rs]
//! The agent's only piece of shared mutable state, threaded explicitly
//! through the control loop and heartbeat worker rather than living as
//! a process-wide singleton. Per the concurrency model, nothing else
//! writes to it; the supervisor only reads the config snapshot it hands
//! down for one task's duration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Instant;

use agent_coordinator_client::RemoteAgentConfig;
use agent_domain_models::{AgentConfig, Activity};

pub struct AgentContext {
    activity: RwLock<Activity>,
    config: RwLock<AgentConfig>,
    reload: AtomicBool,
    job_checking_stopped: AtomicBool,
    last_benchmark: RwLock<Instant>,
}

impl AgentContext {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            activity: RwLock::new(Activity::Starting),
            config: RwLock::new(config),
            reload: AtomicBool::new(false),
            job_checking_stopped: AtomicBool::new(false),
            last_benchmark: RwLock::new(Instant::now()),
        }
    }

    /// Whether `benchmark_update_frequency` has elapsed since the last
    /// completed benchmark, independent of the server-driven `pending`
    /// path — a complete agent re-benchmarks itself on a schedule
    /// rather than waiting to be asked.
    pub fn benchmark_due(&self) -> bool {
        let elapsed = self.last_benchmark.read().expect("lock poisoned").elapsed();
        elapsed >= self.config().benchmark_update_frequency()
    }

    pub fn mark_benchmarked(&self) {
        *self.last_benchmark.write().expect("lock poisoned") = Instant::now();
    }

    pub fn activity(&self) -> Activity {
        *self.activity.read().expect("lock poisoned")
    }

    pub fn set_activity(&self, activity: Activity) {
        *self.activity.write().expect("lock poisoned") = activity;
    }

    pub fn config(&self) -> AgentConfig {
        self.config.read().expect("lock poisoned").clone()
    }

    /// Merges the coordinator's advertised knobs into the local config
    /// snapshot on startup and on every `reload`.
    pub fn merge_remote_config(&self, remote: RemoteAgentConfig) {
        let mut config = self.config.write().expect("lock poisoned");
        config.agent_update_interval_secs = remote.agent_update_interval_secs;
        config.use_native_cracker = remote.use_native_cracker;
        if let Some(frequency) = remote.benchmark_update_frequency_secs {
            config.benchmark_update_frequency_secs = frequency;
        }
    }

    /// Sets the reload flag unless a benchmark is already running.
    pub fn request_reload_unless_benchmarking(&self) {
        if self.activity() != Activity::Benchmarking {
            self.reload.store(true, Ordering::SeqCst);
        }
    }

    /// Atomically consumes the reload flag: returns `true` (and clears
    /// it) only if it was set and the agent isn't already benchmarking.
    pub fn take_reload(&self) -> bool {
        if self.activity() == Activity::Benchmarking {
            return false;
        }
        self.reload.swap(false, Ordering::SeqCst)
    }

    pub fn stop_job_checking(&self) {
        self.job_checking_stopped.store(true, Ordering::SeqCst);
    }

    pub fn job_checking_stopped(&self) -> bool {
        self.job_checking_stopped.load(Ordering::SeqCst)
    }
}
