// [apps/agent/src/supervisor.rs]
//! Task supervisor (C4): drives one task end-to-end — accept, run the
//! cracker session, relay its events to the coordinator, and classify
//! the terminal outcome into a report and a cleanup sequence. Never
//! decides session-layer policy itself: the session only ever reports
//! classified events, and this is where they turn into retry/abandon
//! decisions.

use std::path::Path;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use agent_attack_params::attack_mode_from_code;
use agent_coordinator_client::{CoordinatorApi, ErrorSeverity};
use agent_cracker_proto::{classify_exit_code, classify_stderr_line, ExitCategory, Severity, StderrCategory};
use agent_cracker_session::{CrackerSession, SessionDone, SessionEvent};
use agent_domain_models::{AgentConfig, AttackDescriptor, AttackMode, AttackParams, CustomCharsets, Task};

use crate::collaborators::FileProvisioner;
use crate::errors::SupervisorError;

/// The terminal disposition of one `run_task` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Cracked,
    Exhausted,
    /// Left eligible for re-pickup by the server; not abandoned.
    Retryable,
    Abandoned,
}

fn to_error_severity(severity: Severity) -> ErrorSeverity {
    match severity {
        Severity::Info => ErrorSeverity::Info,
        Severity::Minor => ErrorSeverity::Minor,
        Severity::Critical => ErrorSeverity::Critical,
        Severity::Fatal => ErrorSeverity::Fatal,
    }
}

/// Binds a coordinator-issued attack descriptor to one task's hash
/// file and resumption cursor, producing the validated parameters C1
/// operates on. Wordlist/rule-list/mask-list references are assumed
/// already resolved under `files_path` by `ensure_files`.
pub fn derive_params(
    attack: &AttackDescriptor,
    task: &Task,
    config: &AgentConfig,
) -> Result<AttackParams, SupervisorError> {
    let attack_mode = attack_mode_from_code(attack.attack_mode)?;

    let hash_file = config
        .hashlists_path()
        .join(format!("{}.txt", attack.hash_list_id))
        .display()
        .to_string();

    let restore_file_path = {
        let candidate = config.restore_path().join(format!("{}.restore", task.id));
        candidate.exists().then(|| candidate.display().to_string())
    };

    let (skip, limit) = if task.cursor.limit > 0 {
        (Some(task.cursor.skip), Some(task.cursor.limit))
    } else {
        (attack.skip, attack.limit)
    };

    Ok(AttackParams {
        attack_mode,
        hash_type: attack.hash_type,
        hash_file,
        wordlist: attack.word_list.clone(),
        rule_list: attack.rule_list.clone(),
        mask: attack.mask.clone(),
        mask_list: attack.mask_list.clone(),
        mask_custom_charsets: attack.mask_custom_charsets.clone(),
        mask_increment: attack.mask_increment,
        optimized_kernels: attack.optimized,
        slow_candidates: attack.slow_candidates,
        skip,
        limit,
        backend_devices: None,
        opencl_device_types: None,
        additional_args: attack.additional_args.clone(),
        enable_additional_hash_types: attack.enable_additional_hash_types,
        restore_file_path,
    })
}

struct EventHandlerState {
    last_status_upload: Instant,
    forced_stderr: Option<agent_cracker_proto::StderrClassification>,
}

/// Runs exactly one task to completion: accept, provision files, build
/// and start the cracker session, relay its events, and classify the
/// terminal outcome.
pub async fn run_task(
    coordinator: &dyn CoordinatorApi,
    provisioner: &dyn FileProvisioner,
    config: &AgentConfig,
    binary_path: &Path,
    mut task: Task,
    attack: AttackDescriptor,
    cancel: watch::Receiver<bool>,
) -> Result<TaskOutcome, SupervisorError> {
    tracing::info!(task_id = %task.id, attack_id = %attack.id, "new task");

    coordinator.accept_task(&task).await?;

    if let Err(error) = provisioner
        .ensure_files(&attack, &config.files_path(), &config.hashlists_path())
        .await
    {
        let message = format!("failed to provision attack files: {error}");
        let _ = coordinator
            .submit_agent_error(&message, Some(&task), ErrorSeverity::Fatal)
            .await;
        let _ = coordinator.abandon_task(&task).await;
        return Err(SupervisorError::FileProvisioning(message));
    }

    let params = derive_params(&attack, &task, config)?;

    let mut session = CrackerSession::new(
        &task.id,
        params,
        binary_path,
        &config.files_path(),
        &config.output_path(),
        &config.zaps_path(),
        config.status_timer,
        config.outfile_check_timer,
        config.retain_zaps_on_completion,
    )?;

    let mut events = session.take_events().expect("events receiver available before start");
    session.start().await?;
    let mut done_rx = session.take_done().expect("done receiver available after start");

    let debounce = Duration::from_secs(config.status_timer.max(1));
    let mut state = EventHandlerState {
        last_status_upload: Instant::now() - debounce,
        forced_stderr: None,
    };

    let mut cancel = cancel;
    let mut cancelled = false;

    let done_outcome = loop {
        tokio::select! {
            biased;

            changed = cancel.changed() => {
                if changed.is_ok() && *cancel.borrow() && !cancelled {
                    cancelled = true;
                    tracing::info!(task_id = %task.id, "task cancelled, killing session");
                    let _ = session.kill().await;
                }
            }

            event = events.recv() => {
                if let Some(event) = event {
                    handle_event(event, coordinator, &mut task, &mut session, &mut state, debounce).await?;
                }
            }

            done = &mut done_rx => {
                let outcome = done.unwrap_or_else(|_| SessionDone::WaitFailed("done channel dropped".to_string()));
                break outcome;
            }
        }
    };

    // Drain whatever trickled in during the tailer's post-exit grace
    // period before this task's terminal report is decided.
    while let Ok(event) = events.try_recv() {
        handle_event(event, coordinator, &mut task, &mut session, &mut state, debounce).await?;
    }
    while let Some(event) = tokio::time::timeout(Duration::from_millis(200), events.recv())
        .await
        .ok()
        .flatten()
    {
        handle_event(event, coordinator, &mut task, &mut session, &mut state, debounce).await?;
    }

    let outcome = if cancelled {
        let _ = coordinator
            .submit_agent_error("task cancelled by shutdown", Some(&task), ErrorSeverity::Info)
            .await;
        let _ = coordinator.abandon_task(&task).await;
        TaskOutcome::Abandoned
    } else if let Some(classification) = state.forced_stderr.take() {
        report_stderr_termination(coordinator, &task, classification).await
    } else {
        report_exit(coordinator, &task, done_outcome).await
    };

    session.cleanup().map_err(|e| SupervisorError::Session(e.into()))?;

    Ok(outcome)
}

async fn handle_event(
    event: SessionEvent,
    coordinator: &dyn CoordinatorApi,
    task: &mut Task,
    session: &mut CrackerSession,
    state: &mut EventHandlerState,
    debounce: Duration,
) -> Result<(), SupervisorError> {
    match event {
        SessionEvent::Status(status) => {
            task.cursor.skip = status.progress[0];
            task.cursor.limit = status.progress[1];

            if !session.skip_status() && state.last_status_upload.elapsed() >= debounce {
                let _ = coordinator.submit_status(task, &status).await;
                state.last_status_upload = Instant::now();
            }
        }
        SessionEvent::Crack(result) => {
            coordinator.submit_crack(task, &result).await?;
            task.stats.cracked_count += 1;
        }
        SessionEvent::Stderr(line) => {
            let classification = classify_stderr_line(&line);
            let is_severe = matches!(classification.severity, Severity::Critical | Severity::Fatal);
            if is_severe && !classification.retryable {
                tracing::error!(%line, ?classification, "critical stderr, killing session");
                state.forced_stderr = Some(classification);
                let _ = session.kill().await;
            } else {
                let _ = coordinator
                    .submit_agent_error(&line, Some(task), to_error_severity(classification.severity))
                    .await;
            }
        }
        SessionEvent::Stdout { text, is_info } => {
            if is_info {
                tracing::info!(%text, "cracker diagnostic");
            } else {
                tracing::warn!(%text, "unexpected cracker stdout");
            }
        }
    }
    Ok(())
}

async fn report_stderr_termination(
    coordinator: &dyn CoordinatorApi,
    task: &Task,
    classification: agent_cracker_proto::StderrClassification,
) -> TaskOutcome {
    let _ = coordinator
        .submit_agent_error(
            "cracker terminated after a critical stderr diagnostic",
            Some(task),
            to_error_severity(classification.severity),
        )
        .await;

    match classification.category {
        StderrCategory::Retryable => TaskOutcome::Retryable,
        _ => {
            let _ = coordinator.abandon_task(task).await;
            TaskOutcome::Abandoned
        }
    }
}

async fn report_exit(coordinator: &dyn CoordinatorApi, task: &Task, done: SessionDone) -> TaskOutcome {
    let code = match done {
        SessionDone::Exited(status) => status.code().unwrap_or(-1),
        SessionDone::WaitFailed(reason) => {
            tracing::error!(%reason, "failed to wait on cracker process");
            -1
        }
    };

    let classification = classify_exit_code(code);
    tracing::info!(task_id = %task.id, code, ?classification, "session exited");

    match classification.category {
        ExitCategory::Success if classification.status_tag == "cracked" => {
            let _ = coordinator
                .submit_agent_error("task cracked", Some(task), ErrorSeverity::Info)
                .await;
            TaskOutcome::Cracked
        }
        ExitCategory::Success => {
            let _ = coordinator.report_exhausted(task).await;
            TaskOutcome::Exhausted
        }
        ExitCategory::Retryable => TaskOutcome::Retryable,
        ExitCategory::Device | ExitCategory::Backend | ExitCategory::Unknown => {
            let _ = coordinator
                .submit_agent_error(
                    &format!("cracker exited with unrecoverable code {code}"),
                    Some(task),
                    to_error_severity(classification.severity),
                )
                .await;
            let _ = coordinator.abandon_task(task).await;
            TaskOutcome::Abandoned
        }
    }
}

/// Runs a benchmark locally: no task lifecycle, no coordinator status
/// uploads — just the session, the classifier, and a log line.
pub async fn run_benchmark(config: &AgentConfig, binary_path: &Path) -> Result<(), SupervisorError> {
    let params = AttackParams {
        attack_mode: AttackMode::Benchmark,
        hash_type: 0,
        hash_file: String::new(),
        wordlist: None,
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
        enable_additional_hash_types: true,
        restore_file_path: None,
    };

    let mut session = CrackerSession::new(
        "benchmark",
        params,
        binary_path,
        &config.files_path(),
        &config.output_path(),
        &config.zaps_path(),
        config.status_timer,
        config.outfile_check_timer,
        config.retain_zaps_on_completion,
    )?;

    let mut events = session.take_events().expect("events receiver available before start");
    session.start().await?;
    let mut done_rx = session.take_done().expect("done receiver available after start");

    let done_outcome = loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(SessionEvent::Stdout { text, .. }) => tracing::info!(%text, "benchmark output"),
                    Some(SessionEvent::Stderr(line)) => tracing::warn!(%line, "benchmark stderr"),
                    Some(_) => {}
                    None => {}
                }
            }
            done = &mut done_rx => {
                break done.unwrap_or_else(|_| SessionDone::WaitFailed("done channel dropped".to_string()));
            }
        }
    };

    session.cleanup().map_err(|e| SupervisorError::Session(e.into()))?;

    match done_outcome {
        SessionDone::Exited(status) => {
            tracing::info!(code = status.code(), "benchmark run finished");
        }
        SessionDone::WaitFailed(reason) => {
            tracing::warn!(%reason, "benchmark run could not be waited on");
        }
    }

    Ok(())
}
