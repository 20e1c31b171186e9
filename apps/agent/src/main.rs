// [apps/agent/src/main.rs]
/*!
 * =================================================================
 * APARATO: CIPHERSWARM AGENT SHELL
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: BOOTSTRAP DE ENTORNO E IGNICIÓN DEL CONTROL LOOP
 *
 * 1. ARCHITECTURAL PURITY: No task logic lives here — this is a
 *    switchboard that assembles the coordinator client, the agent
 *    context, and the control loop, then gets out of the way.
 * 2. ERROR TRIAGE: Bootstrap failures (lock contention, bad config,
 *    unreachable coordinator) fail fast with rich context, before a
 *    single task is ever picked up.
 * =================================================================
 */

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use cipherswarm_agent::bootstrap;
use cipherswarm_agent::cli::{Cli, Command};
use cipherswarm_agent::collaborators::{LocalFileProvisioner, NoopCrackerUpdater};
use cipherswarm_agent::config as agent_config;
use cipherswarm_agent::context::AgentContext;
use cipherswarm_agent::control_loop::{spawn_heartbeat_worker, AgentLoop};

use agent_coordinator_client::{CoordinatorApi, ReqwestCoordinatorClient};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Init) = &cli.command {
        let path = bootstrap::run_init(cli.config.as_deref())?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    // 1. CARGA DE CONFIGURACIÓN EN CAPAS (archivo -> entorno)
    let config = agent_config::load(&cli).context("failed to load agent configuration")?;

    // 2. PREPARACIÓN DEL ESTRATO DE PERSISTENCIA LOCAL
    bootstrap::ensure_data_dirs(&config.data_path).context("failed to prepare data directories")?;

    // 3. INICIALIZACIÓN DEL SISTEMA DE OBSERVABILIDAD
    let _log_guard = cipherswarm_agent::logging::init(&config.data_path, cli.debug)
        .context("failed to initialize logging")?;

    info!("💠 cipherswarm-agent starting up");

    // 4. RECLAMO DEL PID LOCK (evita dos agentes sobre un mismo data_path)
    let _pid_lock = bootstrap::acquire_pid_lock(&config.agent_lock_path())
        .context("failed to acquire agent lock")?;

    // 5. CONSTRUCCIÓN DEL ENLACE CON EL COORDINADOR
    let coordinator: Arc<dyn CoordinatorApi> =
        Arc::new(ReqwestCoordinatorClient::new(config.api_url.clone(), &config.api_token)?);
    coordinator.authenticate().await.context("failed to authenticate with coordinator")?;
    info!("🔑 authenticated with coordinator at {}", config.api_url);

    // 6. ENSAMBLAJE DEL CONTEXTO COMPARTIDO
    let context = Arc::new(AgentContext::new(config.clone()));
    match coordinator.get_agent_configuration().await {
        Ok(remote) => context.merge_remote_config(remote),
        Err(error) => warn!(%error, "could not fetch initial agent configuration, using local defaults"),
    }

    let cracker_binary_path = std::path::PathBuf::from("hashcat");
    let provisioner = Arc::new(LocalFileProvisioner);
    let updater = Arc::new(NoopCrackerUpdater {
        binary_path: cracker_binary_path.clone(),
    });

    let control_loop = AgentLoop::new(
        Arc::clone(&context),
        Arc::clone(&coordinator),
        cracker_binary_path,
        provisioner,
        updater,
    );

    // 7. PROTOCOLO DE SEÑALES DE SISTEMA (terminación ordenada)
    let (terminate_tx, terminate_rx) = tokio::sync::watch::channel(false);

    let ctrl_c_tx = terminate_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⚠️ termination requested by host, sealing current task");
            let _ = ctrl_c_tx.send(true);
        }
    });

    let heartbeat_handle = spawn_heartbeat_worker(Arc::clone(&context), Arc::clone(&coordinator), terminate_tx);

    // 8. IGNICIÓN DEL CONTROL LOOP
    info!("🚀 handing control to the agent loop");
    control_loop.run(terminate_rx).await;

    heartbeat_handle.abort();
    info!("🏁 shutdown sequence concluded");

    Ok(())
}
