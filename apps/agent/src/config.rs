// [apps/agent/src/config.rs]
//! Layered configuration: CLI flag (the `--config` path itself) picks
//! which file is read; the file overrides library defaults, and
//! environment variables (`CIPHERSWARM__*`) override the file in turn.

use agent_domain_models::AgentConfig;

use crate::bootstrap;
use crate::cli::Cli;
use crate::errors::BootstrapError;

pub fn load(cli: &Cli) -> Result<AgentConfig, BootstrapError> {
    let config_path = bootstrap::discover_config_path(cli.config.as_deref());

    let mut builder = config::Config::builder()
        .set_default("data_path", bootstrap::default_data_path().display().to_string())?
        .set_default("always_trust_files", false)?
        .set_default("retain_zaps_on_completion", false)?
        .set_default("gpu_temp_threshold", 80)?
        .set_default("status_timer", 3)?
        .set_default("outfile_check_timer", 5)?
        .set_default("sleep_on_failure_secs", 60)?
        .set_default("benchmark_update_frequency_secs", 168 * 3600)?
        .set_default("heartbeat_interval_secs", 60)?
        .set_default("agent_update_interval_secs", 30)?
        .set_default("use_native_cracker", true)?;

    if let Some(path) = &config_path {
        builder = builder.add_source(config::File::from(path.as_path()));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CIPHERSWARM")
            .separator("__")
            .try_parsing(true),
    );

    let built = builder.build()?;
    let config: AgentConfig = built.try_deserialize()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn loads_required_fields_from_file_and_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cipherswarmagent.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "api_url: https://coordinator.example").unwrap();
        writeln!(file, "api_token: \"123456789012345678901234\"").unwrap();

        let cli = Cli::parse_from(["cipherswarm-agent", "--config", path.to_str().unwrap()]);
        let config = load(&cli).unwrap();

        assert_eq!(config.api_url, "https://coordinator.example");
        assert_eq!(config.status_timer, 3);
        assert_eq!(config.gpu_temp_threshold, 80);
    }
}
