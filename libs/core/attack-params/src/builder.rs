// [libs/core/attack-params/src/builder.rs]
//! Attack-mode validation and cracker command-line synthesis.

use crate::errors::ArgBuildError;
use crate::path_sandbox::safe_existing_path;
use agent_domain_models::{AttackMode, AttackParams};
use std::path::Path;

/// Converts a raw attack-mode code (as received from the coordinator)
/// into the closed `AttackMode` set, surfacing `UnsupportedAttackMode`
/// for anything else.
pub fn attack_mode_from_code(code: u32) -> Result<AttackMode, ArgBuildError> {
    match code {
        0 => Ok(AttackMode::Dictionary),
        3 => Ok(AttackMode::Mask),
        6 => Ok(AttackMode::HybridDictMask),
        7 => Ok(AttackMode::HybridMaskDict),
        9 => Ok(AttackMode::Benchmark),
        other => Err(ArgBuildError::UnsupportedAttackMode(other)),
    }
}

fn is_present(opt: &Option<String>) -> bool {
    opt.as_deref().is_some_and(|s| !s.is_empty())
}

/// Validates mode-specific invariants. Does not touch the filesystem —
/// file existence is checked during `to_command_args`.
pub fn validate(params: &AttackParams) -> Result<(), ArgBuildError> {
    if params.mask_custom_charsets.len() > 4 {
        return Err(ArgBuildError::TooManyCustomCharsets(
            params.mask_custom_charsets.len(),
        ));
    }

    if let Some(inc) = params.mask_increment {
        if inc.min > inc.max {
            return Err(ArgBuildError::InvalidMaskIncrementRange {
                min: inc.min,
                max: inc.max,
            });
        }
    }

    match params.attack_mode {
        AttackMode::Dictionary => {
            if !is_present(&params.wordlist) {
                return Err(ArgBuildError::DictionaryWordlistMissing);
            }
        }
        AttackMode::Mask => {
            let has_mask = is_present(&params.mask);
            let has_mask_list = is_present(&params.mask_list);
            if has_mask && has_mask_list {
                return Err(ArgBuildError::MaskAndMaskListBothGiven);
            }
            if !has_mask && !has_mask_list {
                return Err(ArgBuildError::MaskMissing);
            }
        }
        AttackMode::HybridDictMask | AttackMode::HybridMaskDict => {
            if !is_present(&params.wordlist) {
                return Err(ArgBuildError::HybridWordlistMissing);
            }
            if !is_present(&params.mask) {
                return Err(ArgBuildError::HybridMaskMissing);
            }
        }
        AttackMode::Benchmark => {}
    }

    Ok(())
}

fn push_mask_tail(args: &mut Vec<String>, params: &AttackParams) {
    for (index, charset) in params.mask_custom_charsets.populated() {
        args.push(format!("--custom-charset{index}"));
        args.push(charset.to_string());
    }
    if let Some(inc) = params.mask_increment {
        args.push("--increment".to_string());
        args.push("--increment-min".to_string());
        args.push(inc.min.to_string());
        args.push("--increment-max".to_string());
        args.push(inc.max.to_string());
    }
}

fn build_benchmark_args(params: &AttackParams) -> Vec<String> {
    let mut args = vec![
        "--quiet".to_string(),
        "--machine-readable".to_string(),
        "--benchmark".to_string(),
    ];
    args.extend(params.additional_args.iter().cloned());
    if let Some(devices) = &params.backend_devices {
        args.push("--backend-devices".to_string());
        args.push(devices.clone());
    }
    if let Some(types) = &params.opencl_device_types {
        args.push("--opencl-device-types".to_string());
        args.push(types.clone());
    }
    if params.enable_additional_hash_types {
        args.push("--benchmark-all".to_string());
    }
    args
}

#[allow(clippy::too_many_arguments)]
fn build_attack_args(
    params: &AttackParams,
    files_path: &Path,
    session_id: &str,
    hash_file: &str,
    out_file: &str,
    zap_path: &str,
    status_timer: u64,
    outfile_check_timer: u64,
) -> Result<Vec<String>, ArgBuildError> {
    let mut args = vec![
        "--quiet".to_string(),
        "--session".to_string(),
        format!("attack-{session_id}"),
        "--outfile-format".to_string(),
        "1,3,5".to_string(),
        "--outfile".to_string(),
        out_file.to_string(),
        "--status".to_string(),
        "--status-json".to_string(),
        "--status-timer".to_string(),
        status_timer.to_string(),
        "--potfile-disable".to_string(),
        "--outfile-check-timer".to_string(),
        outfile_check_timer.to_string(),
        "--outfile-check-dir".to_string(),
        zap_path.to_string(),
        "-a".to_string(),
        params.attack_mode.code().to_string(),
        "-m".to_string(),
        params.hash_type.to_string(),
    ];

    if let Some(restore_path) = &params.restore_file_path {
        args.push("--restore-file-path".to_string());
        args.push(restore_path.clone());
    }

    args.extend(params.additional_args.iter().cloned());

    if params.optimized_kernels {
        args.push("-O".to_string());
    }
    if params.slow_candidates {
        args.push("-S".to_string());
    }
    if let Some(skip) = params.skip {
        args.push("--skip".to_string());
        args.push(skip.to_string());
    }
    if let Some(limit) = params.limit {
        args.push("--limit".to_string());
        args.push(limit.to_string());
    }

    args.push(hash_file.to_string());

    match params.attack_mode {
        AttackMode::Dictionary => {
            let wordlist = params.wordlist.as_deref().expect("validated present");
            args.push(safe_existing_path(files_path, wordlist)?.display().to_string());
            if let Some(rules) = &params.rule_list {
                if !rules.is_empty() {
                    args.push("-r".to_string());
                    args.push(safe_existing_path(files_path, rules)?.display().to_string());
                }
            }
        }
        AttackMode::Mask => {
            if let Some(mask) = params.mask.as_deref().filter(|m| !m.is_empty()) {
                args.push(mask.to_string());
            } else {
                let mask_list = params.mask_list.as_deref().expect("validated present");
                args.push(
                    safe_existing_path(files_path, mask_list)?
                        .display()
                        .to_string(),
                );
            }
        }
        AttackMode::HybridDictMask => {
            let wordlist = params.wordlist.as_deref().expect("validated present");
            args.push(safe_existing_path(files_path, wordlist)?.display().to_string());
            args.push(params.mask.as_deref().expect("validated present").to_string());
        }
        AttackMode::HybridMaskDict => {
            args.push(params.mask.as_deref().expect("validated present").to_string());
            let wordlist = params.wordlist.as_deref().expect("validated present");
            args.push(safe_existing_path(files_path, wordlist)?.display().to_string());
        }
        AttackMode::Benchmark => unreachable!("benchmark dispatched separately"),
    }

    if matches!(
        params.attack_mode,
        AttackMode::Mask | AttackMode::HybridDictMask | AttackMode::HybridMaskDict
    ) {
        push_mask_tail(&mut args, params);
    }

    if let Some(devices) = &params.backend_devices {
        args.push("--backend-devices".to_string());
        args.push(devices.clone());
    }
    if let Some(types) = &params.opencl_device_types {
        args.push("--opencl-device-types".to_string());
        args.push(types.clone());
    }

    Ok(args)
}

/// Validates `params`, then synthesizes the full cracker argv for
/// either the benchmark or the attack command shape.
#[allow(clippy::too_many_arguments)]
pub fn to_command_args(
    params: &AttackParams,
    files_path: &Path,
    session_id: &str,
    hash_file: &str,
    out_file: &str,
    zap_path: &str,
    status_timer: u64,
    outfile_check_timer: u64,
) -> Result<Vec<String>, ArgBuildError> {
    validate(params)?;

    if params.attack_mode == AttackMode::Benchmark {
        Ok(build_benchmark_args(params))
    } else {
        build_attack_args(
            params,
            files_path,
            session_id,
            hash_file,
            out_file,
            zap_path,
            status_timer,
            outfile_check_timer,
        )
    }
}

/// The restore-only argv: resumes a previously aborted session from
/// its marker file, ignoring every other attack parameter.
pub fn to_restore_args(session_id: &str, restore_file_path: &str) -> Vec<String> {
    vec![
        "--session".to_string(),
        format!("attack-{session_id}"),
        "--restore-file-path".to_string(),
        restore_file_path.to_string(),
        "--restore".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_domain_models::CustomCharsets;
    use std::fs;
    use tempfile::tempdir;

    fn base_params(mode: AttackMode) -> AttackParams {
        AttackParams {
            attack_mode: mode,
            hash_type: 0,
            hash_file: "h.txt".to_string(),
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
            enable_additional_hash_types: false,
            restore_file_path: None,
        }
    }

    // Scenario 1: dictionary attack, argv ends with `<hash_file> <wordlist>`.
    #[test]
    fn scenario_dictionary_argv_tail() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rockyou.txt"), b"").unwrap();

        let mut params = base_params(AttackMode::Dictionary);
        params.hash_file = "/t/h.txt".to_string();
        params.wordlist = Some("rockyou.txt".to_string());

        let args = to_command_args(
            &params,
            dir.path(),
            "1",
            "/t/h.txt",
            "/t/out.txt",
            "/t/zap",
            3,
            5,
        )
        .unwrap();

        assert_eq!(args[args.len() - 2], "/t/h.txt");
        assert_eq!(args[args.len() - 1], dir.path().join("rockyou.txt").display().to_string());
    }

    // Scenario 2: blank custom-charset entries keep their original flag index.
    #[test]
    fn scenario_custom_charset_indexing_preserved() {
        let dir = tempdir().unwrap();

        let mut params = base_params(AttackMode::Mask);
        params.mask = Some("?1?1?1?1".to_string());
        params.mask_custom_charsets =
            CustomCharsets::from_entries(["abc", "", "", "xyz"].map(String::from));

        let args =
            to_command_args(&params, dir.path(), "1", "/t/h.txt", "/t/out.txt", "/t/zap", 3, 5)
                .unwrap();

        let pos1 = args.iter().position(|a| a == "--custom-charset1").unwrap();
        assert_eq!(args[pos1 + 1], "abc");
        let pos4 = args.iter().position(|a| a == "--custom-charset4").unwrap();
        assert_eq!(args[pos4 + 1], "xyz");
        assert!(!args.contains(&"--custom-charset2".to_string()));
        assert!(!args.contains(&"--custom-charset3".to_string()));
    }

    // Scenario 3: mask attack cannot specify both a literal mask and a mask list.
    #[test]
    fn scenario_mask_and_mask_list_conflict() {
        let mut params = base_params(AttackMode::Mask);
        params.mask = Some("?1?1".to_string());
        params.mask_list = Some("masks.hcmask".to_string());

        assert_eq!(
            validate(&params),
            Err(ArgBuildError::MaskAndMaskListBothGiven)
        );
    }

    // Scenario 4: hybrid attack requires both a wordlist and a mask.
    #[test]
    fn scenario_hybrid_requires_both_wordlist_and_mask() {
        let mut params = base_params(AttackMode::HybridDictMask);
        params.wordlist = Some("rockyou.txt".to_string());

        assert_eq!(validate(&params), Err(ArgBuildError::HybridMaskMissing));
    }

    // Scenario 5: a wordlist reference that escapes files_path is rejected
    // even though the string itself contains no leading slash.
    #[test]
    fn scenario_wordlist_traversal_rejected() {
        let dir = tempdir().unwrap();

        let mut params = base_params(AttackMode::Dictionary);
        params.wordlist = Some("../../etc/passwd".to_string());

        let result = to_command_args(
            &params,
            dir.path(),
            "1",
            "/t/h.txt",
            "/t/out.txt",
            "/t/zap",
            3,
            5,
        );

        assert!(matches!(result, Err(ArgBuildError::PathEscapesBase(_))));
    }

    #[test]
    fn benchmark_mode_skips_file_validation() {
        let dir = tempdir().unwrap();
        let params = base_params(AttackMode::Benchmark);

        let args =
            to_command_args(&params, dir.path(), "1", "/t/h.txt", "/t/out.txt", "/t/zap", 3, 5)
                .unwrap();

        assert!(args.contains(&"--benchmark".to_string()));
        assert!(!args.iter().any(|a| a == "/t/h.txt"));
    }

    #[test]
    fn unsupported_attack_mode_code_rejected() {
        assert_eq!(
            attack_mode_from_code(42),
            Err(ArgBuildError::UnsupportedAttackMode(42))
        );
    }

    #[test]
    fn mask_increment_min_greater_than_max_rejected() {
        let mut params = base_params(AttackMode::Mask);
        params.mask = Some("?1?1".to_string());
        params.mask_increment = Some(agent_domain_models::MaskIncrement { min: 8, max: 4 });

        assert_eq!(
            validate(&params),
            Err(ArgBuildError::InvalidMaskIncrementRange { min: 8, max: 4 })
        );
    }

    #[test]
    fn too_many_custom_charsets_rejected() {
        let mut params = base_params(AttackMode::Mask);
        params.mask = Some("?1?1".to_string());
        params.mask_custom_charsets =
            CustomCharsets::from_entries(["a", "b", "c", "d", "e"].map(String::from));

        assert_eq!(validate(&params), Err(ArgBuildError::TooManyCustomCharsets(5)));
    }
}
