// [libs/core/cracker-proto/src/stdout_line.rs]
//! Classifies a raw stdout line from the cracker process: either a
//! `--status-json` object, or a diagnostic line at info/warning level.

use agent_domain_models::CrackerStatus;

/// One classified stdout line. Diagnostic lines are never status
/// objects and never propagated as errors — the supervisor logs them
/// and moves on.
#[derive(Debug, Clone)]
pub enum StdoutLine {
    Status(Box<CrackerStatus>),
    Diagnostic { message: String, is_info: bool },
}

const RESTORE_MARKER: &str = "starting in restore mode";

/// Attempts to parse `line` as a status object; anything that isn't
/// valid JSON (or doesn't look like a status record) is a diagnostic.
/// The restore-mode banner is logged at info, everything else at warn,
/// matching what the supervisor expects to see on a healthy run.
pub fn classify_stdout_line(line: &str) -> StdoutLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return StdoutLine::Diagnostic {
            message: String::new(),
            is_info: true,
        };
    }

    match serde_json::from_str::<CrackerStatus>(trimmed) {
        Ok(status) => StdoutLine::Status(Box::new(status)),
        Err(_) => {
            let is_info = trimmed.to_lowercase().contains(RESTORE_MARKER);
            StdoutLine::Diagnostic {
                message: trimmed.to_string(),
                is_info,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_status_json() -> String {
        serde_json::json!({
            "session": "attack-1",
            "status": 3,
            "target": "/t/h.txt",
            "progress": [100, 1000],
            "restore_point": 100,
            "recovered_hashes": [0, 1],
            "recovered_salts": [0, 1],
            "rejected": 0,
            "time_start": 1700000000,
            "estimated_stop": 1700003600,
            "guess": {
                "guess_base": "rockyou.txt",
                "guess_base_offset": 0,
                "guess_base_count": 1,
                "guess_base_percent": 0.0,
                "guess_mod": "",
                "guess_mod_offset": 0,
                "guess_mod_count": 0,
                "guess_mod_percent": 0.0,
                "guess_mode": 0
            },
            "devices": []
        })
        .to_string()
    }

    #[test]
    fn parses_status_json() {
        let line = sample_status_json();
        match classify_stdout_line(&line) {
            StdoutLine::Status(status) => assert_eq!(status.session, "attack-1"),
            StdoutLine::Diagnostic { .. } => panic!("expected status"),
        }
    }

    #[test]
    fn restore_mode_banner_is_info() {
        match classify_stdout_line("hashcat is starting in restore mode") {
            StdoutLine::Diagnostic { is_info, .. } => assert!(is_info),
            StdoutLine::Status(_) => panic!("expected diagnostic"),
        }
    }

    #[test]
    fn unrecognized_text_is_warning() {
        match classify_stdout_line("something unexpected happened") {
            StdoutLine::Diagnostic { is_info, .. } => assert!(!is_info),
            StdoutLine::Status(_) => panic!("expected diagnostic"),
        }
    }
}
