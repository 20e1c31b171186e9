// [libs/core/cracker-proto/src/stderr_line.rs]
//! Regex-table driven classification of cracker stderr lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::exit_code::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrCategory {
    HashFormat,
    FileAccess,
    Device,
    Backend,
    Configuration,
    Info,
    Warning,
    Retryable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StderrClassification {
    pub category: StderrCategory,
    pub severity: Severity,
    pub retryable: bool,
}

struct Rule {
    pattern: Regex,
    category: StderrCategory,
    severity: Severity,
    retryable: bool,
}

// Ordered most-specific-first: the device memory failure must be
// checked before the generic device warning pattern.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let table: &[(&str, StderrCategory, Severity, bool)] = &[
        (
            r"(?i)token length exception|separator unmatched|hash.?length exception|line-length exception",
            StderrCategory::HashFormat,
            Severity::Critical,
            false,
        ),
        (
            r"(?i)no such file or directory|permission denied|cannot open|failed to open",
            StderrCategory::FileAccess,
            Severity::Critical,
            false,
        ),
        (
            r"(?i)out of memory|clEnqueueNDRangeKernel|CL_MEM_OBJECT_ALLOCATION_FAILURE",
            StderrCategory::Device,
            Severity::Fatal,
            false,
        ),
        (
            r"(?i)temperature|hwmon|thermal watchdog",
            StderrCategory::Device,
            Severity::Minor,
            true,
        ),
        (
            r"(?i)clGetPlatformIDs|clBuildProgram|kernel build|opencl runtime|backend device",
            StderrCategory::Backend,
            Severity::Critical,
            false,
        ),
        (
            r"(?i)invalid argument|unknown option|unsupported attack-mode|unsupported hash-type",
            StderrCategory::Configuration,
            Severity::Critical,
            false,
        ),
        (
            r"(?i)starting in restore mode|autodetecting",
            StderrCategory::Info,
            Severity::Info,
            false,
        ),
        (
            r"(?i)overlong token skipped|hashes skipped",
            StderrCategory::Retryable,
            Severity::Minor,
            true,
        ),
    ];

    table
        .iter()
        .map(|(re, category, severity, retryable)| Rule {
            pattern: Regex::new(re).expect("static regex is valid"),
            category: *category,
            severity: *severity,
            retryable: *retryable,
        })
        .collect()
});

/// Classifies a single stderr line against the rule table, falling
/// back to `Unknown`/`Warning` severity for anything unrecognized —
/// classification must never fail the line through.
pub fn classify_stderr_line(line: &str) -> StderrClassification {
    for rule in RULES.iter() {
        if rule.pattern.is_match(line) {
            return StderrClassification {
                category: rule.category,
                severity: rule.severity,
                retryable: rule.retryable,
            };
        }
    }

    StderrClassification {
        category: StderrCategory::Unknown,
        severity: Severity::Minor,
        retryable: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_format_error_is_critical_non_retryable() {
        let c = classify_stderr_line("Token length exception");
        assert_eq!(c.category, StderrCategory::HashFormat);
        assert_eq!(c.severity, Severity::Critical);
        assert!(!c.retryable);
    }

    #[test]
    fn file_access_error_is_critical_non_retryable() {
        let c = classify_stderr_line("hashcat: rockyou.txt: No such file or directory");
        assert_eq!(c.category, StderrCategory::FileAccess);
        assert!(!c.retryable);
    }

    #[test]
    fn device_temperature_warning_is_retryable() {
        let c = classify_stderr_line("WARNING: Temperature abort trigger reached");
        assert_eq!(c.category, StderrCategory::Device);
        assert!(c.retryable);
    }

    #[test]
    fn device_memory_failure_is_fatal() {
        let c = classify_stderr_line("clEnqueueNDRangeKernel(): CL_OUT_OF_RESOURCES");
        assert_eq!(c.category, StderrCategory::Device);
        assert_eq!(c.severity, Severity::Fatal);
        assert!(!c.retryable);
    }

    #[test]
    fn backend_framework_error_is_critical() {
        let c = classify_stderr_line("clGetPlatformIDs(): CL_PLATFORM_NOT_FOUND");
        assert_eq!(c.category, StderrCategory::Backend);
        assert!(!c.retryable);
    }

    #[test]
    fn unrecognized_line_falls_back_to_unknown() {
        let c = classify_stderr_line("some unrelated chatter");
        assert_eq!(c.category, StderrCategory::Unknown);
        assert!(!c.retryable);
    }

    proptest! {
        #[test]
        fn total_function_no_panics(line in "\\PC{0,120}") {
            let _ = classify_stderr_line(&line);
        }
    }
}
