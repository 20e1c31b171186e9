// [libs/core/cracker-proto/src/exit_code.rs]
//! Classifies the cracker process's exit code into a category the
//! supervisor can act on without knowing hashcat's own conventions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCategory {
    Success,
    Retryable,
    Unknown,
    Device,
    Backend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Minor,
    Critical,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitClassification {
    pub category: ExitCategory,
    pub severity: Severity,
    pub retryable: bool,
    pub status_tag: &'static str,
}

/// Classifies a cracker process exit code per the fixed table: 0/1 are
/// terminal successes, 2-4 are transient and worth retrying, -2 is a
/// fatal device condition, -3..-11 are backend/critical, everything
/// else is unknown/critical. Total over all `i32`.
pub fn classify_exit_code(code: i32) -> ExitClassification {
    match code {
        0 => ExitClassification {
            category: ExitCategory::Success,
            severity: Severity::Info,
            retryable: false,
            status_tag: "cracked",
        },
        1 => ExitClassification {
            category: ExitCategory::Success,
            severity: Severity::Info,
            retryable: false,
            status_tag: "exhausted",
        },
        2 => ExitClassification {
            category: ExitCategory::Retryable,
            severity: Severity::Minor,
            retryable: true,
            status_tag: "aborted",
        },
        3 => ExitClassification {
            category: ExitCategory::Retryable,
            severity: Severity::Minor,
            retryable: true,
            status_tag: "checkpoint",
        },
        4 => ExitClassification {
            category: ExitCategory::Retryable,
            severity: Severity::Minor,
            retryable: true,
            status_tag: "runtime_limit",
        },
        -1 => ExitClassification {
            category: ExitCategory::Unknown,
            severity: Severity::Critical,
            retryable: false,
            status_tag: "error",
        },
        -2 => ExitClassification {
            category: ExitCategory::Device,
            severity: Severity::Fatal,
            retryable: false,
            status_tag: "gpu_watchdog",
        },
        -7..=-3 => ExitClassification {
            category: ExitCategory::Backend,
            severity: Severity::Critical,
            retryable: false,
            status_tag: "backend_init",
        },
        -11..=-8 => ExitClassification {
            category: ExitCategory::Backend,
            severity: Severity::Critical,
            retryable: false,
            status_tag: "backend_error",
        },
        _ => ExitClassification {
            category: ExitCategory::Unknown,
            severity: Severity::Critical,
            retryable: false,
            status_tag: "unknown",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn success_codes() {
        assert_eq!(classify_exit_code(0).status_tag, "cracked");
        assert_eq!(classify_exit_code(1).status_tag, "exhausted");
        assert!(!classify_exit_code(0).retryable);
        assert!(!classify_exit_code(1).retryable);
    }

    #[test]
    fn retryable_codes() {
        for code in 2..=4 {
            let c = classify_exit_code(code);
            assert_eq!(c.category, ExitCategory::Retryable);
            assert!(c.retryable);
        }
    }

    #[test]
    fn device_watchdog_is_fatal_non_retryable() {
        let c = classify_exit_code(-2);
        assert_eq!(c.severity, Severity::Fatal);
        assert!(!c.retryable);
    }

    #[test]
    fn backend_range_is_critical_non_retryable() {
        for code in -7..=-3 {
            let c = classify_exit_code(code);
            assert_eq!(c.category, ExitCategory::Backend);
            assert!(!c.retryable);
        }
        for code in -11..=-8 {
            let c = classify_exit_code(code);
            assert_eq!(c.category, ExitCategory::Backend);
            assert!(!c.retryable);
        }
    }

    #[test]
    fn unrecognized_codes_fall_back_to_unknown() {
        assert_eq!(classify_exit_code(42).status_tag, "unknown");
        assert_eq!(classify_exit_code(-42).status_tag, "unknown");
    }

    proptest! {
        #[test]
        fn total_function_no_panics(code in any::<i32>()) {
            let _ = classify_exit_code(code);
        }
    }
}
