// [libs/core/attack-params/src/path_sandbox.rs]
//! `safe_path`: resolve a server-supplied relative path under a
//! configured base directory, rejecting anything that would escape it.
//!
//! This is lexical only — no filesystem access beyond making a
//! relative `base` absolute against the current directory. `Path::join`
//! lets an absolute `rel` silently replace `base`, so we reject
//! absolute input before joining, then strip `.`/`..` components by
//! hand rather than trusting string prefix comparison.

use crate::errors::ArgBuildError;
use std::path::{Component, Path, PathBuf};

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn absolute(path: &Path) -> Result<PathBuf, ArgBuildError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().map_err(|e| ArgBuildError::Io(e.to_string()))?;
        Ok(cwd.join(path))
    }
}

/// Resolves `rel` under `base`, guaranteeing the result is absolute
/// and equal to (or nested under) the normalized `base` — or returns
/// `PathEscapesBase`. No other outcome is possible.
pub fn safe_path(base: &Path, rel: &str) -> Result<PathBuf, ArgBuildError> {
    let rel_path = Path::new(rel);
    if rel_path.is_absolute() || rel_path.components().any(|c| matches!(c, Component::Prefix(_))) {
        return Err(ArgBuildError::PathEscapesBase(rel_path.to_path_buf()));
    }

    let base_abs = lexically_normalize(&absolute(base)?);
    let joined = base_abs.join(rel_path);
    let cleaned = lexically_normalize(&joined);

    if cleaned == base_abs || cleaned.starts_with(&base_abs) {
        Ok(cleaned)
    } else {
        Err(ArgBuildError::PathEscapesBase(rel_path.to_path_buf()))
    }
}

/// Like `safe_path`, but additionally requires the resolved path to
/// exist on disk.
pub fn safe_existing_path(base: &Path, rel: &str) -> Result<PathBuf, ArgBuildError> {
    let resolved = safe_path(base, rel)?;
    if resolved.exists() {
        Ok(resolved)
    } else {
        Err(ArgBuildError::PathNotFound(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_absolute_input() {
        let base = Path::new("/data/files");
        assert!(matches!(
            safe_path(base, "/etc/passwd"),
            Err(ArgBuildError::PathEscapesBase(_))
        ));
    }

    #[test]
    fn rejects_parent_traversal() {
        let base = Path::new("/data/files");
        assert!(matches!(
            safe_path(base, "../../etc/passwd"),
            Err(ArgBuildError::PathEscapesBase(_))
        ));
    }

    #[test]
    fn accepts_plain_relative_path() {
        let base = Path::new("/data/files");
        let resolved = safe_path(base, "rockyou.txt").unwrap();
        assert_eq!(resolved, Path::new("/data/files/rockyou.txt"));
    }

    #[test]
    fn accepts_nested_relative_path() {
        let base = Path::new("/data/files");
        let resolved = safe_path(base, "wordlists/rockyou.txt").unwrap();
        assert_eq!(resolved, Path::new("/data/files/wordlists/rockyou.txt"));
    }

    #[test]
    fn allows_internal_dotdot_that_stays_inside_base() {
        let base = Path::new("/data/files");
        let resolved = safe_path(base, "sub/../rockyou.txt").unwrap();
        assert_eq!(resolved, Path::new("/data/files/rockyou.txt"));
    }

    #[test]
    fn resolving_base_itself_is_allowed() {
        let base = Path::new("/data/files");
        let resolved = safe_path(base, ".").unwrap();
        assert_eq!(resolved, Path::new("/data/files"));
    }

    proptest! {
        #[test]
        fn total_function_no_panics(rel in "\\PC{0,64}") {
            let base = Path::new("/data/files");
            match safe_path(base, &rel) {
                Ok(p) => prop_assert!(p == base || p.starts_with(base)),
                Err(ArgBuildError::PathEscapesBase(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error variant: {other:?}"),
            }
        }
    }
}
