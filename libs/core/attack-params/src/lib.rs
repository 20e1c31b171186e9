// [libs/core/attack-params/src/lib.rs]
//! Validates coordinator-issued attack parameters and turns them into
//! the cracker binary's argv, with all file references resolved and
//! sandboxed under the agent's configured files directory.

mod builder;
mod errors;
mod path_sandbox;

pub use builder::{attack_mode_from_code, to_command_args, to_restore_args, validate};
pub use errors::ArgBuildError;
pub use path_sandbox::safe_existing_path;
