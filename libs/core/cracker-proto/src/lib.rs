// [libs/core/cracker-proto/src/lib.rs]
//! Pure decoders for everything the cracker process emits: crack
//! lines tailed from the output file, `--status-json` stdout objects,
//! its exit code, and its stderr diagnostics.

mod crack_line;
mod exit_code;
mod stderr_line;
mod stdout_line;

pub use crack_line::{decode_crack_line, CrackLineWarning};
pub use exit_code::{classify_exit_code, ExitCategory, ExitClassification, Severity};
pub use stderr_line::{classify_stderr_line, StderrCategory, StderrClassification};
pub use stdout_line::{classify_stdout_line, StdoutLine};
