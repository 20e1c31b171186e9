// [apps/agent/src/lib.rs]
/*!
 * =================================================================
 * CIPHERSWARM AGENT — LIBRARY ROOT
 *
 * Re-exports the pieces `main.rs` wires together so the binary stays
 * a thin bootstrap shell: parse CLI, load config, start logging,
 * build the coordinator client, and hand off to the control loop.
 * =================================================================
 */

pub mod bootstrap;
pub mod cli;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod control_loop;
pub mod errors;
pub mod logging;
pub mod supervisor;

pub use cli::Cli;
pub use context::AgentContext;
pub use control_loop::AgentLoop;
