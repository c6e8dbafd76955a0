//! Container invocation assembly and blocking execution of the scanner.

mod command;
mod launch;
mod rundir;

pub use command::{build_invocation, current_identity, Invocation};
pub use launch::launch;
pub use rundir::{create_run_dir, setup_directories};
