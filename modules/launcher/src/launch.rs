use std::process::Command;

use tracing::{info, warn};
use webscan_core::ScanError;

use crate::command::Invocation;

/// Advisory exit code: the scan completed but produced findings worth
/// flagging. Treated as success.
const ADVISORY_EXIT: i32 = 2;

/// Run the assembled invocation, blocking until the scanner exits.
///
/// Returns the exit code for 0 and 2; any other code is surfaced verbatim
/// as a failure. There is no retry: a scan is expensive and non-idempotent
/// against the target.
pub fn launch(invocation: &Invocation) -> Result<i32, ScanError> {
    info!(command = %invocation.render(), "launching scanner");
    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .status()?;
    // Treat death-by-signal as a generic failure code.
    let code = status.code().unwrap_or(-1);
    match code {
        0 => Ok(0),
        ADVISORY_EXIT => {
            warn!("scan completed with advisory findings (exit 2)");
            Ok(ADVISORY_EXIT)
        }
        other => Err(ScanError::LaunchFailed { code: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> Invocation {
        Invocation {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
        }
    }

    #[test]
    fn clean_exit_succeeds() {
        assert_eq!(launch(&shell("exit 0")).unwrap(), 0);
    }

    #[test]
    fn advisory_exit_succeeds() {
        assert_eq!(launch(&shell("exit 2")).unwrap(), 2);
    }

    #[test]
    fn other_exit_codes_fail_verbatim() {
        match launch(&shell("exit 3")) {
            Err(ScanError::LaunchFailed { code }) => assert_eq!(code, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_io_error() {
        let inv = Invocation {
            program: "definitely-not-a-real-binary".into(),
            args: vec![],
        };
        assert!(matches!(launch(&inv), Err(ScanError::Io(_))));
    }
}
