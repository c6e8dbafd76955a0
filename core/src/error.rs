use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the scan pipeline.
///
/// Network-detection failures and per-file report repair failures are not
/// represented here: both are recovered locally and only logged.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid or missing preset file, or an invalid merged parameter.
    /// Fatal; aborts before the scanner is launched.
    #[error("invalid scan configuration: {0}")]
    Config(String),

    /// The hook-script template could not be located. Fatal, not retried.
    #[error("hook script template not found: {path}")]
    TemplateMissing { path: PathBuf },

    /// The scanner exited with a code other than 0 or 2. Surfaced verbatim;
    /// a partial scan cannot be safely resumed, so there is no retry.
    #[error("scanner exited with code {code}")]
    LaunchFailed { code: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_failed_carries_code() {
        let e = ScanError::LaunchFailed { code: 3 };
        assert_eq!(e.to_string(), "scanner exited with code 3");
    }

    #[test]
    fn config_error_message() {
        let e = ScanError::Config("maxScanDurationInMins must be positive".into());
        assert!(e.to_string().contains("maxScanDurationInMins"));
    }
}
