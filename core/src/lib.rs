//! Core types and shared utilities for the scan orchestrator.

pub mod config;
pub mod error;
pub mod fsutil;
pub mod timefmt;

pub use config::{
    AuthScheme, ScanConfig, ScanMode, CONFIG_MOUNT, PLAN_FILE_NAME, REPORTS_MOUNT, SCANNER_IMAGE,
    WORK_MOUNT,
};
pub use error::ScanError;

pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }

    #[test]
    fn wire_constants_visible_at_crate_root() {
        assert_eq!(WORK_MOUNT, "/zap/wrk");
        assert_eq!(REPORTS_MOUNT, "/zap/reports");
        assert_eq!(CONFIG_MOUNT, "/zap/config");
        assert_eq!(PLAN_FILE_NAME, "automation-plan.yaml");
        assert!(SCANNER_IMAGE.starts_with("ghcr.io/"));
    }
}
