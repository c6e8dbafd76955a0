use std::path::PathBuf;

/// Container mount point for the run directory in fixed-mode scans.
pub const WORK_MOUNT: &str = "/zap/wrk";
/// Container mount point for the run directory in pipeline-driven scans.
/// Must match the report stages of the compiled job plan.
pub const REPORTS_MOUNT: &str = "/zap/reports";
/// Container mount point for the read-only scanner config directory.
pub const CONFIG_MOUNT: &str = "/zap/config";
/// File name of the compiled job plan inside the config directory.
pub const PLAN_FILE_NAME: &str = "automation-plan.yaml";
/// Scanner container image.
pub const SCANNER_IMAGE: &str = "ghcr.io/zaproxy/zaproxy:stable";

/// Which scanner entry point to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Passive baseline scan.
    Quick,
    /// Full crawl plus active attack phase.
    Thorough,
    /// OpenAPI-driven scan.
    Api,
    /// Automation-framework scan driven by a compiled job plan.
    Pipeline,
}

impl ScanMode {
    /// Prefix used for run-directory names. The pipeline mode is displayed
    /// as `fast` in output paths.
    pub fn display_prefix(self) -> &'static str {
        match self {
            ScanMode::Quick => "quick",
            ScanMode::Thorough => "thorough",
            ScanMode::Api => "api",
            ScanMode::Pipeline => "fast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    None,
    Form,
    Json,
    Basic,
    Bearer,
}

/// Fully validated scan configuration, produced by the CLI layer.
///
/// Upstream validation guarantees that scheme-appropriate credentials are
/// present when `auth` is not `None`; the compiler still re-checks numeric
/// bounds before launch.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub mode: ScanMode,
    pub target_url: String,

    pub auth: AuthScheme,
    pub username: Option<String>,
    pub password: Option<String>,
    pub login_url: Option<String>,
    pub username_field: String,
    pub password_field: String,
    pub logged_in_indicator: Option<String>,
    pub logged_out_indicator: Option<String>,

    pub auth_token: Option<String>,
    pub auth_header: String,
    pub token_prefix: String,

    pub ajax_crawl: bool,
    /// Maximum scan duration in minutes.
    pub max_duration: u32,
    pub max_depth: u32,
    pub max_children: u32,
    pub thread_per_host: u32,
    pub hosts_per_scan: u32,

    /// Explicit Docker network override; skips auto-detection when set.
    pub network_name: Option<String>,
    pub locale: String,
    /// Optional JSON preset file with per-stage parameter overrides.
    pub preset_file: Option<PathBuf>,
    /// Scanner add-on identifiers to install at startup.
    pub addons: Vec<String>,
    pub report_dir: PathBuf,
}

impl ScanConfig {
    pub fn new(mode: ScanMode, target_url: impl Into<String>, report_dir: PathBuf) -> Self {
        ScanConfig {
            mode,
            target_url: target_url.into(),
            auth: AuthScheme::None,
            username: None,
            password: None,
            login_url: None,
            username_field: "username".into(),
            password_field: "password".into(),
            logged_in_indicator: None,
            logged_out_indicator: None,
            auth_token: None,
            auth_header: "Authorization".into(),
            token_prefix: "Bearer".into(),
            ajax_crawl: false,
            max_duration: 30,
            max_depth: 10,
            max_children: 20,
            thread_per_host: 10,
            hosts_per_scan: 5,
            network_name: None,
            locale: "ja_JP".into(),
            preset_file: None,
            addons: vec!["authhelper".into()],
            report_dir,
        }
    }

    /// Directory holding the compiled plan and hook script, a sibling of the
    /// report directory.
    pub fn config_dir(&self) -> PathBuf {
        self.report_dir
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("scanner-config")
    }

    /// Run-directory prefix: preset file stem when a preset is configured,
    /// otherwise the scan mode's display prefix.
    pub fn run_prefix(&self) -> String {
        self.preset_file
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.mode.display_prefix().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(mode: ScanMode) -> ScanConfig {
        ScanConfig::new(mode, "http://example.com", PathBuf::from("/tmp/out/report"))
    }

    #[test]
    fn pipeline_mode_displays_as_fast() {
        assert_eq!(ScanMode::Pipeline.display_prefix(), "fast");
        assert_eq!(base(ScanMode::Pipeline).run_prefix(), "fast");
    }

    #[test]
    fn preset_stem_wins_over_mode_prefix() {
        let mut cfg = base(ScanMode::Pipeline);
        cfg.preset_file = Some(PathBuf::from("/etc/presets/deep-sqli.json"));
        assert_eq!(cfg.run_prefix(), "deep-sqli");
    }

    #[test]
    fn config_dir_is_sibling_of_report_dir() {
        let cfg = base(ScanMode::Quick);
        assert_eq!(cfg.config_dir(), PathBuf::from("/tmp/out/scanner-config"));
    }

    #[test]
    fn defaults_match_upstream_contract() {
        let cfg = base(ScanMode::Quick);
        assert_eq!(cfg.max_duration, 30);
        assert_eq!(cfg.max_depth, 10);
        assert_eq!(cfg.max_children, 20);
        assert_eq!(cfg.thread_per_host, 10);
        assert_eq!(cfg.addons, vec!["authhelper".to_string()]);
        assert_eq!(cfg.locale, "ja_JP");
    }
}
