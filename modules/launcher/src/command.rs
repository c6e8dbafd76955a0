//! Assembly of the exact container invocation for one scan run.

use std::path::Path;

use auth_hooks::{AuthArtifact, HOOK_SCRIPT_NAME};
use webscan_core::{
    ScanConfig, ScanMode, CONFIG_MOUNT, PLAN_FILE_NAME, REPORTS_MOUNT, SCANNER_IMAGE, WORK_MOUNT,
};

/// A fully assembled external-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Space-joined rendering for logs.
    pub fn render(&self) -> String {
        let mut s = self.program.clone();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

/// Uid/gid of the invoking user; the container is started under this
/// identity so report files are not owned by root on the host.
pub fn current_identity() -> (u32, u32) {
    // SAFETY: getuid/getgid cannot fail and have no preconditions.
    unsafe { (libc::getuid(), libc::getgid()) }
}

/// Build the `docker run` invocation for the configured scan mode.
///
/// The run directory mounts read-write at the mode's mount point, the
/// scanner-config directory (when present) mounts read-only, and bearer
/// auth travels as header-injection environment variables so the job plan
/// never contains the token.
pub fn build_invocation(
    config: &ScanConfig,
    run_dir: &Path,
    network: Option<&str>,
    auth: &AuthArtifact,
    identity: (u32, u32),
) -> Invocation {
    let (uid, gid) = identity;
    let mount = match config.mode {
        ScanMode::Pipeline => REPORTS_MOUNT,
        _ => WORK_MOUNT,
    };

    let mut args: Vec<String> = vec![
        "run".into(),
        "--rm".into(),
        "--user".into(),
        format!("{uid}:{gid}"),
        "-v".into(),
        format!("{}:{}:rw", run_dir.display(), mount),
    ];

    if let Some(name) = network {
        args.push("--network".into());
        args.push(name.to_string());
    }

    let config_dir = config.config_dir();
    if config_dir.exists() {
        args.push("-v".into());
        args.push(format!("{}:{}:ro", config_dir.display(), CONFIG_MOUNT));
        if config_dir.join(HOOK_SCRIPT_NAME).exists() {
            args.push("-e".into());
            args.push(format!("ZAP_HOOKS={CONFIG_MOUNT}/{HOOK_SCRIPT_NAME}"));
        }
    }

    args.push("-e".into());
    args.push(format!("LC_ALL={}.UTF-8", config.locale));

    if let AuthArtifact::Header { name, value } = auth {
        args.push("-e".into());
        args.push(format!("ZAP_AUTH_HEADER_VALUE={value}"));
        args.push("-e".into());
        args.push(format!("ZAP_AUTH_HEADER={name}"));
    }

    args.push(SCANNER_IMAGE.into());
    args.extend(scan_args(config));

    for addon in &config.addons {
        args.push("-addoninstall".into());
        args.push(addon.clone());
    }

    Invocation {
        program: "docker".into(),
        args,
    }
}

fn report_flags() -> Vec<String> {
    vec![
        "-r".into(),
        "scan-report.html".into(),
        "-J".into(),
        "scan-report.json".into(),
        "-w".into(),
        "scan-report.xml".into(),
    ]
}

fn scan_args(config: &ScanConfig) -> Vec<String> {
    let locale_directive = format!("view.locale={}", config.locale);
    match config.mode {
        ScanMode::Quick => {
            let mut v = vec!["zap-baseline.py".into(), "-t".into(), config.target_url.clone()];
            v.extend(report_flags());
            v.extend(["-l".into(), "INFO".into(), "-config".into(), locale_directive]);
            v
        }
        ScanMode::Thorough => {
            let mut v = vec![
                "zap-full-scan.py".into(),
                "-t".into(),
                config.target_url.clone(),
            ];
            v.extend(report_flags());
            v.extend([
                "-l".into(),
                "INFO".into(),
                "-d".into(),
                "-m".into(),
                config.max_duration.to_string(),
                "-T".into(),
                "120".into(),
            ]);
            if config.ajax_crawl {
                v.push("-j".into());
            }
            let zap_opts = [
                format!("-config view.locale={}", config.locale),
                format!("-config spider.maxDuration={}", config.max_duration),
                format!("-config spider.maxDepth={}", config.max_depth),
                format!("-config spider.maxChildren={}", config.max_children),
                format!("-config scanner.threadPerHost={}", config.thread_per_host),
                format!("-config scanner.hostPerScan={}", config.hosts_per_scan),
            ]
            .join(" ");
            v.extend(["-z".into(), zap_opts]);
            v
        }
        ScanMode::Api => {
            let mut v = vec![
                "zap-api-scan.py".into(),
                "-t".into(),
                config.target_url.clone(),
            ];
            v.extend(report_flags());
            v.extend([
                "-l".into(),
                "INFO".into(),
                "-f".into(),
                "openapi".into(),
                "-config".into(),
                locale_directive,
            ]);
            v
        }
        ScanMode::Pipeline => vec![
            "zap.sh".into(),
            "-cmd".into(),
            "-autorun".into(),
            format!("{CONFIG_MOUNT}/{PLAN_FILE_NAME}"),
            "-config".into(),
            locale_directive,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cfg(mode: ScanMode, report_dir: PathBuf) -> ScanConfig {
        let mut c = ScanConfig::new(mode, "http://app:8080", report_dir);
        c.addons.clear();
        c
    }

    fn pos(args: &[String], needle: &str) -> Option<usize> {
        args.iter().position(|a| a == needle)
    }

    #[test]
    fn quick_scan_mounts_work_dir() {
        let c = cfg(ScanMode::Quick, PathBuf::from("/nonexistent/report"));
        let inv = build_invocation(&c, Path::new("/nonexistent/report/quick-x"), None, &AuthArtifact::None, (1000, 1000));
        assert_eq!(inv.program, "docker");
        assert_eq!(inv.args[..4], ["run", "--rm", "--user", "1000:1000"]);
        assert!(inv
            .args
            .contains(&"/nonexistent/report/quick-x:/zap/wrk:rw".to_string()));
        assert!(inv.args.contains(&"zap-baseline.py".to_string()));
        assert!(inv.args.contains(&"-e".to_string()));
        assert!(inv.args.contains(&"LC_ALL=ja_JP.UTF-8".to_string()));
        assert!(!inv.args.contains(&"--network".to_string()));
    }

    #[test]
    fn pipeline_scan_mounts_reports_dir_and_autoruns_plan() {
        let c = cfg(ScanMode::Pipeline, PathBuf::from("/out/report"));
        let inv = build_invocation(&c, Path::new("/out/report/fast-x"), None, &AuthArtifact::None, (0, 0));
        assert!(inv
            .args
            .contains(&"/out/report/fast-x:/zap/reports:rw".to_string()));
        let i = pos(&inv.args, "-autorun").unwrap();
        assert_eq!(inv.args[i + 1], "/zap/config/automation-plan.yaml");
        assert!(inv.args.contains(&"zap.sh".to_string()));
    }

    #[test]
    fn network_flag_present_only_when_resolved() {
        let c = cfg(ScanMode::Quick, PathBuf::from("/out/report"));
        let inv = build_invocation(
            &c,
            Path::new("/out/report/quick-x"),
            Some("webgoat_default"),
            &AuthArtifact::None,
            (0, 0),
        );
        let i = pos(&inv.args, "--network").unwrap();
        assert_eq!(inv.args[i + 1], "webgoat_default");
    }

    #[test]
    fn bearer_auth_injects_header_environment() {
        let c = cfg(ScanMode::Api, PathBuf::from("/out/report"));
        let auth = AuthArtifact::Header {
            name: "Authorization".into(),
            value: "Bearer tok".into(),
        };
        let inv = build_invocation(&c, Path::new("/out/report/api-x"), None, &auth, (0, 0));
        assert!(inv
            .args
            .contains(&"ZAP_AUTH_HEADER_VALUE=Bearer tok".to_string()));
        assert!(inv.args.contains(&"ZAP_AUTH_HEADER=Authorization".to_string()));
    }

    #[test]
    fn config_dir_mounts_read_only_with_hook_env() {
        let tmp = tempfile::tempdir().unwrap();
        let report_dir = tmp.path().join("report");
        let c = cfg(ScanMode::Quick, report_dir.clone());
        std::fs::create_dir_all(c.config_dir()).unwrap();
        std::fs::write(c.config_dir().join(HOOK_SCRIPT_NAME), "# hook").unwrap();
        let inv = build_invocation(&c, &report_dir.join("quick-x"), None, &AuthArtifact::None, (0, 0));
        assert!(inv
            .args
            .iter()
            .any(|a| a.ends_with(":/zap/config:ro")));
        assert!(inv
            .args
            .contains(&"ZAP_HOOKS=/zap/config/auth-hooks.py".to_string()));
    }

    #[test]
    fn thorough_scan_carries_tuning_directives() {
        let mut c = cfg(ScanMode::Thorough, PathBuf::from("/out/report"));
        c.ajax_crawl = true;
        let inv = build_invocation(&c, Path::new("/out/report/thorough-x"), None, &AuthArtifact::None, (0, 0));
        assert!(inv.args.contains(&"zap-full-scan.py".to_string()));
        assert!(inv.args.contains(&"-j".to_string()));
        let i = pos(&inv.args, "-z").unwrap();
        let z = &inv.args[i + 1];
        assert!(z.contains("spider.maxDuration=30"));
        assert!(z.contains("spider.maxDepth=10"));
        assert!(z.contains("spider.maxChildren=20"));
        assert!(z.contains("scanner.threadPerHost=10"));
        assert!(z.contains("scanner.hostPerScan=5"));
        let m = pos(&inv.args, "-m").unwrap();
        assert_eq!(inv.args[m + 1], "30");
    }

    #[test]
    fn addon_install_directives_appended_per_addon() {
        let mut c = cfg(ScanMode::Pipeline, PathBuf::from("/out/report"));
        c.addons = vec!["authhelper".into(), "jwt".into()];
        let inv = build_invocation(&c, Path::new("/out/report/fast-x"), None, &AuthArtifact::None, (0, 0));
        let installs: Vec<usize> = inv
            .args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-addoninstall")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(installs.len(), 2);
        assert_eq!(inv.args[installs[0] + 1], "authhelper");
        assert_eq!(inv.args[installs[1] + 1], "jwt");
        // Install directives come after the image reference.
        let img = pos(&inv.args, SCANNER_IMAGE).unwrap();
        assert!(installs[0] > img);
    }

    #[test]
    fn api_scan_selects_openapi_format() {
        let c = cfg(ScanMode::Api, PathBuf::from("/out/report"));
        let inv = build_invocation(&c, Path::new("/out/report/api-x"), None, &AuthArtifact::None, (0, 0));
        let i = pos(&inv.args, "-f").unwrap();
        assert_eq!(inv.args[i + 1], "openapi");
    }
}
