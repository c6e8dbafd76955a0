//! Sequential scan flow: compile configuration, stage auth material,
//! launch the scanner container and post-process its reports.

use std::path::Path;

use anyhow::{Context, Result};
use auth_hooks::{hook_script, materialize, AuthArtifact, HOOK_SCRIPT_NAME};
use job_pipeline::{build_plan, load_preset, write_plan, ScanPreset};
use network_detect::resolve_network;
use report_score::{load_report, normalize, repair_run_dir, Report, Risk};
use serde_json::json;
use tracing::{info, warn};
use webscan_core::fsutil::{default_project_root, write_atomic};
use webscan_core::{ScanConfig, ScanMode};
use zap_launcher::{build_invocation, create_run_dir, current_identity, launch, setup_directories};

/// Run one scan end to end and return the JSON summary line.
pub fn run(config: &ScanConfig) -> Result<serde_json::Value> {
    setup_directories(config)?;

    let preset = match &config.preset_file {
        Some(path) => load_preset(path)?,
        None => ScanPreset::default(),
    };

    let auth = materialize(config);
    stage_hook_script(config)?;

    if config.mode == ScanMode::Pipeline {
        let auth_block = match &auth {
            AuthArtifact::Context(block) => Some(block.clone()),
            _ => None,
        };
        let plan = build_plan(config, &preset, auth_block)?;
        let path = write_plan(&plan, &config.config_dir())?;
        info!(plan = %path.display(), "compiled job plan");
    }

    let run_dir = create_run_dir(config)?;
    info!(dir = %run_dir.display(), "created run directory");

    let network = config
        .network_name
        .clone()
        .or_else(|| resolve_network(&config.target_url));

    let invocation = build_invocation(config, &run_dir, network.as_deref(), &auth, current_identity());
    let exit_code = launch(&invocation)?;

    let repaired = repair_run_dir(&run_dir);
    info!(repaired, "re-encoded report files");

    let report = parse_report(&run_dir);
    Ok(summary_line(&run_dir, exit_code, report.as_ref()))
}

/// Write the rendered auth hook script into the scanner-config directory.
/// Schemes without a script (none, bearer) leave the directory untouched.
fn stage_hook_script(config: &ScanConfig) -> Result<()> {
    let template_dir = default_project_root().join("resources").join("templates");
    let Some(script) = hook_script(config, &template_dir)? else {
        return Ok(());
    };
    let path = config.config_dir().join(HOOK_SCRIPT_NAME);
    write_atomic(&path, script.as_bytes())
        .with_context(|| format!("writing hook script {}", path.display()))?;
    info!(script = %path.display(), "staged auth hook script");
    Ok(())
}

fn parse_report(run_dir: &Path) -> Option<Report> {
    let path = run_dir.join("scan-report.json");
    if !path.exists() {
        warn!(file = %path.display(), "no JSON report produced");
        return None;
    }
    match load_report(&path) {
        Ok(raw) => Some(normalize(&raw)),
        Err(err) => {
            warn!(file = %path.display(), %err, "unreadable JSON report");
            None
        }
    }
}

fn summary_line(run_dir: &Path, exit_code: i32, report: Option<&Report>) -> serde_json::Value {
    let Some(report) = report else {
        return json!({
            "run_dir": run_dir,
            "exit_code": exit_code,
        });
    };
    let count = |risk: Risk| report.findings.iter().filter(|f| f.risk == risk).count();
    json!({
        "run_dir": run_dir,
        "exit_code": exit_code,
        "site": report.site,
        "generated": report.generated,
        "score": report.score,
        "grade": report.grade,
        "findings": {
            "high": count(Risk::High),
            "medium": count(Risk::Medium),
            "low": count(Risk::Low),
            "informational": count(Risk::Informational),
        },
    })
}
