//! Plan compilation: layered parameter merging with a fixed precedence and
//! assembly of the ordered stage list.

use std::fs;
use std::path::{Path, PathBuf};

use auth_hooks::AuthBlock;
use serde_json::{json, Value};
use tracing::info;
use webscan_core::{fsutil, ScanConfig, ScanError, PLAN_FILE_NAME, REPORTS_MOUNT};

use crate::plan::{
    Context, Env, EnvParameters, Job, JobKind, Params, Plan, PolicyDefinition, Rule,
};
use crate::preset::{Overrides, ScanPreset};

/// Scanner rule id for SQL injection, referenced by the optional
/// active-scan-policy stage.
const SQLI_RULE_ID: u32 = 40018;

/// Merge stage parameters with fixed precedence, lowest to highest:
/// built-in defaults < preset file values < values owned by the scan
/// configuration. Owned values are applied last so CLI/config-level
/// settings can never be silently overridden by a preset.
pub fn layered_merge(defaults: Params, preset: Option<&Overrides>, owned: Params) -> Params {
    let mut merged = defaults;
    if let Some(overrides) = preset {
        for (k, v) in overrides {
            merged.insert(k.clone(), v.clone());
        }
    }
    for (k, v) in owned {
        merged.insert(k, v);
    }
    merged
}

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Compile the ordered job pipeline from configuration, preset and the
/// optional authentication block.
///
/// Stage order is fixed: crawl, optional ajax-crawl, passive wait, optional
/// active-scan policy, active scan, final passive wait, then the three
/// report stages.
pub fn build_plan(
    config: &ScanConfig,
    preset: &ScanPreset,
    auth: Option<AuthBlock>,
) -> Result<Plan, ScanError> {
    if config.max_duration == 0 {
        return Err(ScanError::Config(
            "maxScanDurationInMins must be positive".into(),
        ));
    }
    if config.thread_per_host == 0 {
        return Err(ScanError::Config("threadPerHost must be positive".into()));
    }

    let mut jobs = Vec::new();

    // Crawl: duration/depth/breadth always come from the configuration;
    // other preset keys pass through.
    jobs.push(Job::new(
        JobKind::Crawl,
        layered_merge(
            Params::new(),
            preset.crawl.as_ref(),
            params(json!({
                "maxDuration": config.max_duration,
                "maxDepth": config.max_depth,
                "maxChildren": config.max_children,
            })),
        ),
    ));

    if config.ajax_crawl {
        jobs.push(Job::new(
            JobKind::AjaxCrawl,
            layered_merge(
                params(json!({
                    "maxDuration": config.max_duration,
                    "maxCrawlDepth": config.max_depth,
                    "numberOfBrowsers": 2,
                })),
                preset.ajax_crawl.as_ref(),
                Params::new(),
            ),
        ));
    }

    // One merged wait parameter set, reused for both wait stages.
    let wait = layered_merge(
        params(json!({ "maxDuration": 5 })),
        preset.passive_wait.as_ref(),
        Params::new(),
    );
    jobs.push(Job::new(JobKind::PassiveWait, wait.clone()));

    if let Some(rule) = preset.sqli_rule.as_ref().filter(|r| r.enabled) {
        jobs.push(Job {
            kind: JobKind::ActiveScanPolicy,
            parameters: params(json!({
                "attackStrength": rule.attack_strength,
                "alertThreshold": rule.alert_threshold,
            })),
            policy_definition: Some(PolicyDefinition {
                rules: vec![Rule {
                    id: SQLI_RULE_ID,
                    name: "SQL Injection".into(),
                }],
            }),
        });
    }

    jobs.push(Job::new(
        JobKind::ActiveScan,
        layered_merge(
            params(json!({ "policy": "Default Policy" })),
            preset.active_scan.as_ref(),
            params(json!({
                "maxScanDurationInMins": config.max_duration,
                "threadPerHost": config.thread_per_host,
            })),
        ),
    ));

    jobs.push(Job::new(JobKind::PassiveWait, wait));

    for (template, ext) in [
        ("traditional-html", "html"),
        ("traditional-json", "json"),
        ("traditional-xml", "xml"),
    ] {
        jobs.push(Job::new(
            JobKind::Report,
            params(json!({
                "template": template,
                "reportDir": REPORTS_MOUNT,
                "reportFile": format!("scan-report.{ext}"),
                "reportTitle": "Security Scanning Report",
                "reportDescription": format!("Target: {}", config.target_url),
            })),
        ));
    }

    Ok(Plan {
        env: Env {
            contexts: vec![Context {
                name: "Target Application".into(),
                urls: vec![config.target_url.clone()],
                include_paths: vec![format!("{}.*", config.target_url)],
                auth,
            }],
            parameters: EnvParameters::default(),
        },
        jobs,
    })
}

/// Serialize the plan into the scanner config directory. Directory creation
/// is idempotent; the file is written via a temp sibling and atomic rename.
pub fn write_plan(plan: &Plan, config_dir: &Path) -> Result<PathBuf, ScanError> {
    fs::create_dir_all(config_dir)?;
    let yaml = serde_yaml::to_string(plan)
        .map_err(|e| ScanError::Config(format!("serialize job plan: {e}")))?;
    let path = config_dir.join(PLAN_FILE_NAME);
    fsutil::write_atomic(&path, yaml.as_bytes())?;
    info!(path = %path.display(), jobs = plan.jobs.len(), "job plan written");
    Ok(path)
}
