use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;
use webscan_core::ScanError;

/// Partial parameter overrides for one pipeline stage.
pub type Overrides = serde_json::Map<String, serde_json::Value>;

/// On-disk scan preset: per-stage override maps plus an optional
/// SQL-injection rule block. Unknown top-level keys are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ScanPreset {
    #[serde(default)]
    pub crawl: Option<Overrides>,
    #[serde(default)]
    pub ajax_crawl: Option<Overrides>,
    #[serde(default)]
    pub passive_wait: Option<Overrides>,
    #[serde(default)]
    pub active_scan: Option<Overrides>,
    #[serde(default)]
    pub sqli_rule: Option<SqliRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliRule {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_strength")]
    pub attack_strength: String,
    #[serde(default = "default_threshold")]
    pub alert_threshold: String,
}

fn default_strength() -> String {
    "HIGH".into()
}

fn default_threshold() -> String {
    "MEDIUM".into()
}

/// Load a preset file. A missing or malformed file is a fatal configuration
/// error; scans must not silently run without their requested preset.
pub fn load_preset(path: &Path) -> Result<ScanPreset, ScanError> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::Config(format!("preset file not found: {}", path.display())),
        _ => ScanError::Io(e),
    })?;
    let preset: ScanPreset = serde_json::from_str(&raw)
        .map_err(|e| ScanError::Config(format!("invalid preset file {}: {e}", path.display())))?;
    info!(path = %path.display(), "loaded scan preset");
    Ok(preset)
}
