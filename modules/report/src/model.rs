//! Raw scanner report parsing and normalization into the summary model.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use webscan_core::timefmt::utc_to_jst;

use crate::risk::Risk;
use crate::score::{grade, score, Grade};

/// Top-level shape of the scanner's JSON report.
#[derive(Debug, Deserialize)]
pub struct ZapReport {
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub site: Vec<ZapSite>,
}

#[derive(Debug, Deserialize)]
pub struct ZapSite {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(default)]
    pub alerts: Vec<ZapAlert>,
}

#[derive(Debug, Deserialize)]
pub struct ZapAlert {
    #[serde(default)]
    pub alert: String,
    #[serde(default)]
    pub riskdesc: String,
    /// Occurrence count; the scanner serializes this as a string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub count: Option<u64>,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub instances: Vec<ZapInstance>,
}

#[derive(Debug, Deserialize)]
pub struct ZapInstance {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub param: String,
    #[serde(default)]
    pub attack: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub otherinfo: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Normalized report ready for summary output.
#[derive(Debug, Serialize)]
pub struct Report {
    pub site: String,
    /// Local (UTC+9) generation time, empty when the raw timestamp is
    /// missing or malformed.
    pub generated: String,
    pub score: u32,
    pub grade: Grade,
    pub summary: Vec<SummaryEntry>,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Serialize)]
pub struct SummaryEntry {
    pub name: String,
    pub risk: Risk,
    pub count: u64,
    pub urls: usize,
}

#[derive(Debug, Serialize)]
pub struct Finding {
    pub name: String,
    pub risk: Risk,
    pub description: String,
    pub solution: String,
    pub reference_urls: Vec<String>,
    pub instances: Vec<InstanceDetail>,
}

#[derive(Debug, Serialize)]
pub struct InstanceDetail {
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otherinfo: Option<String>,
}

/// Read and parse a raw scanner report from disk.
pub fn load_report(path: &Path) -> anyhow::Result<ZapReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading scan report {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing scan report {}", path.display()))
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Unwrap is fine: the pattern is a compile-time constant.
    RE.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

fn strip_paragraphs(text: &str) -> String {
    text.replace("<p>", "").replace("</p>", "")
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reference fields pack several links into one string; pull out anything
/// that looks like a URL, falling back to the cleaned text itself. The
/// paragraph tags become spaces so adjacent links stay separate tokens.
fn reference_urls(reference: &str) -> Vec<String> {
    let cleaned = reference.replace("<p>", " ").replace("</p>", " ");
    let urls: Vec<String> = url_pattern()
        .find_iter(&cleaned)
        .map(|m| m.as_str().to_string())
        .collect();
    if !urls.is_empty() {
        return urls;
    }
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        Vec::new()
    } else {
        vec![cleaned.to_string()]
    }
}

/// Convert a raw report into the normalized, severity-sorted model and
/// attach the derived score and grade.
pub fn normalize(raw: &ZapReport) -> Report {
    let site = raw.site.first();
    let site_name = site
        .map(|s| s.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let generated = if raw.created.is_empty() {
        String::new()
    } else {
        match utc_to_jst(&raw.created) {
            Ok(local) => local,
            Err(err) => {
                warn!(created = %raw.created, %err, "unparseable report timestamp");
                String::new()
            }
        }
    };

    let mut summary = Vec::new();
    let mut findings = Vec::new();
    for alert in site.map(|s| s.alerts.as_slice()).unwrap_or_default() {
        let risk = Risk::from_descriptor(&alert.riskdesc);
        let name = if alert.alert.is_empty() {
            "Unknown Alert".to_string()
        } else {
            alert.alert.clone()
        };

        let unique_urls: HashSet<&str> =
            alert.instances.iter().map(|i| i.uri.as_str()).collect();

        summary.push(SummaryEntry {
            name: name.clone(),
            risk,
            count: alert.count.unwrap_or(alert.instances.len() as u64),
            urls: unique_urls.len(),
        });

        let instances = alert
            .instances
            .iter()
            .map(|inst| InstanceDetail {
                url: inst.uri.clone(),
                method: if inst.method.is_empty() {
                    "GET".to_string()
                } else {
                    inst.method.clone()
                },
                param: non_blank(&inst.param),
                attack: non_blank(&inst.attack),
                evidence: non_blank(&inst.evidence),
                otherinfo: non_blank(&inst.otherinfo),
            })
            .collect();

        findings.push(Finding {
            name,
            risk,
            description: strip_paragraphs(&alert.desc),
            solution: strip_paragraphs(&alert.solution),
            reference_urls: reference_urls(&alert.reference),
            instances,
        });
    }

    // Stable sorts keep the scanner's alert order within a severity band.
    summary.sort_by_key(|e| e.risk);
    findings.sort_by_key(|f| f.risk);

    let risks: Vec<Risk> = findings.iter().map(|f| f.risk).collect();
    let total = score(&risks);

    Report {
        site: site_name,
        generated,
        score: total,
        grade: grade(total),
        summary,
        findings,
    }
}
