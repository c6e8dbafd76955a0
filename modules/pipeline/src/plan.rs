//! Serializable model of the scanner's automation plan.

use auth_hooks::AuthBlock;
use serde::Serialize;

/// Stage parameter map. Backed by a sorted map so serialization is
/// deterministic.
pub type Params = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Serialize)]
pub struct Plan {
    pub env: Env,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct Env {
    pub contexts: Vec<Context>,
    pub parameters: EnvParameters,
}

#[derive(Debug, Serialize)]
pub struct Context {
    pub name: String,
    pub urls: Vec<String>,
    #[serde(rename = "includePaths")]
    pub include_paths: Vec<String>,
    #[serde(flatten)]
    pub auth: Option<AuthBlock>,
}

#[derive(Debug, Serialize)]
pub struct EnvParameters {
    #[serde(rename = "failOnError")]
    pub fail_on_error: bool,
    #[serde(rename = "failOnWarning")]
    pub fail_on_warning: bool,
    #[serde(rename = "progressToStdout")]
    pub progress_to_stdout: bool,
}

impl Default for EnvParameters {
    fn default() -> Self {
        EnvParameters {
            fail_on_error: false,
            fail_on_warning: false,
            progress_to_stdout: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub parameters: Params,
    #[serde(rename = "policyDefinition", skip_serializing_if = "Option::is_none")]
    pub policy_definition: Option<PolicyDefinition>,
}

impl Job {
    pub fn new(kind: JobKind, parameters: Params) -> Self {
        Job {
            kind,
            parameters,
            policy_definition: None,
        }
    }
}

/// Pipeline stage kinds, serialized as the scanner's job type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobKind {
    #[serde(rename = "spider")]
    Crawl,
    #[serde(rename = "spiderAjax")]
    AjaxCrawl,
    #[serde(rename = "passiveScan-wait")]
    PassiveWait,
    #[serde(rename = "activeScan-policy")]
    ActiveScanPolicy,
    #[serde(rename = "activeScan")]
    ActiveScan,
    #[serde(rename = "report")]
    Report,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyDefinition {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub id: u32,
    pub name: String,
}
