use serde::Serialize;
use tracing::debug;
use webscan_core::{AuthScheme, ScanConfig};

/// Authentication material for one scan run. Created once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthArtifact {
    /// No authentication configured.
    None,
    /// Inline pipeline authentication block for form/JSON/basic schemes.
    Context(AuthBlock),
    /// Request-header pair for bearer tokens. The pipeline authentication
    /// facility cannot model static headers, so bearer auth is injected via
    /// environment at launch time instead.
    Header { name: String, value: String },
}

impl AuthArtifact {
    pub fn is_none(&self) -> bool {
        matches!(self, AuthArtifact::None)
    }
}

/// Context-level authentication block serialized into the job plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthBlock {
    pub authentication: Authentication,
    #[serde(rename = "sessionManagement")]
    pub session_management: SessionManagement,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Authentication {
    pub method: String,
    pub parameters: BrowserParams,
    pub verification: Verification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserParams {
    #[serde(rename = "loginPageUrl")]
    pub login_page_url: String,
    #[serde(rename = "loginPageWait")]
    pub login_page_wait: u32,
    #[serde(rename = "browserId")]
    pub browser_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub method: String,
    #[serde(rename = "loggedInRegex", skip_serializing_if = "Option::is_none")]
    pub logged_in_regex: Option<String>,
    #[serde(rename = "loggedOutRegex", skip_serializing_if = "Option::is_none")]
    pub logged_out_regex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionManagement {
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub name: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Build the authentication artifact for the configured scheme.
pub fn materialize(config: &ScanConfig) -> AuthArtifact {
    match config.auth {
        AuthScheme::None => AuthArtifact::None,
        AuthScheme::Bearer => {
            let token = config.auth_token.as_deref().unwrap_or_default();
            AuthArtifact::Header {
                name: config.auth_header.clone(),
                value: bearer_header_value(&config.token_prefix, token),
            }
        }
        AuthScheme::Form | AuthScheme::Json | AuthScheme::Basic => {
            debug!(scheme = ?config.auth, "materializing browser auth block");
            AuthArtifact::Context(browser_auth_block(config))
        }
    }
}

/// `<prefix> <token>` trimmed; the literal prefix `none` (any case) means the
/// token is sent bare.
pub fn bearer_header_value(prefix: &str, token: &str) -> String {
    if prefix.eq_ignore_ascii_case("none") {
        token.trim().to_string()
    } else {
        format!("{} {}", prefix, token).trim().to_string()
    }
}

fn browser_auth_block(config: &ScanConfig) -> AuthBlock {
    let username = config.username.clone().unwrap_or_default();
    let password = config.password.clone().unwrap_or_default();
    let login_url = config
        .login_url
        .clone()
        .unwrap_or_else(|| config.target_url.clone());

    let has_indicator =
        config.logged_in_indicator.is_some() || config.logged_out_indicator.is_some();
    let verification = if has_indicator {
        Verification {
            method: "response".into(),
            logged_in_regex: config.logged_in_indicator.clone(),
            logged_out_regex: config.logged_out_indicator.clone(),
        }
    } else {
        Verification {
            method: "autodetect".into(),
            logged_in_regex: None,
            logged_out_regex: None,
        }
    };

    AuthBlock {
        authentication: Authentication {
            method: "browser".into(),
            parameters: BrowserParams {
                login_page_url: login_url,
                login_page_wait: 5,
                browser_id: "firefox-headless".into(),
            },
            verification,
        },
        session_management: SessionManagement {
            method: "autodetect".into(),
        },
        users: vec![User {
            name: username.clone(),
            credentials: Credentials { username, password },
        }],
    }
}
