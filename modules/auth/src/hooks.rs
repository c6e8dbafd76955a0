//! Hook-script generation for launcher-driven scans.
//!
//! The scanner container loads a Python hook file that configures an
//! authentication context through the engine API. The script is rendered
//! from an on-disk template against a fixed schema of named fields; every
//! user-controlled field is escaped before insertion.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;
use url::form_urlencoded;
use webscan_core::{AuthScheme, ScanConfig, ScanError};

/// File name the rendered hook script is written under in the scanner
/// config directory.
pub const HOOK_SCRIPT_NAME: &str = "auth-hooks.py";

const FORM_TEMPLATE: &str = "auth-hooks.py.tmpl";
const BEARER_TEMPLATE: &str = "auth-hooks-bearer.py.tmpl";

/// Render the hook script for the configured scheme, or `None` for schemes
/// that do not use one (`none` needs no auth; `bearer` is injected via
/// environment variables instead).
pub fn hook_script(config: &ScanConfig, template_dir: &Path) -> Result<Option<String>, ScanError> {
    match config.auth {
        AuthScheme::None | AuthScheme::Bearer => Ok(None),
        AuthScheme::Form | AuthScheme::Json | AuthScheme::Basic => {
            let template = load_template(template_dir, FORM_TEMPLATE)?;
            let fields = form_fields(config);
            debug!(scheme = ?config.auth, "rendering auth hook script");
            Ok(Some(render_template(&template, &fields)))
        }
    }
}

/// Bearer variant for direct API-driven use outside the pipeline path:
/// installs a request-header replacement rule instead of form credentials.
pub fn bearer_hook_script(
    header_name: &str,
    header_value: &str,
    template_dir: &Path,
) -> Result<String, ScanError> {
    let template = load_template(template_dir, BEARER_TEMPLATE)?;
    let fields = vec![
        ("header_name", python_quote(header_name)),
        ("header_value", python_quote(header_value)),
    ];
    Ok(render_template(&template, &fields))
}

/// Substitute `{name}` placeholders for the given field values. Fields not
/// present in the template are ignored; unknown placeholders are left
/// untouched so a template/schema mismatch is visible in the output.
pub fn render_template(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in fields {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

fn load_template(dir: &Path, name: &str) -> Result<String, ScanError> {
    let path = dir.join(name);
    fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::TemplateMissing { path },
        _ => ScanError::Io(e),
    })
}

fn form_fields(config: &ScanConfig) -> Vec<(&'static str, String)> {
    let username = config.username.as_deref().unwrap_or_default();
    let password = config.password.as_deref().unwrap_or_default();
    let login_url = config
        .login_url
        .as_deref()
        .unwrap_or(config.target_url.as_str());

    let login_data: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(&config.username_field, username)
        .append_pair(&config.password_field, password)
        .finish();

    let logged_in = config.logged_in_indicator.as_deref().unwrap_or_default();
    let logged_out = config.logged_out_indicator.as_deref().unwrap_or_default();

    vec![
        ("auth_method", python_quote(auth_method(config.auth))),
        ("login_url", python_quote(login_url)),
        ("login_data", python_quote(&login_data)),
        ("username", python_quote(username)),
        ("credentials", python_quote(&login_data)),
        ("logged_in_regex", python_quote(&literal_regex(logged_in))),
        ("logged_out_regex", python_quote(&literal_regex(logged_out))),
        (
            "target_pattern",
            python_quote(&format!("{}.*", config.target_url)),
        ),
    ]
}

fn auth_method(scheme: AuthScheme) -> &'static str {
    match scheme {
        AuthScheme::Form => "formBasedAuthentication",
        AuthScheme::Json => "jsonBasedAuthentication",
        AuthScheme::Basic => "httpAuthentication",
        AuthScheme::None | AuthScheme::Bearer => "",
    }
}

/// Wrap a free-text indicator in a `\Q..\E` literal region so it cannot
/// inject regex syntax. Embedded `\E` sequences would terminate the region
/// early and are stripped first. Empty indicators stay empty.
fn literal_regex(indicator: &str) -> String {
    if indicator.is_empty() {
        return String::new();
    }
    format!(".*\\Q{}\\E.*", indicator.replace("\\E", ""))
}

/// Escape a value for insertion into a double-quoted Python string literal.
fn python_quote(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
