use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use webscan_core::{AuthScheme, ScanConfig, ScanMode};

mod flow;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Mode {
    /// Passive baseline scan
    Quick,
    /// Full crawl plus active attack phase
    Thorough,
    /// OpenAPI-driven scan
    Api,
    /// Automation-framework scan driven by a compiled job plan
    Pipeline,
}

impl From<Mode> for ScanMode {
    fn from(mode: Mode) -> ScanMode {
        match mode {
            Mode::Quick => ScanMode::Quick,
            Mode::Thorough => ScanMode::Thorough,
            Mode::Api => ScanMode::Api,
            Mode::Pipeline => ScanMode::Pipeline,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Auth {
    None,
    Form,
    Json,
    Basic,
    Bearer,
}

impl From<Auth> for AuthScheme {
    fn from(auth: Auth) -> AuthScheme {
        match auth {
            Auth::None => AuthScheme::None,
            Auth::Form => AuthScheme::Form,
            Auth::Json => AuthScheme::Json,
            Auth::Basic => AuthScheme::Basic,
            Auth::Bearer => AuthScheme::Bearer,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "webscan", version, about = "Containerized web security scan launcher")]
struct Cli {
    /// Scan mode
    #[arg(value_enum)]
    mode: Mode,
    /// Target URL to scan
    target_url: String,

    /// Authentication scheme (default: none)
    #[arg(long, value_enum, default_value_t = Auth::None, help_heading = "Authentication")]
    auth: Auth,
    /// Username for authentication
    #[arg(long, help_heading = "Authentication")]
    username: Option<String>,
    /// Password for authentication
    #[arg(long, help_heading = "Authentication")]
    password: Option<String>,
    /// Login endpoint URL (defaults to the target URL)
    #[arg(long, help_heading = "Authentication")]
    login_url: Option<String>,
    /// Username form field name
    #[arg(long, default_value = "username", help_heading = "Authentication")]
    username_field: String,
    /// Password form field name
    #[arg(long, default_value = "password", help_heading = "Authentication")]
    password_field: String,
    /// Indicator text proving the logged-in state
    #[arg(long, help_heading = "Authentication")]
    logged_in_indicator: Option<String>,
    /// Indicator text proving the logged-out state
    #[arg(long, help_heading = "Authentication")]
    logged_out_indicator: Option<String>,
    /// Bearer token
    #[arg(long, help_heading = "Authentication")]
    token: Option<String>,
    /// Header the token is sent in
    #[arg(long, default_value = "Authorization", help_heading = "Authentication")]
    auth_header: String,
    /// Token prefix; the literal "none" sends the token bare
    #[arg(long, default_value = "Bearer", help_heading = "Authentication")]
    token_prefix: String,

    /// Enable the browser-driven crawler for JavaScript-heavy sites
    #[arg(long, help_heading = "Scan options")]
    ajax: bool,
    /// Maximum scan duration in minutes
    #[arg(long, default_value_t = 30, help_heading = "Scan options")]
    max_duration: u32,
    /// Maximum crawl depth
    #[arg(long, default_value_t = 10, help_heading = "Scan options")]
    max_depth: u32,
    /// Maximum children per crawled node
    #[arg(long, default_value_t = 20, help_heading = "Scan options")]
    max_children: u32,
    /// Active-scan threads per host
    #[arg(long, default_value_t = 10, help_heading = "Scan options")]
    thread_per_host: u32,
    /// Hosts scanned concurrently
    #[arg(long, default_value_t = 5, help_heading = "Scan options")]
    hosts_per_scan: u32,
    /// Docker network name (skips auto-detection)
    #[arg(long, value_name = "NAME", help_heading = "Scan options")]
    network: Option<String>,
    /// Scanner UI locale
    #[arg(long, default_value = "ja_JP", help_heading = "Scan options")]
    locale: String,
    /// JSON preset file with per-stage parameter overrides
    #[arg(long, value_name = "FILE", help_heading = "Scan options")]
    preset: Option<PathBuf>,
    /// Scanner add-on to install at startup (repeatable)
    #[arg(long = "addon", value_name = "ID", help_heading = "Scan options")]
    addons: Vec<String>,
    /// Directory to save reports (default: ./report)
    #[arg(long, value_name = "DIR", help_heading = "Scan options")]
    report_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<ScanConfig> {
        let report_dir = match self.report_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?.join("report"),
        };
        let mut config = ScanConfig::new(self.mode.into(), self.target_url, report_dir);
        config.auth = self.auth.into();
        config.username = self.username;
        config.password = self.password;
        config.login_url = self.login_url;
        config.username_field = self.username_field;
        config.password_field = self.password_field;
        config.logged_in_indicator = self.logged_in_indicator;
        config.logged_out_indicator = self.logged_out_indicator;
        config.auth_token = self.token;
        config.auth_header = self.auth_header;
        config.token_prefix = self.token_prefix;
        config.ajax_crawl = self.ajax;
        config.max_duration = self.max_duration;
        config.max_depth = self.max_depth;
        config.max_children = self.max_children;
        config.thread_per_host = self.thread_per_host;
        config.hosts_per_scan = self.hosts_per_scan;
        config.network_name = self.network;
        config.locale = self.locale;
        config.preset_file = self.preset;
        if !self.addons.is_empty() {
            config.addons = self.addons;
        }

        match config.auth {
            AuthScheme::Form | AuthScheme::Json | AuthScheme::Basic => {
                if config.username.is_none() || config.password.is_none() {
                    return Err(anyhow!(
                        "--username and --password are required for this auth scheme"
                    ));
                }
            }
            AuthScheme::Bearer => {
                if config.auth_token.is_none() {
                    return Err(anyhow!("--token is required for bearer auth"));
                }
            }
            AuthScheme::None => {}
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    let summary = flow::run(&config)?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
