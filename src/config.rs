//!
//! IdP configuration
//! -----------------
//! Process-wide settings resolved once at startup. Environment variables supply
//! the values, command-line flags override them, and anything missing or
//! unparseable falls back to the defaults below.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8002;
pub const DEFAULT_RP_ORIGIN: &str = "http://localhost:8001";
/// 30 days, matching the usual cookie-store default.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 3600;

#[derive(Debug, Clone)]
pub struct IdpConfig {
    pub port: u16,
    /// Public origin the IdP is reachable at; used to build absolute discovery URLs.
    pub base_url: String,
    /// The only origin allowed to read assertion responses cross-origin.
    pub rp_origin: String,
    /// Cookie signing secret. `None` means a random per-process secret.
    pub session_secret: Option<Vec<u8>>,
    pub session_max_age_secs: i64,
    pub secure_cookies: bool,
    /// Optional login template overriding the embedded one.
    pub login_template: Option<PathBuf>,
}

impl Default for IdpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{}", DEFAULT_PORT),
            rp_origin: DEFAULT_RP_ORIGIN.to_string(),
            session_secret: None,
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            secure_cookies: true,
            login_template: None,
        }
    }
}

fn parse_port_env(name: &str) -> Option<u16> {
    match env::var(name) {
        Ok(val) => val.parse::<u16>().ok(),
        Err(_) => None,
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
        i += 1;
    }
    None
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

pub const USAGE: &str = "fedcm-idp\n\nUSAGE:\n  fedcm-idp [--port N] [--base-url URL] [--rp-origin ORIGIN] [--login-template PATH]\n\nOPTIONS:\n  --port N                 Listen port (env: PORT, default 8002)\n  --base-url URL           Public base URL (env: IDP_BASE_URL, default http://localhost:<port>)\n  --rp-origin ORIGIN       Relying-party origin allowed to read assertions (env: IDP_RP_ORIGIN, default http://localhost:8001)\n  --login-template PATH    Handlebars login page (env: IDP_LOGIN_TEMPLATE, default embedded)\n\nENVIRONMENT:\n  IDP_SESSION_SECRET       Cookie signing secret (default: random per process)\n  IDP_SESSION_MAX_AGE      Session lifetime in seconds (default 2592000)\n  IDP_SECURE_COOKIES       Mark cookies Secure; SameSite=None (default true)\n";

impl IdpConfig {
    /// Resolve the configuration from the process environment and `args`
    /// (the full argv, including the program name).
    pub fn from_env_and_args(args: &[String]) -> Self {
        let defaults = IdpConfig::default();

        let port = flag_value(args, "--port")
            .and_then(|v| v.parse::<u16>().ok())
            .or_else(|| parse_port_env("PORT"))
            .unwrap_or(defaults.port);
        let base_url = flag_value(args, "--base-url")
            .map(|s| s.to_string())
            .or_else(|| non_empty_env("IDP_BASE_URL"))
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        let rp_origin = flag_value(args, "--rp-origin")
            .map(|s| s.to_string())
            .or_else(|| non_empty_env("IDP_RP_ORIGIN"))
            .unwrap_or(defaults.rp_origin);
        let session_secret = non_empty_env("IDP_SESSION_SECRET").map(|s| s.into_bytes());
        let session_max_age_secs = non_empty_env("IDP_SESSION_MAX_AGE")
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.session_max_age_secs);
        let secure_cookies = non_empty_env("IDP_SECURE_COOKIES")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(defaults.secure_cookies);
        let login_template = flag_value(args, "--login-template")
            .map(PathBuf::from)
            .or_else(|| non_empty_env("IDP_LOGIN_TEMPLATE").map(PathBuf::from));

        Self {
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            rp_origin,
            session_secret,
            session_max_age_secs,
            secure_cookies,
            login_template,
        }
    }

    /// Absolute URL of the IdP config document, as advertised by the well-known file.
    pub fn config_url(&self) -> String {
        format!("{}{}", self.base_url, crate::server::CONFIG_PATH)
    }
}
