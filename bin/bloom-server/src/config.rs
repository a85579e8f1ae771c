//! Server configuration, loaded from environment variables at startup and
//! optionally overridden on the command line.

use std::time::Duration;

use bloom_app_core::OpenAiConfig;
use bloom_app_core::services::DEFAULT_MAX_MESSAGE_CHARS;
use clap::Parser;

/// Completion model used when `BLOOM_AI_MODEL` is unset.
pub const DEFAULT_AI_MODEL: &str = "gpt-5";

/// Runtime configuration for bloom-server.
///
/// Every field has a default so the server starts without any environment
/// variables set. Quote generation needs `BLOOM_AI_API_KEY` to succeed
/// against a hosted API.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://bloom.db"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// When set, logs are also written to a daily-rolling file in this directory.
    pub log_dir: Option<String>,

    /// Comma-separated CORS allow-list; wildcard when unset.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Longest accepted guestbook entry, in characters.
    pub message_max_chars: usize,

    /// Base URL of the OpenAI-compatible completion API.
    pub ai_base_url: String,

    pub ai_api_key: Option<String>,

    pub ai_model: String,

    /// Upper bound on one quote generation, in seconds.
    pub ai_timeout_secs: u64,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("BLOOM_BIND", "0.0.0.0:5000"),
            database_url: env_or("BLOOM_DATABASE_URL", "sqlite://bloom.db"),
            log_level: env_or("BLOOM_LOG", "info"),
            log_json: std::env::var("BLOOM_LOG_JSON").map(|v| parse_bool(&v)).unwrap_or(false),
            log_dir: env_opt("BLOOM_LOG_DIR"),
            cors_allowed_origins: env_opt("BLOOM_CORS_ORIGINS"),
            enable_swagger: std::env::var("BLOOM_ENABLE_SWAGGER")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            message_max_chars: parse_env("BLOOM_MESSAGE_MAX_CHARS", DEFAULT_MAX_MESSAGE_CHARS),
            ai_base_url: env_or("BLOOM_AI_BASE_URL", "https://api.openai.com/v1"),
            ai_api_key: env_opt("BLOOM_AI_API_KEY"),
            ai_model: env_or("BLOOM_AI_MODEL", DEFAULT_AI_MODEL),
            ai_timeout_secs: parse_env("BLOOM_AI_TIMEOUT_SECS", 10),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(bind) = cli.bind {
            self.bind_address = bind;
        }
        if let Some(url) = cli.database_url {
            self.database_url = url;
        }
        if cli.log_json {
            self.log_json = true;
        }
        self
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            base_url: self.ai_base_url.clone(),
            api_key: self.ai_api_key.clone(),
            model: self.ai_model.clone(),
            timeout: self.generation_timeout(),
        }
    }
}

/// Command-line overrides. Anything not given here comes from `BLOOM_*`
/// environment variables.
#[derive(Debug, Parser)]
#[command(name = "bloom-server", version, about = "Guestbook and daily-quote backend")]
pub struct Cli {
    /// Address to bind, e.g. `127.0.0.1:5000`.
    #[arg(long)]
    pub bind: Option<String>,

    /// sqlx SQLite URL, e.g. `sqlite://bloom.db`.
    #[arg(long)]
    pub database_url: Option<String>,

    /// Emit JSON log records.
    #[arg(long)]
    pub log_json: bool,
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_bool(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".into(),
        database_url: "sqlite::memory:".into(),
        log_level: "debug".into(),
        log_json: false,
        log_dir: None,
        cors_allowed_origins: None,
        enable_swagger: true,
        message_max_chars: DEFAULT_MAX_MESSAGE_CHARS,
        // Nothing listens on port 1; generation fails fast.
        ai_base_url: "http://127.0.0.1:1/v1".into(),
        ai_api_key: None,
        ai_model: "gpt-test".into(),
        ai_timeout_secs: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_parsing_accepts_one_and_true() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn cli_overrides_environment_values() {
        let cli = Cli::try_parse_from([
            "bloom-server",
            "--bind",
            "127.0.0.1:8080",
            "--database-url",
            "sqlite://other.db",
            "--log-json",
        ])
        .unwrap();
        let cfg = test_config().with_cli(cli);
        assert_eq!(cfg.bind_address, "127.0.0.1:8080");
        assert_eq!(cfg.database_url, "sqlite://other.db");
        assert!(cfg.log_json);
    }

    #[test]
    fn empty_cli_keeps_environment_values() {
        let cli = Cli::try_parse_from(["bloom-server"]).unwrap();
        let cfg = test_config().with_cli(cli);
        assert_eq!(cfg.bind_address, "127.0.0.1:0");
        assert!(!cfg.log_json);
    }

    #[test]
    fn model_defaults_to_gpt_5() {
        if std::env::var("BLOOM_AI_MODEL").is_err() {
            assert_eq!(Config::from_env().ai_model, "gpt-5");
        }
    }

    #[test]
    fn openai_settings_follow_config() {
        let cfg = test_config();
        let ai = cfg.openai();
        assert_eq!(ai.base_url, cfg.ai_base_url);
        assert_eq!(ai.model, "gpt-test");
        assert_eq!(ai.timeout, Duration::from_secs(2));
    }
}
