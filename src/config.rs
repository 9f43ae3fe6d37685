use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::debug::{DEFAULT_MAX_BODY_CHARS, HttpDebugConfig};
use crate::rpc::chains::{lookup_chain, supported_chain_ids};
use crate::rpc::gateway::{DEFAULT_RPC_ENDPOINT, DEFAULT_TIMEOUT_MS};

const CONFIG_DIR_NAME: &str = "chainscope";
const CONFIG_FILE_NAME: &str = "config.toml";

const ENV_RPC_ENDPOINT: &str = "CHAINSCOPE_RPC_ENDPOINT";
const ENV_API_KEY: &str = "CHAINSCOPE_API_KEY";
const ENV_TIMEOUT_MS: &str = "CHAINSCOPE_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub config_is_explicit: bool,
    pub rpc_endpoint: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    /// Chains visited by `analyze` when none are given; `None` means all.
    pub default_chains: Option<Vec<String>>,
    pub http_debug: HttpDebugSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugSettings {
    pub max_body_chars: usize,
    pub redact_secrets: bool,
}

impl Default for HttpDebugSettings {
    fn default() -> Self {
        Self {
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            redact_secrets: true,
        }
    }
}

impl HttpDebugSettings {
    pub fn to_debug_config(self, verbose: bool) -> HttpDebugConfig {
        HttpDebugConfig {
            enabled: verbose,
            redact_secrets: self.redact_secrets,
            max_body_chars: self.max_body_chars,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    rpc_endpoint: Option<String>,
    api_key: Option<String>,
    request_timeout_ms: Option<u64>,
    default_chains: Option<Vec<String>>,
    http_debug: Option<RawHttpDebugConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHttpDebugConfig {
    max_body_chars: Option<usize>,
    redact_secrets: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// An explicit path must exist; the discovered default path may be absent.
    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let (config_path, config_is_explicit) = match explicit_path {
            Some(path) => (path.to_path_buf(), true),
            None => (discover_config_path()?, false),
        };
        if config_is_explicit && !config_path.is_file() {
            bail!(
                "Failed to load config {}: file does not exist",
                config_path.display()
            );
        }
        let file_config = load_file_config(&config_path)?;

        dotenvy::dotenv().ok();

        let file_endpoint = file_config
            .as_ref()
            .and_then(|cfg| cfg.rpc_endpoint.as_deref())
            .and_then(|value| non_empty(value).map(ToOwned::to_owned));
        let file_api_key = file_config
            .as_ref()
            .and_then(|cfg| cfg.api_key.as_deref())
            .and_then(|value| non_empty(value).map(ToOwned::to_owned));

        let timeout_ms = match env_non_empty(ENV_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().map_err(|err| {
                anyhow!("Failed to load config: {ENV_TIMEOUT_MS}: invalid value '{raw}': {err}")
            })?,
            None => file_config
                .as_ref()
                .and_then(|cfg| cfg.request_timeout_ms)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        };
        if timeout_ms == 0 {
            return Err(config_error(
                &config_path,
                "request_timeout_ms",
                "must be greater than zero",
            ));
        }

        let default_chains = validate_chains(
            file_config.as_ref().and_then(|cfg| cfg.default_chains.as_deref()),
            &config_path,
        )?;
        let http_debug = validate_http_debug(
            file_config.as_ref().and_then(|cfg| cfg.http_debug.as_ref()),
            &config_path,
        )?;

        Ok(Self {
            config_path,
            config_is_explicit,
            rpc_endpoint: env_non_empty(ENV_RPC_ENDPOINT)
                .or(file_endpoint)
                .unwrap_or_else(|| DEFAULT_RPC_ENDPOINT.to_string()),
            api_key: env_non_empty(ENV_API_KEY).or(file_api_key),
            request_timeout: Duration::from_millis(timeout_ms),
            default_chains,
            http_debug,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn validate_chains(raw: Option<&[String]>, config_path: &Path) -> Result<Option<Vec<String>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Err(config_error(config_path, "default_chains", "must not be empty"));
    }

    let mut chains = Vec::with_capacity(raw.len());
    for name in raw {
        let descriptor = lookup_chain(name).ok_or_else(|| {
            config_error(
                config_path,
                "default_chains",
                &format!(
                    "unknown chain '{name}', expected one of {}",
                    supported_chain_ids().join(", ")
                ),
            )
        })?;
        chains.push(descriptor.id.to_string());
    }

    Ok(Some(chains))
}

fn validate_http_debug(
    raw: Option<&RawHttpDebugConfig>,
    config_path: &Path,
) -> Result<HttpDebugSettings> {
    let mut settings = HttpDebugSettings::default();
    let Some(raw) = raw else {
        return Ok(settings);
    };

    if let Some(max_body_chars) = raw.max_body_chars {
        if max_body_chars == 0 {
            return Err(config_error(
                config_path,
                "http_debug.max_body_chars",
                "must be greater than zero",
            ));
        }
        settings.max_body_chars = max_body_chars;
    }
    if let Some(redact_secrets) = raw.redact_secrets {
        settings.redact_secrets = redact_secrets;
    }

    Ok(settings)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}
