use crate::error::DotnetmanError;
use crate::output::OutputFormat;
use crate::types::VersionConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "dotnetman";
pub const DOTNET_DIR_NAME: &str = ".dotnet";
pub const DOWNLOADS_DIR_NAME: &str = "Downloads";
pub const INSTALL_SCRIPT_NAME: &str = "dotnet-install.sh";

pub const DEFAULT_INSTALL_SCRIPT_URL: &str = "https://dot.net/v1/dotnet-install.sh";
pub const DEFAULT_LIFECYCLE_URL: &str = "https://endoflife.date/api/dotnet.json";

pub const HOME_ENV: &str = "HOME";
pub const LIST_PREFERENCE_ENV: &str = "LIST_PREFERENCE";
pub const INSTALL_SCRIPT_URL_ENV: &str = "DOTNETMAN_INSTALL_SCRIPT_URL";
pub const LIFECYCLE_URL_ENV: &str = "DOTNETMAN_LIFECYCLE_URL";

/// Version config schema this build understands.
pub const SUPPORTED_SCHEMA_MAJOR: u64 = 1;
pub const SUPPORTED_SCHEMA_MINOR: u64 = 0;

/// Everything dotnetman reads from the environment, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dotnet_root: PathBuf,
    pub install_script_path: PathBuf,
    pub install_script_url: String,
    pub lifecycle_url: String,
    pub list_preference: Option<OutputFormat>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup(HOME_ENV)
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .ok_or(DotnetmanError::MissingEnv(HOME_ENV))?;

        let download_dir = home.join(DOWNLOADS_DIR_NAME);
        let list_preference = lookup(LIST_PREFERENCE_ENV).and_then(|value| {
            match OutputFormat::parse(&value) {
                Some(format) => Some(format),
                None => {
                    tracing::warn!(
                        "Ignoring {}='{}'. Valid values: tsv, json, yaml, table",
                        LIST_PREFERENCE_ENV,
                        value
                    );
                    None
                }
            }
        });

        let settings = Self {
            dotnet_root: home.join(DOTNET_DIR_NAME),
            install_script_path: download_dir.join(INSTALL_SCRIPT_NAME),
            install_script_url: lookup(INSTALL_SCRIPT_URL_ENV)
                .unwrap_or_else(|| DEFAULT_INSTALL_SCRIPT_URL.to_string()),
            lifecycle_url: lookup(LIFECYCLE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_LIFECYCLE_URL.to_string()),
            list_preference,
        };

        tracing::debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }
}

pub fn load_version_config(path: &Path) -> Result<VersionConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read version config at {}", path.display()))?;

    let config: VersionConfig = serde_json::from_str(&content)
        .map_err(|e| DotnetmanError::Validation(format!("{}: {}", path.display(), e)))?;

    validate_version_config(&config)?;
    Ok(config)
}

/// Accepts schema `X.Y` when `X <= SUPPORTED_SCHEMA_MAJOR` and `Y == SUPPORTED_SCHEMA_MINOR`.
pub fn validate_version_config(config: &VersionConfig) -> Result<(), DotnetmanError> {
    let version = config
        .version
        .as_deref()
        .ok_or_else(|| DotnetmanError::Validation("missing 'version' field".to_string()))?;

    let (major, minor) = version
        .split_once('.')
        .and_then(|(major, minor)| Some((major.parse::<u64>().ok()?, minor.parse::<u64>().ok()?)))
        .ok_or_else(|| {
            DotnetmanError::Validation(format!(
                "'version' must be 'major.minor', got '{}'",
                version
            ))
        })?;

    if major > SUPPORTED_SCHEMA_MAJOR || minor != SUPPORTED_SCHEMA_MINOR {
        return Err(DotnetmanError::Validation(format!(
            "schema version {} is not supported (supported: {}.{})",
            version, SUPPORTED_SCHEMA_MAJOR, SUPPORTED_SCHEMA_MINOR
        )));
    }

    if config
        .sdk_channels
        .iter()
        .chain(&config.runtime_channels)
        .any(|c| c.trim().is_empty())
    {
        return Err(DotnetmanError::Validation(
            "channel names must not be empty".to_string(),
        ));
    }

    Ok(())
}
