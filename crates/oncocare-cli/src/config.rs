use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when the shape changes incompatibly.
const CURRENT_VERSION: u32 = 1;

/// Envelope key the record store unwraps by default.
pub const DEFAULT_DETAILS_KEY: &str = "patientDetails";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OncoConfig {
    /// Schema version. A config without one is read as the current version.
    #[serde(default)]
    pub config_version: u32,
    /// Specification used when `--spec` is not given. The built-in
    /// oncology specification applies when this is unset too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification_path: Option<PathBuf>,
    /// Directory of `<patient id>.json` records for `--patient-id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_dir: Option<PathBuf>,
    /// Key wrapping the record inside each stored document.
    #[serde(default = "default_details_key")]
    pub details_key: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for OncoConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            specification_path: None,
            records_dir: None,
            details_key: default_details_key(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_details_key() -> String {
    DEFAULT_DETAILS_KEY.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("oncocare").join("config.json"))
}

/// Load the config at `path`, or from the default location when `None`.
///
/// An explicit path must exist. A missing default config yields defaults.
pub fn load_or_default(path: Option<&Path>) -> eyre::Result<OncoConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let path = match default_config_path() {
                Ok(path) => path,
                Err(_) => return Ok(OncoConfig::default()),
            };
            if path.exists() {
                load_config(&path)
            } else {
                Ok(OncoConfig::default())
            }
        }
    }
}

pub fn load_config(path: &Path) -> eyre::Result<OncoConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so the version is checked before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = config_version(&json)?;
    if on_disk_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {on_disk_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update oncocare."
        ));
    }

    let mut config: OncoConfig = serde_json::from_value(json)?;
    config.config_version = CURRENT_VERSION;
    tracing::debug!(path = %path.display(), on_disk_version, "config loaded");
    Ok(config)
}

/// The `config_version` stamped in a raw config, 0 when absent.
fn config_version(json: &serde_json::Value) -> eyre::Result<u32> {
    match json.get("config_version") {
        None => Ok(0),
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                eyre::eyre!(
                    "config_version must be an integer between 0 and {}, got {value}",
                    u32::MAX
                )
            }),
    }
}

pub fn save_config(config: &OncoConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
