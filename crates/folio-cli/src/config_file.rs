use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_keys: Option<ApiKeysConfig>,
    pub services: Option<ServicesConfig>,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    pub google_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub grobid_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: Option<String>,
}

/// Platform config directory path: `<config_dir>/folio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
}

/// Load config by cascading CWD `.folio.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".folio.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api_keys: Some(ApiKeysConfig {
            google_api_key: overlay
                .api_keys
                .as_ref()
                .and_then(|a| a.google_api_key.clone())
                .or_else(|| {
                    base.api_keys
                        .as_ref()
                        .and_then(|a| a.google_api_key.clone())
                }),
        }),
        services: Some(ServicesConfig {
            grobid_url: overlay
                .services
                .as_ref()
                .and_then(|s| s.grobid_url.clone())
                .or_else(|| base.services.as_ref().and_then(|s| s.grobid_url.clone())),
        }),
        llm: Some(LlmConfig {
            model: overlay
                .llm
                .as_ref()
                .and_then(|l| l.model.clone())
                .or_else(|| base.llm.as_ref().and_then(|l| l.model.clone())),
        }),
    }
}
