//! Configuration for runviz.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (RUNVIZ_SERVER_URL, RUNVIZ_API_TOKEN, RUNVIZ_ICON_DIR)
//! 2. Config file (.runviz/config.yaml)
//! 3. Defaults (local server, bundled icon directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .runviz/config.yaml
//! - Paths in the config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::render::{LayoutConfig, TemplateAssets};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<std::result::Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8237";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub assets: Option<AssetsConfig>,
    #[serde(default)]
    pub layout: Option<LayoutOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsConfig {
    /// Icon directory (relative to the config file)
    pub icon_dir: Option<String>,
    pub script_uri: Option<String>,
    pub style_uri: Option<String>,
    /// Origin token interpolated into the content policy
    pub csp_source: Option<String>,
}

/// Optional overrides for the named layout parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutOverrides {
    pub rank_sep: Option<f64>,
    pub node_sep: Option<f64>,
    pub node_width: Option<f64>,
    pub step_height: Option<f64>,
    pub artifact_height: Option<f64>,
}

impl LayoutOverrides {
    fn apply(&self, mut config: LayoutConfig) -> LayoutConfig {
        if let Some(v) = self.rank_sep {
            config.rank_sep = v;
        }
        if let Some(v) = self.node_sep {
            config.node_sep = v;
        }
        if let Some(v) = self.node_width {
            config.node_width = v;
        }
        if let Some(v) = self.step_height {
            config.step_height = v;
        }
        if let Some(v) = self.artifact_height {
            config.artifact_height = v;
        }
        config
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Base URL of the pipeline server
    pub server_url: String,
    /// API token for the pipeline server, if any
    pub api_token: Option<String>,
    /// Absolute path to the icon directory
    pub icon_dir: PathBuf,
    /// URIs and origin token for the generated documents
    pub assets: TemplateAssets,
    /// Layout parameters after overrides
    pub layout: LayoutConfig,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".runviz").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file_path = find_config_file();
    let config_file = match &config_file_path {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };
    let base = config_file_path
        .as_ref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let server = config_file
        .as_ref()
        .and_then(|f| f.server.clone())
        .unwrap_or_default();
    let assets = config_file
        .as_ref()
        .and_then(|f| f.assets.clone())
        .unwrap_or_default();
    let overrides = config_file
        .as_ref()
        .and_then(|f| f.layout.clone())
        .unwrap_or_default();

    let server_url = std::env::var("RUNVIZ_SERVER_URL")
        .ok()
        .or(server.url)
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let api_token = std::env::var("RUNVIZ_API_TOKEN").ok().or(server.api_token);

    let icon_dir = std::env::var("RUNVIZ_ICON_DIR")
        .ok()
        .or(assets.icon_dir)
        .map(|p| resolve_path(&base, &p))
        .unwrap_or_else(|| default_icon_dir(&base));

    let template_assets = TemplateAssets {
        script_uri: assets.script_uri.unwrap_or_else(|| "dag.js".to_string()),
        style_uri: assets.style_uri.unwrap_or_else(|| "dag.css".to_string()),
        csp_source: assets.csp_source.unwrap_or_else(|| "'self'".to_string()),
    };

    Ok(ResolvedConfig {
        server_url,
        api_token,
        icon_dir,
        assets: template_assets,
        layout: overrides.apply(LayoutConfig::default()),
        config_file: config_file_path,
    })
}

/// Bundled icons next to the config root, falling back to ~/.runviz/icons
fn default_icon_dir(base: &Path) -> PathBuf {
    let bundled = base.join("assets").join("icons");
    if bundled.is_dir() {
        return bundled;
    }
    dirs::home_dir()
        .map(|home| home.join(".runviz").join("icons"))
        .unwrap_or(bundled)
}

/// Get the resolved configuration, loading it on first use
pub fn get() -> Result<&'static ResolvedConfig> {
    let cached = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{e:#}")));
    cached
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))
}
