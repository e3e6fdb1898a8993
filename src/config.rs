use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for prowlink.
///
/// Lets users pin the Prow instance, the log container, and the browser
/// profile once instead of passing flags on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Prow log viewer settings
    #[serde(default)]
    pub prow: ProwConfig,

    /// Browser session used to render pull request pages
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProwConfig {
    /// Prow deck base URL
    #[serde(default = "default_prow_base_url")]
    pub base_url: String,

    /// Container whose log carries the namespace line.
    ///
    /// Not discoverable from the check link; "test" holds for most
    /// OpenShift e2e jobs but not all of them.
    #[serde(default = "default_container")]
    pub container: String,

    /// Overall timeout for the log request, in seconds
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// Run Chromium without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound on waiting for status checks to render, in seconds
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Delay between readiness probes, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Chromium binary to launch instead of the auto-detected one
    pub chrome_executable: Option<PathBuf>,

    /// Chromium profile directory, e.g. one already logged in to GitHub
    pub user_data_dir: Option<PathBuf>,
}

impl Default for ProwConfig {
    fn default() -> Self {
        Self {
            base_url: default_prow_base_url(),
            container: default_container(),
            request_timeout_secs: None,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            wait_timeout_secs: default_wait_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            chrome_executable: None,
            user_data_dir: None,
        }
    }
}

fn default_prow_base_url() -> String {
    "https://prow.ci.openshift.org".to_string()
}

fn default_container() -> String {
    "test".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_wait_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./prowlink.toml
    /// 3. ./prowlink.json
    /// 4. ./prowlink.yaml
    /// 5. ./prowlink.yml
    /// 6. `<user config dir>/prowlink/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["prowlink.toml", "prowlink.json", "prowlink.yaml", "prowlink.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = user_config_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("prowlink").join("config.toml"))
}
