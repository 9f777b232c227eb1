//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILE: &str = "chatbridge.toml";
const ENV_PREFIX: &str = "CHATBRIDGE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CHATBRIDGE_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./chatbridge.toml`
    /// 4. Global config: `~/.config/chatbridge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path,
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        // An explicit file must exist; figment ignores missing files otherwise
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/chatbridge/config.toml if set,
    /// otherwise falls back to ~/.config/chatbridge/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chatbridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(config_path: Option<&Path>) -> String {
        fn line(label: &str, path: &Path) -> String {
            let marker = if path.exists() { "FOUND" } else { "     " };
            format!("  [{}] {:<8} {}\n", marker, label, path.display())
        }

        let mut out = String::from("Configuration sources (in priority order):\n");
        out.push_str(&format!("  [     ] {:<8} {}*\n", "Env:", ENV_PREFIX));
        if let Some(path) = config_path {
            out.push_str(&line("Explicit:", path));
        }
        out.push_str(&line("Project:", Path::new(PROJECT_CONFIG_FILE)));
        if let Some(path) = Self::global_config_path() {
            out.push_str(&line("Global:", &path));
        }
        out.push_str("  [     ] Default: built-in defaults\n");
        out
    }
}
