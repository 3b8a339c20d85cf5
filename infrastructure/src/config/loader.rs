//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILES: [&str; 2] = ["casematch.toml", ".casematch.toml"];

/// Prefix of environment variable overrides (e.g. `CASEMATCH_BACKEND__BASE_URL`)
pub const ENV_PREFIX: &str = "CASEMATCH_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./casematch.toml` or `./.casematch.toml`
    /// 3. Global: `$XDG_CONFIG_HOME/casematch/config.toml`
    /// 4. Environment: `CASEMATCH_*`, sections separated by `__`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            config_path.map(PathBuf::as_path),
            Self::project_config_path().as_deref(),
            Self::global_config_path().as_deref(),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(explicit: Option<&Path>, project: Option<&Path>, global: Option<&Path>) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(global_path) = global {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        if let Some(project_path) = project {
            figment = figment.merge(Toml::file(project_path));
        }

        // Explicit path has the highest priority for files
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    ///
    /// Returns $XDG_CONFIG_HOME/casematch/config.toml if set,
    /// otherwise the platform config dir (~/.config on Linux)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("casematch").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = config_path {
            let state = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:^7}] Explicit: {}", state, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [ FOUND ] Project:  {}", path.display());
        } else {
            println!("  [       ] Project:  ./casematch.toml or ./.casematch.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let state = if path.exists() { "FOUND" } else { "" };
            println!("  [{:^7}] Global:   {}", state, path.display());
        }

        let env_set = std::env::vars().any(|(key, _)| key.starts_with(ENV_PREFIX));
        let state = if env_set { "FOUND" } else { "" };
        println!("  [{:^7}] Env:      {}*", state, ENV_PREFIX);
        println!("  [       ] Default:  built-in defaults");
    }
}
