//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "weather-agent";
const PROJECT_FILES: &[&str] = &["weather-agent.toml", ".weather-agent.toml"];
const ENV_PREFIX: &str = "WEATHER_AGENT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `WEATHER_AGENT_SECTION__KEY=value`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./weather-agent.toml` or `./.weather-agent.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/weather-agent/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = project {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/weather-agent/config.toml if set,
    /// otherwise falls back to ~/.config/weather-agent/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}SECTION__KEY", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]);
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.server.retry_count, 3);
        assert_eq!(config.alerts.default_location, "San Francisco");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("weather-agent"));
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_config(
            &dir,
            "weather-agent.toml",
            "[server]\nbase_url = \"http://project:8000\"\ntimeout_secs = 12\n",
        );
        let explicit = write_config(
            &dir,
            "override.toml",
            "[server]\nbase_url = \"http://explicit:8000\"\n",
        );

        let config: FileConfig = ConfigLoader::figment(None, Some(&project), Some(&explicit))
            .extract()
            .unwrap();
        assert_eq!(config.server.base_url, "http://explicit:8000");
        // Keys the explicit file leaves alone keep the project value
        assert_eq!(config.server.timeout_secs, 12);
        assert_eq!(config.server.retry_count, 3);
    }

    #[test]
    fn test_reliability_table_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "sources.toml", "[sources.reliability]\nwttr = 0.6\n");

        let config: FileConfig = ConfigLoader::figment(None, None, Some(&path))
            .extract()
            .unwrap();
        let table = config.sources.to_reliability_table();
        assert_eq!(table.reliability("wttr"), 0.6);
        assert_eq!(table.reliability("nws"), 0.9);
    }

    #[test]
    fn test_env_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "explicit.toml",
                "[alerts]\nmonitor_interval_minutes = 10\n",
            )?;
            jail.set_env("WEATHER_AGENT_ALERTS__MONITOR_INTERVAL_MINUTES", "2");
            jail.set_env("WEATHER_AGENT_COMPLETION__ENABLED", "true");

            let config: FileConfig =
                ConfigLoader::figment(None, None, Some(Path::new("explicit.toml"))).extract()?;
            assert_eq!(config.alerts.monitor_interval_minutes, 2);
            assert!(config.completion.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "bad.toml", "[server]\ntimeout_secs = \"soon\"\n");
        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, None, Some(&path)).extract();
        assert!(result.is_err());
    }
}
