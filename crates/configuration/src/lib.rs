use crate::error::ConfigError;
use std::path::Path;
use tracing::{info, warn};

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Monthly, PODIUM_SIZE, Ranking, SortKey, Storage};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// deserializes it into our strongly-typed `Config` struct, validates it, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml")
}

/// Loads configuration from `path`, layered under `LEADERBOARD_*` environment variables.
///
/// The file is optional; every setting has a default. Nested keys use a double
/// underscore, e.g. `LEADERBOARD_RANKING__SORT_KEY=growth`.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("LEADERBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    if let Err(e) = config.validate() {
        warn!(path = %path.display(), error = %e, "Rejected configuration");
        return Err(e);
    }

    info!(
        path = %path.display(),
        sort_key = %config.ranking.sort_key,
        milestones = config.ranking.milestone_targets.len(),
        window_months = config.monthly.window_months,
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};

    // Every test that loads configuration reads the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets environment variables and restores their previous values on drop.
    struct EnvVars {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvVars {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let saved = vars
                .iter()
                .map(|(key, value)| {
                    let previous = env::var(key).ok();
                    // SAFETY: callers hold ENV_LOCK, so no other test touches the environment.
                    unsafe { env::set_var(key, value) };
                    (*key, previous)
                })
                .collect();
            Self { saved }
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for (key, previous) in &self.saved {
                // SAFETY: see `EnvVars::set`.
                match previous {
                    Some(value) => unsafe { env::set_var(key, value) },
                    None => unsafe { env::remove_var(key) },
                }
            }
        }
    }

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "leaderboard-config-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let _lock = env_lock();
        let config = load_config_from("/nonexistent/leaderboard/config.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_values_are_applied() {
        let _lock = env_lock();
        let path = write_temp_config(
            "applied",
            r#"
[ranking]
exchange_rate = "58.75"
sort_key = "growth"
milestone_targets = [
    { label = "Diamond", threshold = "10000000" },
    { label = "Gold", threshold = "5000000" },
]

[monthly]
window_months = 6
axis_floor = "500"

[storage]
data_dir = "/tmp/leaderboard-data"
"#,
        );

        let config = load_config_from(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.ranking.exchange_rate.as_decimal(), dec!(58.75));
        assert_eq!(config.ranking.sort_key, SortKey::Growth);
        assert_eq!(config.ranking.milestone_targets.len(), 2);
        assert_eq!(config.ranking.milestone_targets[1].threshold, dec!(5000000));
        assert_eq!(config.monthly.window_months, 6);
        assert_eq!(config.monthly.axis_floor, dec!(500));
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/leaderboard-data"));
    }

    #[test]
    fn test_non_positive_rate_fails_fast() {
        let _lock = env_lock();
        let path = write_temp_config("bad-rate", "[ranking]\nexchange_rate = \"0\"\n");

        let result = load_config_from(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_zero_window_fails_validation() {
        let _lock = env_lock();
        let path = write_temp_config("bad-window", "[monthly]\nwindow_months = 0\n");

        let result = load_config_from(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let path = write_temp_config(
            "env",
            "[ranking]\nexchange_rate = \"60\"\nsort_key = \"orders\"\n\n[monthly]\nwindow_months = 12\n",
        );
        let _lock = env_lock();
        let _env = EnvVars::set(&[
            ("LEADERBOARD_RANKING__SORT_KEY", "growth"),
            ("LEADERBOARD_RANKING__EXCHANGE_RATE", "58.5"),
            ("LEADERBOARD_MONTHLY__WINDOW_MONTHS", "6"),
        ]);

        let result = load_config_from(&path);
        fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.ranking.sort_key, SortKey::Growth);
        assert_eq!(config.ranking.exchange_rate.as_decimal(), dec!(58.5));
        assert_eq!(config.monthly.window_months, 6);
    }

    #[test]
    fn test_invalid_environment_value_is_rejected() {
        let _lock = env_lock();
        let _env = EnvVars::set(&[("LEADERBOARD_RANKING__SORT_KEY", "fastest")]);

        let result = load_config_from("/nonexistent/leaderboard/config.toml");

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_environment_is_restored_after_override() {
        let _lock = env_lock();
        {
            let _env = EnvVars::set(&[("LEADERBOARD_MONTHLY__WINDOW_MONTHS", "3")]);
            assert_eq!(load_config_from("/nonexistent/config.toml").unwrap().monthly.window_months, 3);
        }
        assert!(env::var("LEADERBOARD_MONTHLY__WINDOW_MONTHS").is_err());
        assert_eq!(load_config_from("/nonexistent/config.toml").unwrap(), Config::default());
    }
}
