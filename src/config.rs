//! Runtime configuration.
//!
//! Values come from `TOUCHZONE_`-prefixed environment variables, e.g. `TOUCHZONE_FAST_PICKING=false`
//! or `TOUCHZONE_DEBUG=true`. Missing keys fall back to [`PickConfig::default`].

use crate::error::Error;
use config::{Config, Environment};
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TOUCHZONE";

/// Port the main cursor listener is bound to by convention.
pub const DEFAULT_LISTENER_PORT: u16 = 3333;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Read single pixels back from the render target instead of copying the whole frame.
    ///
    /// Ignored if the render target can’t do it.
    pub fast_picking: bool,

    /// Report bookkeeping inconsistencies that are otherwise expected to be transient.
    pub debug: bool,

    /// The port sessions in partition zero are attributed to.
    pub main_listener_port: u16,
}

impl Default for PickConfig {
    fn default() -> Self {
        PickConfig {
            fast_picking: true,
            debug: false,
            main_listener_port: DEFAULT_LISTENER_PORT,
        }
    }
}

impl PickConfig {
    /// Loads the configuration from the environment.
    pub fn load() -> Result<PickConfig, Error> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for key in &[
            "TOUCHZONE_FAST_PICKING",
            "TOUCHZONE_DEBUG",
            "TOUCHZONE_MAIN_LISTENER_PORT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_environment() {
        clear_env();
        let config = PickConfig::load().expect("config should load");
        assert_eq!(config, PickConfig::default());
    }

    #[test]
    #[serial]
    fn environment_overrides() {
        clear_env();
        env::set_var("TOUCHZONE_FAST_PICKING", "false");
        env::set_var("TOUCHZONE_DEBUG", "true");
        env::set_var("TOUCHZONE_MAIN_LISTENER_PORT", "3400");
        let config = PickConfig::load();
        clear_env();

        let config = config.expect("config should load");
        assert!(!config.fast_picking);
        assert!(config.debug);
        assert_eq!(config.main_listener_port, 3400);
    }
}
