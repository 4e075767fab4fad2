// Configuration module entry point
// Loads settings from an optional config file and the environment,
// and holds the shared application state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::Config;

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. `BANK__`-prefixed environment variables
    /// override it, with `__` separating nested keys
    /// (`BANK__LOGGING__ACCESS_LOG=false`). The plain `HOST` and `PORT`
    /// variables override everything. Neither has a default, so loading
    /// fails when no source provides them.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        // Variables that are not valid Unicode cannot name a setting
        let env = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::load_with_env(config_path, env)
    }

    fn load_with_env(
        config_path: &str,
        env: config::Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let host = env.get("HOST").cloned();
        let port = env.get("PORT").cloned();

        Self::with_defaults(config::Config::builder())?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("BANK")
                    .separator("__")
                    .source(Some(env)),
            )
            .set_override_option("host", host)?
            .set_override_option("port", port)?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.bind_address", "0.0.0.0")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("logos.cache_listing", false)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let ip: IpAddr = self
            .server
            .bind_address
            .parse()
            .map_err(|source| StartupError::Address {
                addr: self.server.bind_address.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Absolute URL of a logo, `<host>/logo/<base>.png`
    pub fn logo_url(&self, base: &str) -> String {
        format!("{}/logo/{base}.png", self.host)
    }
}
