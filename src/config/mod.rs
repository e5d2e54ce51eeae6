// Runtime settings resolved from flags, environment and defaults.

use std::path::PathBuf;


/// Default listening port when no flag is given.
pub const DEFAULT_PORT: u16 = 8888;

/// Environment variable consulted for the services file when no flag is
/// given.
pub const SERVICES_ENV: &str = "PROCMAN_SERVICES";

/// Fallback services file path.
pub const SERVICES_PATH: &str = "cfg/services.json";

/// Resolved supervisor settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub services_path: PathBuf,
}

impl Config {
    /// Resolves the services file path: command-line flag first, then the
    /// `PROCMAN_SERVICES` environment variable, then the fixed default.
    pub fn resolve(port: u16, services_flag: Option<PathBuf>) -> Self {
        let services_path = services_flag
            .or_else(|| std::env::var_os(SERVICES_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(SERVICES_PATH));

        Self {
            port,
            services_path,
        }
    }
}
