use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".xpense";
const DATA_FILE: &str = "expenses.json";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the application directory.
pub const HOME_ENV: &str = "XPENSE_HOME";

/// Returns the application-specific data directory, defaulting to `~/.xpense`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Default location of the ledger document.
pub fn data_file() -> PathBuf {
    data_file_in(&app_data_dir())
}

pub fn data_file_in(base: &std::path::Path) -> PathBuf {
    base.join(DATA_FILE)
}

/// Path to the user preferences file.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
