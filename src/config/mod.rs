use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_file_in, data_file_in};
use crate::errors::LedgerError;

const TMP_SUFFIX: &str = "tmp";

/// User preferences for the tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// Overrides the ledger document location. Defaults to `<app dir>/expenses.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Display name used when the stored ledger has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            data_file: None,
            user_name: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "₱".into()
    }

    pub fn resolve_data_file(&self) -> PathBuf {
        match &self.data_file {
            Some(path) => path.clone(),
            None => data_file_in(&app_data_dir()),
        }
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_amount(&self, amount: rust_decimal::Decimal) -> String {
        crate::ledger::money::format_amount(&self.currency_symbol, amount)
    }
}

/// Loads and stores [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manager for `config.json` inside the application directory.
    pub fn new_default() -> Self {
        Self::new(config_file_in(&app_data_dir()))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(config_file_in(&base)))
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
