//! Environment configuration
//!
//! Read once at startup. Invalid values are logged and replaced by their
//! defaults rather than aborting the server.

use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    /// Unset means the server runs on fallback data only.
    pub spreadsheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub sheets_api_base: String,
    /// Zero disables the tab cache.
    pub sheet_cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            spreadsheet_id: None,
            sheets_access_token: None,
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            sheet_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let access_token = var("SHEETS_ACCESS_TOKEN").or_else(|| {
            var("SHEETS_ACCESS_TOKEN_FILE").and_then(|path| read_secret(&path))
        });

        Self {
            port: try_load(&var, "PORT", DEFAULT_PORT),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            spreadsheet_id: var("SPREADSHEET_ID").map(|id| id.trim().to_string()),
            sheets_access_token: access_token,
            sheets_api_base: var("SHEETS_API_BASE")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
            sheet_cache_ttl: Duration::from_secs(try_load(
                &var,
                "SHEET_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )),
        }
    }

    pub fn log_summary(&self) {
        info!("Configuration:");
        info!("  PORT: {}", self.port);
        info!("  STATIC_DIR: {}", self.static_dir.display());
        info!(
            "  SPREADSHEET_ID: {}",
            self.spreadsheet_id.as_deref().unwrap_or("<unset>")
        );
        info!(
            "  SHEETS_ACCESS_TOKEN: {}",
            if self.sheets_access_token.is_some() { "<set>" } else { "<unset>" }
        );
        info!("  SHEETS_API_BASE: {}", self.sheets_api_base);
        info!("  SHEET_CACHE_TTL_SECS: {}", self.sheet_cache_ttl.as_secs());
    }
}

fn try_load<T, V>(var: &V, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default {default}");
            default
        }),
    }
}

fn read_secret(path: &str) -> Option<String> {
    read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read secret from {path}: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.static_dir, PathBuf::from("static"));
        assert!(cfg.spreadsheet_id.is_none());
        assert!(cfg.sheets_access_token.is_none());
        assert_eq!(cfg.sheets_api_base, "https://sheets.googleapis.com");
        assert_eq!(cfg.sheet_cache_ttl, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("SPREADSHEET_ID", " sheet-1 "),
            ("SHEETS_ACCESS_TOKEN", "ya29.token"),
            ("SHEET_CACHE_TTL_SECS", "0"),
        ]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.spreadsheet_id.as_deref(), Some("sheet-1"));
        assert_eq!(cfg.sheets_access_token.as_deref(), Some("ya29.token"));
        assert_eq!(cfg.sheet_cache_ttl, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_use_defaults() {
        let cfg = config(&[
            ("PORT", "eighty"),
            ("SHEET_CACHE_TTL_SECS", "-1"),
            ("SPREADSHEET_ID", "  "),
        ]);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.sheet_cache_ttl, Duration::from_secs(30));
        assert!(cfg.spreadsheet_id.is_none());
    }

    #[test]
    fn test_token_file() {
        let path = env::temp_dir().join(format!("hotel-token-{}", std::process::id()));
        std::fs::write(&path, "file-token\n").unwrap();

        let cfg = config(&[("SHEETS_ACCESS_TOKEN_FILE", path.to_str().unwrap())]);
        assert_eq!(cfg.sheets_access_token.as_deref(), Some("file-token"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_token_file() {
        let cfg = config(&[("SHEETS_ACCESS_TOKEN_FILE", "/nonexistent/hotel-token")]);
        assert!(cfg.sheets_access_token.is_none());
    }
}
