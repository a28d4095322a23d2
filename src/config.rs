use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "sentences.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Use the calendar date stored in the database instead of wall time.
    pub simulated_clock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            simulated_clock: false,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            db_path: lookup("SENTENCES_DB")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: lookup("SENTENCES_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),
            simulated_clock: lookup("SENTENCES_SIMULATED_CLOCK")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.simulated_clock),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn reads_all_keys() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("SENTENCES_DB", "/tmp/s.db"),
            ("SENTENCES_LOG", "debug"),
            ("SENTENCES_SIMULATED_CLOCK", "TRUE"),
        ]));
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/s.db"));
        assert_eq!(cfg.log_level, "debug");
        assert!(cfg.simulated_clock);
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("SENTENCES_DB", "  "),
            ("SENTENCES_SIMULATED_CLOCK", "nope"),
        ]));
        assert_eq!(cfg.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert!(!cfg.simulated_clock);
    }
}
