use std::env;
use std::path::PathBuf;

use log::LevelFilter;

const APP_DIR: &str = "talentlab";
const DB_FILE: &str = "talentlab.sqlite";
const DEFAULT_LOG_FILE_MAX_MB: u64 = 10;
const DEFAULT_LOG_FILE_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
    pub file_max_bytes: u64,
    pub file_count: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file: None,
            file_max_bytes: DEFAULT_LOG_FILE_MAX_MB * 1024 * 1024,
            file_count: DEFAULT_LOG_FILE_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let db_path = get("TALENTLAB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_db_path(&get));

        let level = get("TALENTLAB_LOG_LEVEL")
            .and_then(|val| val.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let file_max_mb = get("TALENTLAB_LOG_FILE_MAX_MB")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LOG_FILE_MAX_MB)
            .clamp(1, 512);
        let file_count = get("TALENTLAB_LOG_FILE_COUNT")
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_LOG_FILE_COUNT)
            .clamp(1, 20);

        Self {
            db_path,
            log: LogConfig {
                level,
                file: get("TALENTLAB_LOG_FILE").map(PathBuf::from),
                file_max_bytes: file_max_mb * 1024 * 1024,
                file_count,
            },
        }
    }
}

fn default_db_path(get: &impl Fn(&str) -> Option<String>) -> PathBuf {
    // Prefer XDG data dir.
    if let Some(base) = get("XDG_DATA_HOME") {
        return PathBuf::from(base).join(APP_DIR).join(DB_FILE);
    }
    if let Some(home) = get("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR)
            .join(DB_FILE);
    }
    PathBuf::from(DB_FILE)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn explicit_db_path_wins() {
        let cfg = config_from(&[("TALENTLAB_DB_PATH", "/tmp/x.sqlite"), ("HOME", "/home/a")]);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.sqlite"));
    }

    #[test]
    fn db_path_falls_back_to_xdg_then_home() {
        let cfg = config_from(&[("XDG_DATA_HOME", "/data"), ("HOME", "/home/a")]);
        assert_eq!(cfg.db_path, PathBuf::from("/data/talentlab/talentlab.sqlite"));

        let cfg = config_from(&[("XDG_DATA_HOME", "  "), ("HOME", "/home/a")]);
        assert_eq!(
            cfg.db_path,
            PathBuf::from("/home/a/.local/share/talentlab/talentlab.sqlite")
        );

        let cfg = config_from(&[]);
        assert_eq!(cfg.db_path, PathBuf::from("talentlab.sqlite"));
    }

    #[test]
    fn log_settings_parse_and_clamp() {
        let cfg = config_from(&[
            ("TALENTLAB_LOG_LEVEL", "debug"),
            ("TALENTLAB_LOG_FILE", "/var/log/talentlab.log"),
            ("TALENTLAB_LOG_FILE_MAX_MB", "4096"),
            ("TALENTLAB_LOG_FILE_COUNT", "nope"),
        ]);
        assert_eq!(cfg.log.level, LevelFilter::Debug);
        assert_eq!(cfg.log.file, Some(PathBuf::from("/var/log/talentlab.log")));
        assert_eq!(cfg.log.file_max_bytes, 512 * 1024 * 1024);
        assert_eq!(cfg.log.file_count, DEFAULT_LOG_FILE_COUNT);
    }

    #[test]
    fn unknown_log_level_defaults_to_info() {
        let cfg = config_from(&[("TALENTLAB_LOG_LEVEL", "loud")]);
        assert_eq!(cfg.log.level, LevelFilter::Info);
    }
}
