//! Runtime configuration.
//!
//! Precedence, lowest first:
//!
//! 1. built-in defaults (`<home>/.netcad/cache`)
//! 2. `<home>/.netcad/config.yaml`, if present
//! 3. environment: `NETCAD_CACHEDIR`, `NETBOX_ADDR`, `NETBOX_TOKEN`,
//!    `NETBOX_TIMEOUT`
//!
//! As with the registry, every loader has an `_at` form that takes an
//! explicit home directory and environment lookup; tests use only those.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::CacheStore;
use crate::error::ConfigError;

pub const ENV_CACHE_DIR: &str = "NETCAD_CACHEDIR";
pub const ENV_NETBOX_ADDR: &str = "NETBOX_ADDR";
pub const ENV_NETBOX_TOKEN: &str = "NETBOX_TOKEN";
pub const ENV_NETBOX_TIMEOUT: &str = "NETBOX_TIMEOUT";

pub const DEFAULT_NETBOX_TIMEOUT_SECS: u64 = 60;

/// Connection settings for a NetBox origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetboxSettings {
    pub url: String,
    pub token: String,
    pub timeout_secs: u64,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetcadConfig {
    pub cache_dir: PathBuf,
    netbox_url: Option<String>,
    netbox_token: Option<String>,
    netbox_timeout_secs: u64,
}

/// On-disk `config.yaml` shape. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    cache_dir: Option<PathBuf>,
    /// `None` for both an absent and a bare `netbox:` key.
    netbox: Option<NetboxSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetboxSection {
    url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

impl NetcadConfig {
    /// NetBox settings, or the first missing setting.
    pub fn netbox(&self) -> Result<NetboxSettings, ConfigError> {
        let url = self
            .netbox_url
            .clone()
            .ok_or(ConfigError::MissingSetting(ENV_NETBOX_ADDR))?;
        let token = self
            .netbox_token
            .clone()
            .ok_or(ConfigError::MissingSetting(ENV_NETBOX_TOKEN))?;
        Ok(NetboxSettings {
            url,
            token,
            timeout_secs: self.netbox_timeout_secs,
        })
    }

    pub fn cache_store(&self) -> CacheStore {
        CacheStore::new(&self.cache_dir)
    }
}

/// `<home>/.netcad/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".netcad").join("config.yaml")
}

/// Load configuration for `home`, reading variables through `env`.
pub fn load_at<F>(home: &Path, env: F) -> Result<NetcadConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = read_config_file(&config_path_at(home))?;
    let netbox = file.netbox.unwrap_or_default();
    let env_var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let cache_dir = env_var(ENV_CACHE_DIR)
        .map(PathBuf::from)
        .or(file.cache_dir)
        .unwrap_or_else(|| home.join(".netcad").join("cache"));

    let netbox_timeout_secs = match env_var(ENV_NETBOX_TIMEOUT) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue {
                name: ENV_NETBOX_TIMEOUT,
                value: raw,
            })?,
        None => netbox.timeout_secs.unwrap_or(DEFAULT_NETBOX_TIMEOUT_SECS),
    };

    Ok(NetcadConfig {
        cache_dir,
        netbox_url: env_var(ENV_NETBOX_ADDR).or(netbox.url),
        netbox_token: env_var(ENV_NETBOX_TOKEN).or(netbox.token),
        netbox_timeout_secs,
    })
}

/// `load_at` convenience wrapper using the process home and environment.
pub fn load() -> Result<NetcadConfig, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    load_at(&home, |name| std::env::var(name).ok())
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn write_config(home: &Path, yaml: &str) {
        let path = config_path_at(home);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    #[test]
    fn defaults_without_file_or_env() {
        let home = TempDir::new().unwrap();
        let cfg = load_at(home.path(), env_of(&[])).unwrap();
        assert_eq!(cfg.cache_dir, home.path().join(".netcad").join("cache"));
        let err = cfg.netbox().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting(ENV_NETBOX_ADDR)));
    }

    #[test]
    fn file_values_are_used() {
        let home = TempDir::new().unwrap();
        write_config(
            home.path(),
            "cache_dir: /var/cache/netcad\nnetbox:\n  url: https://nb.example\n  token: abc\n  timeout_secs: 5\n",
        );
        let cfg = load_at(home.path(), env_of(&[])).unwrap();
        assert_eq!(cfg.cache_dir, PathBuf::from("/var/cache/netcad"));
        let nb = cfg.netbox().unwrap();
        assert_eq!(nb.url, "https://nb.example");
        assert_eq!(nb.token, "abc");
        assert_eq!(nb.timeout_secs, 5);
    }

    #[test]
    fn env_overrides_file() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), "netbox:\n  url: https://file\n  token: file-token\n");
        let cfg = load_at(
            home.path(),
            env_of(&[
                (ENV_NETBOX_ADDR, "https://env"),
                (ENV_CACHE_DIR, "/tmp/nc"),
                (ENV_NETBOX_TIMEOUT, "9"),
            ]),
        )
        .unwrap();
        let nb = cfg.netbox().unwrap();
        assert_eq!(nb.url, "https://env");
        assert_eq!(nb.token, "file-token");
        assert_eq!(nb.timeout_secs, 9);
        assert_eq!(cfg.cache_dir, PathBuf::from("/tmp/nc"));
    }

    #[test]
    fn missing_token_is_reported() {
        let home = TempDir::new().unwrap();
        let cfg = load_at(home.path(), env_of(&[(ENV_NETBOX_ADDR, "https://nb")])).unwrap();
        assert!(matches!(
            cfg.netbox().unwrap_err(),
            ConfigError::MissingSetting(ENV_NETBOX_TOKEN)
        ));
    }

    #[test]
    fn bad_timeout_is_invalid_value() {
        let home = TempDir::new().unwrap();
        let err = load_at(home.path(), env_of(&[(ENV_NETBOX_TIMEOUT, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "got: {err}");
    }

    #[test]
    fn bare_netbox_key_is_an_empty_section() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), "cache_dir: /srv/netcad\nnetbox:\n");
        let cfg = load_at(home.path(), env_of(&[(ENV_NETBOX_TOKEN, "t")])).unwrap();
        assert_eq!(cfg.cache_dir, PathBuf::from("/srv/netcad"));
        assert!(matches!(
            cfg.netbox().unwrap_err(),
            ConfigError::MissingSetting(ENV_NETBOX_ADDR)
        ));
    }

    #[test]
    fn malformed_file_is_parse_error_with_path() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), "netbox: [unclosed");
        let err = load_at(home.path(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.yaml"));
    }
}
