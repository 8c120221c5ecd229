// ABOUTME: Runtime configuration for Warden loaded from environment variables
// ABOUTME: Database pool limits, digest cost parameters, and issuance retry bounds

pub mod constants;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use constants::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{name} must be at least {min}, got {value}")]
    BelowMinimum {
        name: &'static str,
        min: u64,
        value: u64,
    },
}

/// SQLite connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: warden_core::default_database_path(),
            max_connections: 10,
            busy_timeout_secs: 30,
        }
    }
}

/// Argon2id cost parameters used when digesting token secrets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for DigestCost {
    fn default() -> Self {
        // OWASP minimum recommendation for Argon2id
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub digest_cost: DigestCost,
    pub issue_max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            digest_cost: DigestCost::default(),
            issue_max_attempts: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let path = lookup(WARDEN_DATABASE_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.database.path);

        let max_connections = parse_var(
            &lookup,
            WARDEN_MAX_CONNECTIONS,
            defaults.database.max_connections,
        )?;
        ensure_min(WARDEN_MAX_CONNECTIONS, max_connections as u64, 1)?;

        let busy_timeout_secs = parse_var(
            &lookup,
            WARDEN_BUSY_TIMEOUT_SECS,
            defaults.database.busy_timeout_secs,
        )?;

        let memory_kib = parse_var(
            &lookup,
            WARDEN_HASH_MEMORY_KIB,
            defaults.digest_cost.memory_kib,
        )?;
        let iterations = parse_var(
            &lookup,
            WARDEN_HASH_ITERATIONS,
            defaults.digest_cost.iterations,
        )?;
        ensure_min(WARDEN_HASH_ITERATIONS, iterations as u64, 1)?;
        let parallelism = parse_var(
            &lookup,
            WARDEN_HASH_PARALLELISM,
            defaults.digest_cost.parallelism,
        )?;
        ensure_min(WARDEN_HASH_PARALLELISM, parallelism as u64, 1)?;
        // Argon2 requires at least 8 KiB per lane
        ensure_min(
            WARDEN_HASH_MEMORY_KIB,
            memory_kib as u64,
            8 * parallelism as u64,
        )?;

        let issue_max_attempts = parse_var(
            &lookup,
            WARDEN_ISSUE_MAX_ATTEMPTS,
            defaults.issue_max_attempts,
        )?;
        ensure_min(WARDEN_ISSUE_MAX_ATTEMPTS, issue_max_attempts as u64, 1)?;

        let config = Config {
            database: DatabaseConfig {
                path,
                max_connections,
                busy_timeout_secs,
            },
            digest_cost: DigestCost {
                memory_kib,
                iterations,
                parallelism,
            },
            issue_max_attempts,
        };

        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { name, value: raw })
        }
        _ => Ok(default),
    }
}

fn ensure_min(name: &'static str, value: u64, min: u64) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::BelowMinimum { name, min, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.busy_timeout_secs, 30);
        assert_eq!(config.digest_cost, DigestCost::default());
        assert_eq!(config.issue_max_attempts, 3);
        assert!(config.database.path.ends_with(".warden/warden.db"));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            (WARDEN_DATABASE_PATH, "/var/lib/warden/tokens.db"),
            (WARDEN_MAX_CONNECTIONS, "4"),
            (WARDEN_HASH_MEMORY_KIB, "65536"),
            (WARDEN_HASH_ITERATIONS, "3"),
            (WARDEN_HASH_PARALLELISM, "2"),
            (WARDEN_ISSUE_MAX_ATTEMPTS, "5"),
        ]))
        .unwrap();

        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/warden/tokens.db")
        );
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(
            config.digest_cost,
            DigestCost {
                memory_kib: 65536,
                iterations: 3,
                parallelism: 2,
            }
        );
        assert_eq!(config.issue_max_attempts, 5);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(WARDEN_HASH_ITERATIONS, "many")]));

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                name: WARDEN_HASH_ITERATIONS,
                value: "many".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(WARDEN_ISSUE_MAX_ATTEMPTS, "0")]));

        assert!(matches!(
            result,
            Err(ConfigError::BelowMinimum {
                name: WARDEN_ISSUE_MAX_ATTEMPTS,
                ..
            })
        ));
    }

    #[test]
    fn test_memory_must_cover_all_lanes() {
        let result = Config::from_lookup(lookup_from(&[
            (WARDEN_HASH_MEMORY_KIB, "16"),
            (WARDEN_HASH_PARALLELISM, "4"),
        ]));

        assert!(matches!(
            result,
            Err(ConfigError::BelowMinimum { min: 32, .. })
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var(WARDEN_MAX_CONNECTIONS, "2");
        let config = Config::from_env();
        env::remove_var(WARDEN_MAX_CONNECTIONS);

        assert_eq!(config.unwrap().database.max_connections, 2);
    }
}
