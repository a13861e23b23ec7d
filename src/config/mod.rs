use std::env;

use crate::utils::commastr_to_list;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    pub default_domain: String,
    pub netbox_url: String,
    pub netbox_token: String,
    pub becs_url: String,
    pub becs_username: String,
    pub becs_password: String,
    pub becs_element_type: String,
    pub oxidized_url: String,
    pub records_file: String,
    pub dns_reload_command: String,
    pub ignore_platforms: Vec<String>,
    pub ignore_models: Vec<String>,
    pub sync_interval_secs: u64,
    pub notify_webhook: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            db_path: get_env("DB_PATH", "/data/element-sync.db"),
            db_max_connections: get_env("DB_MAX_CONNECTIONS", "5").parse().unwrap_or(5),
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            default_domain: get_env("DEFAULT_DOMAIN", "example.com"),
            netbox_url: get_env("NETBOX_URL", ""),
            netbox_token: get_env("NETBOX_TOKEN", ""),
            becs_url: get_env("BECS_URL", ""),
            becs_username: get_env("BECS_USERNAME", ""),
            becs_password: get_env("BECS_PASSWORD", ""),
            becs_element_type: get_env("BECS_ELEMENT_TYPE", "ibos"),
            oxidized_url: get_env("OXIDIZED_URL", ""),
            records_file: get_env("DNS_RECORDS_FILE", "/etc/dnsmgr/records-elements"),
            dns_reload_command: get_env("DNS_RELOAD_COMMAND", ""),
            ignore_platforms: commastr_to_list(&get_env("DNS_IGNORE_PLATFORMS", ""), None),
            ignore_models: commastr_to_list(&get_env("DNS_IGNORE_MODELS", ""), None),
            sync_interval_secs: get_env("SYNC_INTERVAL_SECS", "3600").parse().unwrap_or(3600),
            notify_webhook: get_env("NOTIFY_WEBHOOK", ""),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for tests, independent of the environment
    pub fn test_defaults() -> Self {
        Self {
            db_path: String::new(),
            db_max_connections: 1,
            listen_addr: "127.0.0.1:0".to_string(),
            default_domain: "example.com".to_string(),
            netbox_url: String::new(),
            netbox_token: String::new(),
            becs_url: String::new(),
            becs_username: String::new(),
            becs_password: String::new(),
            becs_element_type: "ibos".to_string(),
            oxidized_url: String::new(),
            records_file: String::new(),
            dns_reload_command: String::new(),
            ignore_platforms: Vec::new(),
            ignore_models: Vec::new(),
            sync_interval_secs: 0,
            notify_webhook: String::new(),
        }
    }
}
