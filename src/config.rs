use std::path::PathBuf;

use crate::error::{Error, Result};

/// Connection parameters for the Proxmox VE API. `user` is `USER@REALM`
/// (e.g. `root@pam`), `token_id`/`api_token` an API token pair.
#[derive(Debug, Clone)]
pub struct ProxmoxConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub token_id: String,
    pub api_token: String,
    pub node: String,
}

impl ProxmoxConfig {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/api2/json", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct KubesprayConfig {
    /// Path to the Kubespray checkout holding `cluster.yml`.
    pub path: PathBuf,
    /// Directory holding one artifact directory per cluster name.
    pub inventory_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub proxmox: ProxmoxConfig,
    pub kubespray: KubesprayConfig,
}

impl Config {
    /// Reads the whole configuration from the process environment. Called
    /// once at startup; the resulting value is passed by reference from
    /// there on.
    pub fn from_env() -> Result<Self> {
        let host = require("PROXMOX_HOST")?;
        let port = match std::env::var("PROXMOX_PORT") {
            Ok(s) => s
                .parse()
                .map_err(|_| Error::Config(format!("PROXMOX_PORT {} is not a port", s)))?,
            Err(_) => 8006,
        };
        Ok(Config {
            proxmox: ProxmoxConfig {
                host,
                port,
                user: var_or("PROXMOX_USER", "root@pam"),
                token_id: require("PROXMOX_API_TOKEN_ID")?,
                api_token: require("PROXMOX_API_TOKEN")?,
                node: var_or("PROXMOX_NODE", "pve"),
            },
            kubespray: KubesprayConfig {
                path: var_or("KUBESPRAY_PATH", "/opt/kubespray").into(),
                inventory_dir: var_or("KUBESPRAY_INVENTORY_DIR", "/tmp/kubespray-inventories")
                    .into(),
            },
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::Config(format!("{} is not set", key)))
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
