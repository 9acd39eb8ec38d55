use std::fmt::Formatter;
use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Cluster membership is recorded only in VM names, as
/// `{cluster}-{role}-{ordinal}` with a 1-based ordinal per role.
static NODE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)-(master|worker)-([0-9]+)$").unwrap());

static CLUSTER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Master,
    Worker,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Master => write!(f, "master"),
            NodeRole::Worker => write!(f, "worker"),
        }
    }
}

impl FromStr for NodeRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Self::Master),
            "worker" => Ok(Self::Worker),
            _ => Err(Error::Validation(format!("unknown node role {}", s))),
        }
    }
}

impl<'de> Deserialize<'de> for NodeRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NodeRole::from_str(&s).map_err(|_| SerdeError::custom(format!("invalid node role {}", s)))
    }
}

/// A provisioned virtual machine acting as a cluster member. The `ip` is
/// populated only once the node runs and its guest agent reports a
/// non-loopback IPv4 address.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ClusterNode {
    pub vmid: u32,
    pub name: String,
    pub role: NodeRole,
    pub ip: Option<String>,
}

pub fn node_name(cluster: &str, role: NodeRole, ordinal: usize) -> String {
    format!("{}-{}-{}", cluster, role, ordinal)
}

/// Splits a VM name back into `(cluster, role, ordinal)` if it follows the
/// naming convention. Non-member VMs return `None`.
pub fn parse_node_name(name: &str) -> Option<(String, NodeRole, u32)> {
    let caps = NODE_NAME.captures(name)?;
    let cluster = caps.get(1)?.as_str().to_owned();
    let role = caps.get(2)?.as_str().parse().ok()?;
    let ordinal = caps.get(3)?.as_str().parse().ok()?;
    Some((cluster, role, ordinal))
}

pub const DEFAULT_SSH_USER: &str = "ubuntu";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterOptions {
    pub name: String,
    pub template_vmid: u32,
    pub master_count: usize,
    pub worker_count: usize,
    pub ssh_private_key: String,
    pub ssh_user: String,
    pub start_vmid: Option<u32>,
}

impl ClusterOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_owned()));
        }
        if !CLUSTER_NAME.is_match(&self.name) {
            return Err(Error::Validation(format!(
                "name {} must be lowercase alphanumeric with hyphens",
                self.name
            )));
        }
        if self.template_vmid == 0 {
            return Err(Error::Validation("template_vmid must be set".to_owned()));
        }
        if self.master_count == 0 {
            return Err(Error::Validation(
                "at least one master node is required".to_owned(),
            ));
        }
        if self.ssh_private_key.is_empty() {
            return Err(Error::Validation(
                "ssh_private_key must not be empty".to_owned(),
            ));
        }
        if self.ssh_user.is_empty() {
            return Err(Error::Validation("ssh_user must not be empty".to_owned()));
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.master_count + self.worker_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ClusterState {
    Creating,
    Provisioning,
    Running,
    Failed,
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClusterState::Creating => write!(f, "creating"),
            ClusterState::Provisioning => write!(f, "provisioning"),
            ClusterState::Running => write!(f, "running"),
            ClusterState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a cluster creation. On failure the node list is empty and
/// `error` carries the original failure description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub name: String,
    pub status: ClusterState,
    pub nodes: Vec<ClusterNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A cluster member as seen by the membership scan, with the VM status the
/// hypervisor reports for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberVm {
    pub vmid: u32,
    pub name: String,
    pub role: NodeRole,
    pub status: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub name: String,
    pub master_count: usize,
    pub worker_count: usize,
    pub status: String,
    pub nodes: Vec<MemberVm>,
}
