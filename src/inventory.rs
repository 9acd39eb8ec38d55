use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::config::KubesprayConfig;
use crate::error::{Error, Result};
use crate::model::{ClusterNode, NodeRole};

pub const HOSTS_FILE: &str = "hosts.yaml";
pub const SSH_KEY_FILE: &str = "ssh_key";
pub const KUBECONFIG_FILE: &str = "kubeconfig";

/// Group membership is a host-name table with null values, Ansible style.
type HostSet = BTreeMap<String, Option<()>>;

#[derive(Debug, Serialize)]
struct Inventory {
    all: All,
}

#[derive(Debug, Serialize)]
struct All {
    hosts: BTreeMap<String, HostVars>,
    children: Children,
}

#[derive(Debug, Serialize)]
struct HostVars {
    ansible_host: String,
    ip: String,
    access_ip: String,
    ansible_user: String,
    ansible_ssh_private_key_file: String,
}

#[derive(Debug, Serialize)]
struct Children {
    kube_control_plane: Group,
    kube_node: Group,
    etcd: Group,
    k8s_cluster: GroupOfGroups,
    calico_rr: Group,
}

#[derive(Debug, Serialize)]
struct Group {
    hosts: HostSet,
}

#[derive(Debug, Serialize)]
struct GroupOfGroups {
    children: HostSet,
}

/// Renders the Kubespray `hosts.yaml` for an addressed node set. Control
/// plane nodes land in `kube_control_plane`, `etcd` and the umbrella
/// `k8s_cluster` group; workers in `kube_node`. Host tables are keyed maps,
/// so output depends only on the node set, not its ordering.
pub fn render_inventory(
    nodes: &[ClusterNode],
    ssh_user: &str,
    ssh_key_path: &Path,
) -> Result<String> {
    let mut hosts = BTreeMap::new();
    let mut masters = HostSet::new();
    let mut workers = HostSet::new();
    for node in nodes {
        let ip = node.ip.clone().ok_or_else(|| {
            Error::Validation(format!("node {} has no resolved address", node.name))
        })?;
        hosts.insert(
            node.name.clone(),
            HostVars {
                ansible_host: ip.clone(),
                ip: ip.clone(),
                access_ip: ip,
                ansible_user: ssh_user.to_owned(),
                ansible_ssh_private_key_file: ssh_key_path.display().to_string(),
            },
        );
        match node.role {
            NodeRole::Master => masters.insert(node.name.clone(), None),
            NodeRole::Worker => workers.insert(node.name.clone(), None),
        };
    }

    let inventory = Inventory {
        all: All {
            hosts,
            children: Children {
                kube_control_plane: Group {
                    hosts: masters.clone(),
                },
                kube_node: Group { hosts: workers },
                etcd: Group { hosts: masters },
                k8s_cluster: GroupOfGroups {
                    children: [
                        ("kube_control_plane".to_owned(), None),
                        ("kube_node".to_owned(), None),
                    ]
                    .into_iter()
                    .collect(),
                },
                calico_rr: Group {
                    hosts: HostSet::new(),
                },
            },
        },
    };
    Ok(serde_yaml::to_string(&inventory)?)
}

pub fn cluster_dir(kubespray: &KubesprayConfig, cluster: &str) -> PathBuf {
    kubespray.inventory_dir.join(cluster)
}

/// Materializes the per-cluster artifact directory: the SSH key (owner
/// read/write only), `hosts.yaml`, and a copy of Kubespray's sample
/// `group_vars`. Returns the directory path.
pub async fn prepare_cluster_dir(
    kubespray: &KubesprayConfig,
    cluster: &str,
    nodes: &[ClusterNode],
    ssh_user: &str,
    ssh_private_key: &str,
) -> Result<PathBuf> {
    let dir = cluster_dir(kubespray, cluster);
    tokio::fs::create_dir_all(dir.join("group_vars").join("all")).await?;
    tokio::fs::create_dir_all(dir.join("group_vars").join("k8s_cluster")).await?;

    let key_path = dir.join(SSH_KEY_FILE);
    tokio::fs::write(&key_path, ssh_private_key).await?;
    set_owner_only(&key_path).await?;

    let inventory = render_inventory(nodes, ssh_user, &key_path)?;
    tokio::fs::write(dir.join(HOSTS_FILE), inventory).await?;

    let sample = kubespray
        .path
        .join("inventory")
        .join("sample")
        .join("group_vars");
    let dest = dir.join("group_vars");
    let copied =
        tokio::task::spawn_blocking(move || copy_dir_recursive(&sample, &dest)).await;
    match copied {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(cluster = cluster, error = %e, "could not copy sample group_vars"),
        Err(e) => warn!(cluster = cluster, error = %e, "group_vars copy task failed"),
    }

    Ok(dir)
}

#[cfg(unix)]
async fn set_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_owner_only(_path: &Path) -> Result<()> {
    Ok(())
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

pub async fn save_kubeconfig(
    kubespray: &KubesprayConfig,
    cluster: &str,
    content: &str,
) -> Result<PathBuf> {
    let path = cluster_dir(kubespray, cluster).join(KUBECONFIG_FILE);
    tokio::fs::write(&path, content).await?;
    Ok(path)
}

/// The stored credential for a cluster, if retrieval ever succeeded.
pub async fn load_kubeconfig(kubespray: &KubesprayConfig, cluster: &str) -> Option<String> {
    tokio::fs::read_to_string(cluster_dir(kubespray, cluster).join(KUBECONFIG_FILE))
        .await
        .ok()
}
