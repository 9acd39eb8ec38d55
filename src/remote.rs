use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::Result;

/// Where kubeadm leaves the cluster-admin credential on a control plane
/// node.
const ADMIN_KUBECONFIG: &str = "/etc/kubernetes/admin.conf";

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs one command on a remote host over a secure shell.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn run(
        &self,
        host: &str,
        user: &str,
        key_path: &Path,
        command: &str,
    ) -> Result<CommandOutput>;
}

/// Shells out to the system `ssh`. Host keys are not checked: the targets
/// are freshly cloned VMs whose keys were generated moments ago.
pub struct SshExecutor;

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(
        &self,
        host: &str,
        user: &str,
        key_path: &Path,
        command: &str,
    ) -> Result<CommandOutput> {
        let output = Command::new("ssh")
            .arg("-i")
            .arg(key_path)
            .args(["-o", "StrictHostKeyChecking=no"])
            .args(["-o", "UserKnownHostsFile=/dev/null"])
            .arg(format!("{}@{}", user, host))
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Reads the generated admin kubeconfig off one control plane node. Any
/// failure (connection, auth, non-zero exit, empty output) means "not
/// available yet" and yields `None`; the caller decides whether that is
/// fatal.
pub async fn retrieve_kubeconfig(
    executor: &dyn RemoteExecutor,
    host: &str,
    user: &str,
    key_path: &Path,
) -> Option<String> {
    info!(host = host, "retrieving kubeconfig over ssh");
    let command = format!("sudo cat {}", ADMIN_KUBECONFIG);
    match executor.run(host, user, key_path, &command).await {
        Ok(output) if output.success() && !output.stdout.is_empty() => Some(output.stdout),
        Ok(output) => {
            warn!(
                host = host,
                exit_code = output.exit_code,
                stderr = output.stderr.trim(),
                "kubeconfig not retrievable yet"
            );
            None
        }
        Err(e) => {
            warn!(host = host, error = %e, "ssh to control plane node failed");
            None
        }
    }
}
