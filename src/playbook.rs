use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::{Error, Result};
use crate::inventory::HOSTS_FILE;

/// A cluster play can legitimately run for tens of minutes; this bounds it
/// independently of the hypervisor task poller, whose only signal is
/// polling and whose budget is minutes, not hours.
pub const DEFAULT_PLAYBOOK_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Keep only this much of the error stream when embedding it in an error.
const STDERR_TAIL: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stderr_tail(&self) -> String {
        tail(&self.stderr, STDERR_TAIL)
    }
}

/// The inventory-driven automation run. Opaque to the orchestrator: it
/// supplies the artifact directory and observes captured output plus the
/// exit code, nothing else.
#[async_trait]
pub trait PlaybookRunner: Send + Sync {
    async fn run(&self, cluster_dir: &Path) -> Result<RunOutput>;
}

pub struct AnsibleRunner {
    kubespray_path: PathBuf,
    timeout: Duration,
}

impl AnsibleRunner {
    pub fn new(kubespray_path: PathBuf) -> Self {
        AnsibleRunner {
            kubespray_path,
            timeout: DEFAULT_PLAYBOOK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prefers the `ansible-playbook` from Kubespray's own virtualenv,
    /// falling back to whatever is on PATH.
    fn ansible_playbook(&self) -> PathBuf {
        let venv = self.kubespray_path.join("venv").join("bin").join("ansible-playbook");
        if venv.exists() {
            venv
        } else {
            PathBuf::from("ansible-playbook")
        }
    }
}

#[async_trait]
impl PlaybookRunner for AnsibleRunner {
    async fn run(&self, cluster_dir: &Path) -> Result<RunOutput> {
        let program = self.ansible_playbook();
        let hosts = cluster_dir.join(HOSTS_FILE);
        let playbook = self.kubespray_path.join("cluster.yml");
        info!(
            program = %program.display(),
            hosts = %hosts.display(),
            "running cluster playbook"
        );

        let mut command = Command::new(&program);
        command
            .arg("-i")
            .arg(&hosts)
            .arg(&playbook)
            .arg("-b")
            .arg("--become-user=root")
            .current_dir(&self.kubespray_path)
            .env("ANSIBLE_HOST_KEY_CHECKING", "False")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| Error::ConfigurationRunTimeout {
                budget_secs: self.timeout.as_secs(),
            })??;

        Ok(RunOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn tail(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_owned();
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    s[start..].to_owned()
}
