use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProxmoxConfig;
use crate::error::{Error, Result};
use crate::hypervisor::{GuestInterface, Hypervisor, TaskHandle, TaskStatus, VmSummary};

/// Every Proxmox response wraps its payload in a `data` field.
#[derive(Debug, Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AgentResult {
    result: Vec<GuestInterface>,
}

pub struct ProxmoxClient {
    client: Client,
    base_url: String,
    auth: String,
    node: String,
}

impl ProxmoxClient {
    pub fn new(config: &ProxmoxConfig) -> Result<Self> {
        // Proxmox installs commonly run on self-signed certificates.
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(ProxmoxClient {
            client,
            base_url: config.base_url(),
            auth: format!(
                "PVEAPIToken={}!{}={}",
                config.user, config.token_id, config.api_token
            ),
            node: config.node.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .get(url)
            .header("Authorization", &self.auth)
            .send()
            .await?;
        Self::parse(path, res).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .post(url)
            .header("Authorization", &self.auth)
            .form(form)
            .send()
            .await?;
        Self::parse(path, res).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .delete(url)
            .header("Authorization", &self.auth)
            .send()
            .await?;
        Self::parse(path, res).await
    }

    async fn parse<T: DeserializeOwned>(path: &str, res: reqwest::Response) -> Result<T> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Api(format!("{} returned {}: {}", path, status, body)));
        }
        Ok(res.json::<Data<T>>().await?.data)
    }

    fn qemu_path(&self, vmid: u32, suffix: &str) -> String {
        format!("/nodes/{}/qemu/{}{}", self.node, vmid, suffix)
    }
}

#[async_trait]
impl Hypervisor for ProxmoxClient {
    async fn next_free_vmid(&self) -> Result<u32> {
        let id: String = self.get("/cluster/nextid").await?;
        id.parse()
            .map_err(|_| Error::Api(format!("/cluster/nextid returned {}", id)))
    }

    async fn clone_vm(
        &self,
        template_vmid: u32,
        new_vmid: u32,
        name: &str,
    ) -> Result<TaskHandle> {
        let upid: String = self
            .post(
                &self.qemu_path(template_vmid, "/clone"),
                &[
                    ("newid", new_vmid.to_string()),
                    ("name", name.to_owned()),
                    ("full", "1".to_owned()),
                ],
            )
            .await?;
        Ok(TaskHandle(upid))
    }

    async fn start_vm(&self, vmid: u32) -> Result<TaskHandle> {
        let upid: String = self.post(&self.qemu_path(vmid, "/status/start"), &[]).await?;
        Ok(TaskHandle(upid))
    }

    async fn stop_vm(&self, vmid: u32) -> Result<TaskHandle> {
        let upid: String = self.post(&self.qemu_path(vmid, "/status/stop"), &[]).await?;
        Ok(TaskHandle(upid))
    }

    async fn delete_vm(&self, vmid: u32) -> Result<TaskHandle> {
        let upid: String = self.delete(&self.qemu_path(vmid, "")).await?;
        Ok(TaskHandle(upid))
    }

    async fn task_status(&self, task: &TaskHandle) -> Result<TaskStatus> {
        self.get(&format!("/nodes/{}/tasks/{}/status", self.node, task.0))
            .await
    }

    async fn guest_interfaces(&self, vmid: u32) -> Result<Option<Vec<GuestInterface>>> {
        // The agent may not be installed or up yet; report that as no data
        // rather than a failure of the node.
        match self
            .get::<AgentResult>(&self.qemu_path(vmid, "/agent/network-get-interfaces"))
            .await
        {
            Ok(res) => Ok(Some(res.result)),
            Err(e) => {
                debug!(vmid = vmid, error = %e, "guest agent not responding");
                Ok(None)
            }
        }
    }

    async fn list_vms(&self) -> Result<Vec<VmSummary>> {
        self.get("/cluster/resources?type=vm").await
    }
}
