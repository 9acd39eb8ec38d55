use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// Opaque identifier for an asynchronous hypervisor-side operation (a
/// Proxmox UPID). Polled via [`Hypervisor::task_status`] until it stops.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TaskHandle(pub String);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub status: TaskState,
    pub exitstatus: Option<String>,
}

impl TaskStatus {
    pub fn is_stopped(&self) -> bool {
        self.status == TaskState::Stopped
    }

    pub fn succeeded(&self) -> bool {
        self.exitstatus.as_deref() == Some("OK")
    }
}

/// One interface as reported by the in-VM guest agent.
#[derive(Debug, Clone, Deserialize)]
pub struct GuestInterface {
    pub name: String,
    #[serde(rename = "ip-addresses", default)]
    pub ip_addresses: Vec<GuestIpAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestIpAddress {
    #[serde(rename = "ip-address-type")]
    pub ip_address_type: String,
    #[serde(rename = "ip-address")]
    pub ip_address: String,
}

/// One VM as reported by the hypervisor's resource listing.
#[derive(Debug, Clone, Deserialize)]
pub struct VmSummary {
    pub vmid: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Mutations return a [`TaskHandle`] to await; reads return typed records
/// validated at the boundary. A missing or unresponsive guest agent is
/// reported as `Ok(None)` by `guest_interfaces`, never as an error.
#[async_trait]
pub trait Hypervisor: Send + Sync {
    async fn next_free_vmid(&self) -> Result<u32>;

    async fn clone_vm(&self, template_vmid: u32, new_vmid: u32, name: &str)
        -> Result<TaskHandle>;

    async fn start_vm(&self, vmid: u32) -> Result<TaskHandle>;

    async fn stop_vm(&self, vmid: u32) -> Result<TaskHandle>;

    async fn delete_vm(&self, vmid: u32) -> Result<TaskHandle>;

    async fn task_status(&self, task: &TaskHandle) -> Result<TaskStatus>;

    async fn guest_interfaces(&self, vmid: u32) -> Result<Option<Vec<GuestInterface>>>;

    async fn list_vms(&self) -> Result<Vec<VmSummary>>;
}
