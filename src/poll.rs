use std::net::Ipv4Addr;

use tokio::time::{sleep, Duration, Instant};
use tracing::debug;

use crate::error::{Error, Result};
use crate::hypervisor::{GuestInterface, Hypervisor, TaskHandle};

/// Hypervisor tasks are short relative to this, so a fixed interval is
/// fine; poll cost is a single status read.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub const DEFAULT_TASK_BUDGET: Duration = Duration::from_secs(300);

pub const DEFAULT_IP_BUDGET: Duration = Duration::from_secs(300);

/// Blocks until the task reports itself stopped, then inspects its exit
/// status. Does not retry the underlying operation; that is the caller's
/// call to make.
pub async fn wait_for_task(
    hypervisor: &dyn Hypervisor,
    task: &TaskHandle,
    budget: Duration,
) -> Result<()> {
    let deadline = Instant::now() + budget;
    loop {
        let status = hypervisor.task_status(task).await?;
        if status.is_stopped() {
            if status.succeeded() {
                return Ok(());
            }
            return Err(Error::TaskFailed {
                upid: task.0.clone(),
                exitstatus: status.exitstatus.unwrap_or_else(|| "unknown".to_owned()),
            });
        }
        if Instant::now() >= deadline {
            return Err(Error::TaskTimeout {
                upid: task.0.clone(),
                budget_secs: budget.as_secs(),
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Queries the guest agent until a usable address shows up. An absent or
/// erroring agent counts as "no address yet"; only the budget elapsing
/// fails the node.
pub async fn wait_for_ip(
    hypervisor: &dyn Hypervisor,
    vmid: u32,
    budget: Duration,
) -> Result<String> {
    let deadline = Instant::now() + budget;
    loop {
        if let Some(interfaces) = hypervisor.guest_interfaces(vmid).await? {
            if let Some(ip) = first_usable_ip(&interfaces) {
                return Ok(ip);
            }
            debug!(vmid = vmid, "guest agent up, no usable address yet");
        }
        if Instant::now() >= deadline {
            return Err(Error::IpDiscoveryTimeout {
                vmid,
                budget_secs: budget.as_secs(),
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Usable means an IPv4 address outside the loopback range, reported on an
/// interface other than `lo`.
pub fn first_usable_ip(interfaces: &[GuestInterface]) -> Option<String> {
    for interface in interfaces {
        if interface.name == "lo" {
            continue;
        }
        for addr in &interface.ip_addresses {
            if addr.ip_address_type != "ipv4" {
                continue;
            }
            if let Ok(ip) = addr.ip_address.parse::<Ipv4Addr>() {
                if !ip.is_loopback() {
                    return Some(addr.ip_address.clone());
                }
            }
        }
    }
    None
}
