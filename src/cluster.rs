use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::KubesprayConfig;
use crate::error::{Error, Result};
use crate::hypervisor::Hypervisor;
use crate::inventory::{self, SSH_KEY_FILE};
use crate::model::{
    node_name, parse_node_name, ClusterNode, ClusterOptions, ClusterState, ClusterStatus,
    ClusterSummary, MemberVm, NodeRole,
};
use crate::playbook::PlaybookRunner;
use crate::poll::{first_usable_ip, wait_for_ip, wait_for_task, DEFAULT_IP_BUDGET, DEFAULT_TASK_BUDGET};
use crate::remote::{retrieve_kubeconfig, RemoteExecutor};

/// Drives a cluster from template clones to a provisioned Kubernetes
/// control plane. One creation request runs at a time against a given
/// hypervisor target; stages and nodes are processed sequentially so the
/// set of nodes needing compensation is exact at every point.
pub struct ClusterManager {
    hypervisor: Arc<dyn Hypervisor>,
    runner: Arc<dyn PlaybookRunner>,
    executor: Arc<dyn RemoteExecutor>,
    kubespray: KubesprayConfig,
}

impl ClusterManager {
    pub fn new(
        hypervisor: Arc<dyn Hypervisor>,
        runner: Arc<dyn PlaybookRunner>,
        executor: Arc<dyn RemoteExecutor>,
        kubespray: KubesprayConfig,
    ) -> Self {
        ClusterManager {
            hypervisor,
            runner,
            executor,
            kubespray,
        }
    }

    /// Creates a cluster end to end. Never returns an error: any failure
    /// tears down the nodes created so far and comes back as a `failed`
    /// status carrying the original error description.
    pub async fn create_cluster(&self, options: ClusterOptions) -> ClusterStatus {
        if let Err(e) = options.validate() {
            return ClusterStatus {
                name: options.name.clone(),
                status: ClusterState::Failed,
                nodes: Vec::new(),
                error: Some(e.to_string()),
            };
        }

        info!(
            cluster = %options.name,
            state = %ClusterState::Creating,
            masters = options.master_count,
            workers = options.worker_count,
            "creating cluster"
        );

        let mut nodes = Vec::with_capacity(options.node_count());
        match self.provision(&options, &mut nodes).await {
            Ok(()) => {
                info!(cluster = %options.name, nodes = nodes.len(), "cluster is running");
                ClusterStatus {
                    name: options.name,
                    status: ClusterState::Running,
                    nodes,
                    error: None,
                }
            }
            Err(e) => {
                error!(cluster = %options.name, error = %e, "cluster creation failed");
                if !nodes.is_empty() {
                    info!(
                        cluster = %options.name,
                        nodes = nodes.len(),
                        "tearing down nodes created so far"
                    );
                    self.delete_nodes(&nodes).await;
                }
                ClusterStatus {
                    name: options.name,
                    status: ClusterState::Failed,
                    nodes: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// The forward path. Confirmed-created nodes accumulate in `nodes` so
    /// the caller can compensate for exactly those on failure.
    async fn provision(
        &self,
        options: &ClusterOptions,
        nodes: &mut Vec<ClusterNode>,
    ) -> Result<()> {
        self.ensure_name_unused(&options.name).await?;

        let start_vmid = match options.start_vmid {
            Some(vmid) => vmid,
            None => self.hypervisor.next_free_vmid().await?,
        };

        // Clone all masters, then all workers, awaiting each clone before
        // issuing the next: clones contend for the template and the
        // storage backend, and a node joins `nodes` only once its clone
        // task has finished.
        let mut vmid = start_vmid;
        for (role, count) in [
            (NodeRole::Master, options.master_count),
            (NodeRole::Worker, options.worker_count),
        ] {
            for ordinal in 1..=count {
                let name = node_name(&options.name, role, ordinal);
                info!(cluster = %options.name, node = %name, vmid = vmid, "cloning template");
                let task = self
                    .hypervisor
                    .clone_vm(options.template_vmid, vmid, &name)
                    .await?;
                wait_for_task(self.hypervisor.as_ref(), &task, DEFAULT_TASK_BUDGET).await?;
                nodes.push(ClusterNode {
                    vmid,
                    name,
                    role,
                    ip: None,
                });
                vmid += 1;
            }
        }

        for node in nodes.iter() {
            info!(cluster = %options.name, node = %node.name, "starting node");
            let task = self.hypervisor.start_vm(node.vmid).await?;
            wait_for_task(self.hypervisor.as_ref(), &task, DEFAULT_TASK_BUDGET).await?;
        }

        for node in nodes.iter_mut() {
            let ip = wait_for_ip(self.hypervisor.as_ref(), node.vmid, DEFAULT_IP_BUDGET).await?;
            info!(cluster = %options.name, node = %node.name, ip = %ip, "node reported address");
            node.ip = Some(ip);
        }

        info!(
            cluster = %options.name,
            state = %ClusterState::Provisioning,
            "writing inventory and running the cluster playbook"
        );
        let dir = inventory::prepare_cluster_dir(
            &self.kubespray,
            &options.name,
            nodes,
            &options.ssh_user,
            &options.ssh_private_key,
        )
        .await?;

        let output = self.runner.run(&dir).await?;
        if !output.success() {
            return Err(Error::ConfigurationRunFailed {
                code: output.exit_code,
                stderr: output.stderr_tail(),
            });
        }

        // One control plane node is enough; if the credential is not there
        // yet the cluster may still be usable by other means, so absence
        // is logged, never fatal.
        if let Some(master) = nodes.iter().find(|n| n.role == NodeRole::Master) {
            if let Some(ip) = &master.ip {
                let key_path = dir.join(SSH_KEY_FILE);
                match retrieve_kubeconfig(
                    self.executor.as_ref(),
                    ip,
                    &options.ssh_user,
                    &key_path,
                )
                .await
                {
                    Some(content) => {
                        let path =
                            inventory::save_kubeconfig(&self.kubespray, &options.name, &content)
                                .await?;
                        info!(cluster = %options.name, path = %path.display(), "kubeconfig saved");
                    }
                    None => warn!(
                        cluster = %options.name,
                        "cluster created but its kubeconfig could not be retrieved"
                    ),
                }
            }
        }

        Ok(())
    }

    /// Node names are the only membership record, so a name collision
    /// would silently splice new nodes into an existing cluster.
    async fn ensure_name_unused(&self, cluster: &str) -> Result<()> {
        let vms = self.hypervisor.list_vms().await?;
        for vm in vms {
            if let Some(name) = vm.name {
                if let Some((existing, _, _)) = parse_node_name(&name) {
                    if existing == cluster {
                        return Err(Error::Validation(format!(
                            "cluster {} already exists (found {})",
                            cluster, name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Best-effort stop-then-delete over every node. A node may already be
    /// stopped or half-created, so stop failures are expected; delete
    /// failures are logged per node and never abort the loop.
    pub async fn delete_nodes(&self, nodes: &[ClusterNode]) {
        for node in nodes {
            info!(node = %node.name, vmid = node.vmid, "stopping node");
            match self.hypervisor.stop_vm(node.vmid).await {
                Ok(task) => {
                    if let Err(e) =
                        wait_for_task(self.hypervisor.as_ref(), &task, DEFAULT_TASK_BUDGET).await
                    {
                        warn!(node = %node.name, error = %e, "stop did not complete");
                    }
                }
                Err(e) => warn!(node = %node.name, error = %e, "stop request failed"),
            }

            info!(node = %node.name, vmid = node.vmid, "deleting node");
            match self.hypervisor.delete_vm(node.vmid).await {
                Ok(task) => {
                    match wait_for_task(self.hypervisor.as_ref(), &task, DEFAULT_TASK_BUDGET).await
                    {
                        Ok(()) => info!(node = %node.name, "node deleted"),
                        Err(e) => warn!(node = %node.name, error = %e, "delete did not complete"),
                    }
                }
                Err(e) => warn!(node = %node.name, error = %e, "delete request failed"),
            }
        }
    }

    /// User-initiated deletion: membership is re-discovered from the
    /// naming convention, not from any stored state. Returns how many
    /// nodes were torn down.
    pub async fn delete_cluster(&self, cluster: &str) -> Result<usize> {
        let nodes = self.find_members(cluster).await?;
        if nodes.is_empty() {
            return Err(Error::ClusterNotFound(cluster.to_owned()));
        }
        info!(cluster = cluster, nodes = nodes.len(), "deleting cluster");
        self.delete_nodes(&nodes).await;
        Ok(nodes.len())
    }

    async fn find_members(&self, cluster: &str) -> Result<Vec<ClusterNode>> {
        let vms = self.hypervisor.list_vms().await?;
        let mut members = Vec::new();
        for vm in vms {
            let Some(name) = vm.name else { continue };
            let Some((owner, role, ordinal)) = parse_node_name(&name) else {
                continue;
            };
            if owner == cluster {
                members.push((role, ordinal, ClusterNode {
                    vmid: vm.vmid,
                    name,
                    role,
                    ip: None,
                }));
            }
        }
        members.sort_by_key(|(role, ordinal, _)| (*role == NodeRole::Worker, *ordinal));
        Ok(members.into_iter().map(|(_, _, node)| node).collect())
    }

    /// Reconstructs the set of existing clusters by scanning all VMs and
    /// grouping them by the naming convention. A cluster counts as
    /// `running` only when every member VM runs.
    pub async fn list_clusters(&self) -> Result<Vec<ClusterSummary>> {
        let vms = self.hypervisor.list_vms().await?;
        let mut grouped: BTreeMap<String, Vec<(bool, u32, MemberVm)>> = BTreeMap::new();
        for vm in vms {
            let Some(name) = vm.name else { continue };
            let Some((cluster, role, ordinal)) = parse_node_name(&name) else {
                continue;
            };
            let status = vm.status.unwrap_or_else(|| "unknown".to_owned());
            let ip = if status == "running" {
                self.hypervisor
                    .guest_interfaces(vm.vmid)
                    .await?
                    .as_deref()
                    .and_then(first_usable_ip)
            } else {
                None
            };
            grouped.entry(cluster).or_default().push((
                role == NodeRole::Worker,
                ordinal,
                MemberVm {
                    vmid: vm.vmid,
                    name,
                    role,
                    status,
                    ip,
                },
            ));
        }

        let mut clusters = Vec::with_capacity(grouped.len());
        for (name, mut members) in grouped {
            members.sort_by_key(|(worker, ordinal, _)| (*worker, *ordinal));
            let nodes: Vec<MemberVm> = members.into_iter().map(|(_, _, m)| m).collect();
            let status = if nodes.iter().all(|n| n.status == "running") {
                "running"
            } else {
                "partial"
            };
            clusters.push(ClusterSummary {
                master_count: nodes.iter().filter(|n| n.role == NodeRole::Master).count(),
                worker_count: nodes.iter().filter(|n| n.role == NodeRole::Worker).count(),
                status: status.to_owned(),
                name,
                nodes,
            });
        }
        Ok(clusters)
    }

    /// The stored credential artifact for a cluster, if retrieval ever
    /// succeeded.
    pub async fn kubeconfig(&self, cluster: &str) -> Option<String> {
        inventory::load_kubeconfig(&self.kubespray, cluster).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::hypervisor::{
        GuestInterface, GuestIpAddress, TaskHandle, TaskState, TaskStatus, VmSummary,
    };
    use crate::model::DEFAULT_SSH_USER;
    use crate::playbook::RunOutput;
    use crate::remote::CommandOutput;

    /// A hypervisor double that completes every task immediately, hands
    /// out guest addresses derived from the vmid, and records every
    /// mutation in order.
    #[derive(Default)]
    struct FakeProxmox {
        ops: Mutex<Vec<String>>,
        existing: Vec<VmSummary>,
        fail_clone: Option<u32>,
        fail_start: Option<u32>,
        next_free_calls: Mutex<usize>,
    }

    impl FakeProxmox {
        fn record(&self, op: &str, vmid: u32) {
            self.ops.lock().unwrap().push(format!("{} {}", op, vmid));
        }

        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }

        fn ip_for(vmid: u32) -> String {
            format!("10.0.0.{}", vmid - 95)
        }
    }

    #[async_trait]
    impl Hypervisor for FakeProxmox {
        async fn next_free_vmid(&self) -> crate::error::Result<u32> {
            *self.next_free_calls.lock().unwrap() += 1;
            Ok(100)
        }

        async fn clone_vm(
            &self,
            _template_vmid: u32,
            new_vmid: u32,
            _name: &str,
        ) -> crate::error::Result<TaskHandle> {
            self.record("clone", new_vmid);
            Ok(TaskHandle(format!("clone-{}", new_vmid)))
        }

        async fn start_vm(&self, vmid: u32) -> crate::error::Result<TaskHandle> {
            self.record("start", vmid);
            Ok(TaskHandle(format!("start-{}", vmid)))
        }

        async fn stop_vm(&self, vmid: u32) -> crate::error::Result<TaskHandle> {
            self.record("stop", vmid);
            Ok(TaskHandle(format!("stop-{}", vmid)))
        }

        async fn delete_vm(&self, vmid: u32) -> crate::error::Result<TaskHandle> {
            self.record("delete", vmid);
            Ok(TaskHandle(format!("delete-{}", vmid)))
        }

        async fn task_status(&self, task: &TaskHandle) -> crate::error::Result<TaskStatus> {
            let (op, vmid) = task.0.split_once('-').unwrap();
            let vmid: u32 = vmid.parse().unwrap();
            let failed = (op == "clone" && self.fail_clone == Some(vmid))
                || (op == "start" && self.fail_start == Some(vmid));
            Ok(TaskStatus {
                status: TaskState::Stopped,
                exitstatus: Some(if failed {
                    format!("{} failed", op)
                } else {
                    "OK".to_owned()
                }),
            })
        }

        async fn guest_interfaces(
            &self,
            vmid: u32,
        ) -> crate::error::Result<Option<Vec<GuestInterface>>> {
            Ok(Some(vec![GuestInterface {
                name: "eth0".to_owned(),
                ip_addresses: vec![GuestIpAddress {
                    ip_address_type: "ipv4".to_owned(),
                    ip_address: Self::ip_for(vmid),
                }],
            }]))
        }

        async fn list_vms(&self) -> crate::error::Result<Vec<VmSummary>> {
            Ok(self.existing.clone())
        }
    }

    struct FakeRunner {
        output: RunOutput,
        dirs: Mutex<Vec<PathBuf>>,
    }

    impl FakeRunner {
        fn succeeding() -> Self {
            FakeRunner {
                output: RunOutput {
                    exit_code: 0,
                    stdout: "PLAY RECAP".to_owned(),
                    stderr: String::new(),
                },
                dirs: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            FakeRunner {
                output: RunOutput {
                    exit_code: 2,
                    stdout: String::new(),
                    stderr: "fatal: unreachable".to_owned(),
                },
                dirs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlaybookRunner for FakeRunner {
        async fn run(&self, cluster_dir: &Path) -> crate::error::Result<RunOutput> {
            self.dirs.lock().unwrap().push(cluster_dir.to_path_buf());
            Ok(self.output.clone())
        }
    }

    struct FakeSsh {
        stdout: String,
    }

    #[async_trait]
    impl RemoteExecutor for FakeSsh {
        async fn run(
            &self,
            _host: &str,
            _user: &str,
            _key_path: &Path,
            _command: &str,
        ) -> crate::error::Result<CommandOutput> {
            Ok(CommandOutput {
                exit_code: 0,
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    fn options() -> ClusterOptions {
        ClusterOptions {
            name: "demo".to_owned(),
            template_vmid: 9000,
            master_count: 1,
            worker_count: 2,
            ssh_private_key: "<key>".to_owned(),
            ssh_user: DEFAULT_SSH_USER.to_owned(),
            start_vmid: None,
        }
    }

    fn kubespray(tmp: &TempDir) -> KubesprayConfig {
        KubesprayConfig {
            path: tmp.path().join("kubespray"),
            inventory_dir: tmp.path().join("inventories"),
        }
    }

    fn manager(
        tmp: &TempDir,
        hypervisor: Arc<FakeProxmox>,
        runner: FakeRunner,
        kubeconfig: &str,
    ) -> ClusterManager {
        ClusterManager::new(
            hypervisor,
            Arc::new(runner),
            Arc::new(FakeSsh {
                stdout: kubeconfig.to_owned(),
            }),
            kubespray(tmp),
        )
    }

    fn vm(vmid: u32, name: &str, status: &str) -> VmSummary {
        VmSummary {
            vmid,
            name: Some(name.to_owned()),
            status: Some(status.to_owned()),
        }
    }

    #[tokio::test]
    async fn three_node_cluster_comes_up() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox::default());
        let runner = Arc::new(FakeRunner::succeeding());
        let mgr = ClusterManager::new(
            hv.clone(),
            runner.clone(),
            Arc::new(FakeSsh {
                stdout: "apiVersion: v1\n".to_owned(),
            }),
            kubespray(&tmp),
        );

        let status = mgr.create_cluster(options()).await;

        assert_eq!(status.status, ClusterState::Running);
        assert_eq!(status.error, None);
        let names: Vec<&str> = status.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["demo-master-1", "demo-worker-1", "demo-worker-2"]);
        let vmids: Vec<u32> = status.nodes.iter().map(|n| n.vmid).collect();
        assert_eq!(vmids, [100, 101, 102]);
        let ips: Vec<&str> = status
            .nodes
            .iter()
            .map(|n| n.ip.as_deref().unwrap())
            .collect();
        assert_eq!(ips, ["10.0.0.5", "10.0.0.6", "10.0.0.7"]);

        // No compensation on the happy path.
        let ops = hv.ops();
        assert!(!ops.iter().any(|op| op.starts_with("stop") || op.starts_with("delete")));

        // The playbook ran against the generated artifact directory, which
        // holds the inventory and key; the credential was persisted.
        let dir = tmp.path().join("inventories").join("demo");
        assert_eq!(runner.dirs.lock().unwrap().as_slice(), &[dir.clone()]);
        assert!(dir.join("hosts.yaml").is_file());
        assert!(dir.join("ssh_key").is_file());
        assert_eq!(mgr.kubeconfig("demo").await.as_deref(), Some("apiVersion: v1\n"));
    }

    #[tokio::test]
    async fn failed_start_tears_down_every_cloned_node() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox {
            fail_start: Some(101),
            ..Default::default()
        });
        let mgr = manager(&tmp, hv.clone(), FakeRunner::succeeding(), "");

        let status = mgr.create_cluster(options()).await;

        assert_eq!(status.status, ClusterState::Failed);
        assert!(status.nodes.is_empty());
        assert!(status.error.unwrap().contains("start failed"));
        assert_eq!(
            hv.ops(),
            [
                "clone 100", "clone 101", "clone 102",
                "start 100", "start 101",
                "stop 100", "delete 100",
                "stop 101", "delete 101",
                "stop 102", "delete 102",
            ]
        );
    }

    #[tokio::test]
    async fn failed_clone_tears_down_only_confirmed_nodes() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox {
            fail_clone: Some(101),
            ..Default::default()
        });
        let mgr = manager(&tmp, hv.clone(), FakeRunner::succeeding(), "");

        let status = mgr.create_cluster(options()).await;

        assert_eq!(status.status, ClusterState::Failed);
        assert_eq!(
            hv.ops(),
            ["clone 100", "clone 101", "stop 100", "delete 100"]
        );
    }

    #[tokio::test]
    async fn playbook_failure_is_fatal_and_compensated() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox::default());
        let mgr = manager(&tmp, hv.clone(), FakeRunner::failing(), "");

        let status = mgr.create_cluster(options()).await;

        assert_eq!(status.status, ClusterState::Failed);
        let error = status.error.unwrap();
        assert!(error.contains("code 2"));
        assert!(error.contains("fatal: unreachable"));
        let ops = hv.ops();
        for vmid in [100, 101, 102] {
            assert!(ops.contains(&format!("stop {}", vmid)));
            assert!(ops.contains(&format!("delete {}", vmid)));
        }
    }

    #[tokio::test]
    async fn missing_kubeconfig_does_not_fail_creation() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox::default());
        // Empty remote output means "credential not there yet".
        let mgr = manager(&tmp, hv, FakeRunner::succeeding(), "");

        let status = mgr.create_cluster(options()).await;

        assert_eq!(status.status, ClusterState::Running);
        assert_eq!(mgr.kubeconfig("demo").await, None);
    }

    #[tokio::test]
    async fn colliding_name_is_rejected_before_any_clone() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox {
            existing: vec![vm(300, "demo-master-1", "running")],
            ..Default::default()
        });
        let mgr = manager(&tmp, hv.clone(), FakeRunner::succeeding(), "");

        let status = mgr.create_cluster(options()).await;

        assert_eq!(status.status, ClusterState::Failed);
        assert!(status.error.unwrap().contains("already exists"));
        assert!(hv.ops().is_empty());
    }

    #[tokio::test]
    async fn explicit_start_vmid_skips_the_free_id_query() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox::default());
        let mgr = manager(&tmp, hv.clone(), FakeRunner::succeeding(), "");

        let mut opts = options();
        opts.start_vmid = Some(200);
        let status = mgr.create_cluster(opts).await;

        assert_eq!(status.status, ClusterState::Running);
        let vmids: Vec<u32> = status.nodes.iter().map(|n| n.vmid).collect();
        assert_eq!(vmids, [200, 201, 202]);
        assert_eq!(*hv.next_free_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_cluster_rediscovers_members_by_name() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox {
            existing: vec![
                vm(100, "demo-master-1", "running"),
                vm(101, "demo-worker-1", "running"),
                vm(200, "other-master-1", "running"),
                vm(300, "plain-vm", "stopped"),
            ],
            ..Default::default()
        });
        let mgr = manager(&tmp, hv.clone(), FakeRunner::succeeding(), "");

        let deleted = mgr.delete_cluster("demo").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(
            hv.ops(),
            ["stop 100", "delete 100", "stop 101", "delete 101"]
        );

        let err = mgr.delete_cluster("nope").await.unwrap_err();
        assert!(matches!(err, Error::ClusterNotFound(_)));
    }

    #[tokio::test]
    async fn listing_groups_by_naming_convention() {
        let tmp = TempDir::new().unwrap();
        let hv = Arc::new(FakeProxmox {
            existing: vec![
                vm(101, "demo-worker-1", "stopped"),
                vm(100, "demo-master-1", "running"),
                vm(200, "lab-master-1", "running"),
                vm(300, "plain-vm", "running"),
            ],
            ..Default::default()
        });
        let mgr = manager(&tmp, hv, FakeRunner::succeeding(), "");

        let clusters = mgr.list_clusters().await.unwrap();
        assert_eq!(clusters.len(), 2);

        let demo = &clusters[0];
        assert_eq!(demo.name, "demo");
        assert_eq!(demo.master_count, 1);
        assert_eq!(demo.worker_count, 1);
        assert_eq!(demo.status, "partial");
        assert_eq!(demo.nodes[0].name, "demo-master-1");
        assert_eq!(demo.nodes[0].ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(demo.nodes[1].ip, None);

        let lab = &clusters[1];
        assert_eq!(lab.name, "lab");
        assert_eq!(lab.status, "running");
    }
}
