use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use kubeforge::cluster::ClusterManager;
use kubeforge::config::Config;
use kubeforge::model::{ClusterOptions, ClusterState, DEFAULT_SSH_USER};
use kubeforge::playbook::AnsibleRunner;
use kubeforge::proxmox::ProxmoxClient;
use kubeforge::remote::SshExecutor;

#[derive(Parser)]
#[command(name = "kubeforge")]
#[command(about = "Provision Kubernetes clusters on Proxmox VE", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a cluster by cloning a VM template
    Create {
        /// Cluster name; node VMs become {name}-master-N / {name}-worker-N
        #[arg(long)]
        name: String,

        /// vmid of the cloud-init template to clone
        #[arg(long)]
        template_vmid: u32,

        #[arg(long, default_value_t = 1)]
        masters: usize,

        #[arg(long, default_value_t = 0)]
        workers: usize,

        /// Path to the SSH private key matching the template's authorized key
        #[arg(long)]
        ssh_key: PathBuf,

        #[arg(long, default_value = DEFAULT_SSH_USER)]
        ssh_user: String,

        /// First vmid to assign instead of the hypervisor's next free one
        #[arg(long)]
        start_vmid: Option<u32>,
    },
    /// Tear down every node of a cluster
    Delete { name: String },
    /// List clusters discovered from VM names
    List,
    /// Print the stored kubeconfig of a cluster
    Kubeconfig { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "kubeforge=info")
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let manager = ClusterManager::new(
        Arc::new(ProxmoxClient::new(&config.proxmox)?),
        Arc::new(AnsibleRunner::new(config.kubespray.path.clone())),
        Arc::new(SshExecutor),
        config.kubespray.clone(),
    );

    match cli.command {
        Commands::Create {
            name,
            template_vmid,
            masters,
            workers,
            ssh_key,
            ssh_user,
            start_vmid,
        } => {
            let ssh_private_key = tokio::fs::read_to_string(&ssh_key)
                .await
                .with_context(|| format!("reading ssh key {}", ssh_key.display()))?;
            let status = manager
                .create_cluster(ClusterOptions {
                    name,
                    template_vmid,
                    master_count: masters,
                    worker_count: workers,
                    ssh_private_key,
                    ssh_user,
                    start_vmid,
                })
                .await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            if status.status == ClusterState::Failed {
                std::process::exit(1);
            }
        }
        Commands::Delete { name } => {
            let deleted = manager.delete_cluster(&name).await?;
            println!("deleted {} nodes", deleted);
        }
        Commands::List => {
            let clusters = manager.list_clusters().await?;
            println!("{}", serde_json::to_string_pretty(&clusters)?);
        }
        Commands::Kubeconfig { name } => match manager.kubeconfig(&name).await {
            Some(content) => print!("{}", content),
            None => anyhow::bail!("no kubeconfig stored for cluster {}", name),
        },
    }
    Ok(())
}
