use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("missing configuration: {0}")]
    Config(String),

    #[error("task {upid} did not stop within {budget_secs}s")]
    TaskTimeout { upid: String, budget_secs: u64 },

    #[error("task {upid} failed: {exitstatus}")]
    TaskFailed { upid: String, exitstatus: String },

    #[error("vm {vmid} reported no usable address within {budget_secs}s")]
    IpDiscoveryTimeout { vmid: u32, budget_secs: u64 },

    #[error("configuration run exited with code {code}: {stderr}")]
    ConfigurationRunFailed { code: i32, stderr: String },

    #[error("configuration run did not finish within {budget_secs}s")]
    ConfigurationRunTimeout { budget_secs: u64 },

    #[error("cluster {0} not found")]
    ClusterNotFound(String),

    #[error("hypervisor api error: {0}")]
    Api(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
