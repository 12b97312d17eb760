//! Node configuration parsing and types
//!
//! Handles the node configuration document a caller supplies to describe
//! the worker node whose user data should be rendered.

pub mod loader;
pub mod provisioning;

pub use loader::load_node_config;
pub use provisioning::{DiskSetup, File, Filesystem, MountPoints, Ntp, Partition, User};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Input describing a single worker node bootstrap
///
/// Constructed fresh for every bootstrap event. The four identity fields
/// (`cluster_name`, `api_server_endpoint`, `ca_cert`, `node_group_name`)
/// are mandatory; everything else is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    /// Name of the cluster the node joins
    pub cluster_name: String,

    /// Kubernetes API server endpoint
    pub api_server_endpoint: String,

    /// Base64 encoded cluster CA certificate
    pub ca_cert: String,

    /// Managed node group the node belongs to
    pub node_group_name: String,

    /// Extra kubelet flags, keyed by flag name without the leading `--`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub kubelet_extra_args: BTreeMap<String, String>,

    /// Cluster DNS service IP
    #[serde(rename = "dnsClusterIP", skip_serializing_if = "Option::is_none")]
    pub dns_cluster_ip: Option<String>,

    /// Select the large max-pods default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_max_pods: Option<bool>,

    /// Explicit max-pods value, overrides `use_max_pods`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pods: Option<i32>,

    /// Service CIDR range for the cluster
    #[serde(rename = "serviceCIDR", skip_serializing_if = "Option::is_none")]
    pub service_cidr: Option<String>,

    /// Container runtime choice (not consumed by nodeadm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_runtime: Option<String>,

    /// Commands run before the node agent bootstraps
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pre_bootstrap_commands: Vec<String>,

    /// Commands run after the node agent bootstraps
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_bootstrap_commands: Vec<String>,

    /// Files to write
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,

    /// Disk partition and filesystem layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_setup: Option<DiskSetup>,

    /// fstab style mount entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Vec<MountPoints>>,

    /// User accounts to create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,

    /// NTP configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp: Option<Ntp>,

    /// AMI the node was launched from
    #[serde(rename = "amiImageID", skip_serializing_if = "Option::is_none")]
    pub ami_image_id: Option<String>,

    /// Pricing model of the instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_type: Option<CapacityType>,

    /// MIME boundary marker, defaults to `//`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

impl NodeConfig {
    /// Create a config holding only the required identity fields
    pub fn new(
        cluster_name: impl Into<String>,
        api_server_endpoint: impl Into<String>,
        ca_cert: impl Into<String>,
        node_group_name: impl Into<String>,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            api_server_endpoint: api_server_endpoint.into(),
            ca_cert: ca_cert.into(),
            node_group_name: node_group_name.into(),
            ..Default::default()
        }
    }

    /// Parse a node config from YAML (JSON is accepted as well)
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Whether the shell-script part has anything to run
    pub fn has_bootstrap_commands(&self) -> bool {
        !self.pre_bootstrap_commands.is_empty() || !self.post_bootstrap_commands.is_empty()
    }

    /// Whether the cloud-config part is emitted
    ///
    /// Files alone do not trigger the part; they are only written when one
    /// of the other provisioning sections is present.
    pub fn has_cloud_config(&self) -> bool {
        self.ntp.is_some() || self.disk_setup.is_some() || self.mounts.is_some() || self.users.is_some()
    }
}

/// Capacity type of the underlying instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CapacityType {
    OnDemand,
    Spot,
    /// Any other value, passed through as given
    Other(String),
}

impl CapacityType {
    /// Value used in the `capacityType` node label
    pub fn label_value(&self) -> String {
        match self {
            Self::OnDemand => "ON_DEMAND".to_string(),
            Self::Spot => "SPOT".to_string(),
            Self::Other(raw) => raw.to_uppercase(),
        }
    }
}

impl From<&str> for CapacityType {
    fn from(s: &str) -> Self {
        match s {
            "onDemand" => Self::OnDemand,
            "spot" => Self::Spot,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CapacityType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<CapacityType> for String {
    fn from(ct: CapacityType) -> Self {
        ct.to_string()
    }
}

impl fmt::Display for CapacityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnDemand => write!(f, "onDemand"),
            Self::Spot => write!(f, "spot"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}
