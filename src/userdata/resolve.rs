//! Input validation and field defaulting
//!
//! Turns a caller supplied [`NodeConfig`] into a [`ResolvedNodeConfig`]
//! holding every value the part templates consume. The input is never
//! modified.

use super::labels::{NODE_LABELS_ARG, compose_node_labels};
use super::mime::DEFAULT_BOUNDARY;
use crate::config::{DiskSetup, File, MountPoints, NodeConfig, Ntp, User};
use crate::error::RequiredField;
use crate::UserDataError;
use serde::Serialize;
use tracing::debug;

/// Max pods when `use_max_pods` is set
pub const LARGE_MAX_PODS: i32 = 110;

/// Max pods otherwise
pub const DEFAULT_MAX_PODS: i32 = 58;

/// Service CIDR used when the caller does not provide one
pub const DEFAULT_SERVICE_CIDR: &str = "172.20.0.0/16";

/// A kubelet flag rendered as `--name=value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubeletFlag {
    pub name: String,
    pub value: String,
}

/// Fully validated and defaulted node config, the template context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNodeConfig {
    pub cluster_name: String,
    pub api_server_endpoint: String,
    pub ca_cert: String,
    pub node_group_name: String,
    pub service_cidr: String,
    pub max_pods: i32,
    pub cluster_dns: Option<String>,
    pub node_labels: String,
    /// Extra kubelet flags other than `node-labels`, sorted by name
    pub kubelet_flags: Vec<KubeletFlag>,
    pub boundary: String,
    pub container_runtime: Option<String>,
    pub pre_bootstrap_commands: Vec<String>,
    pub post_bootstrap_commands: Vec<String>,
    pub files: Vec<File>,
    pub ntp: Option<Ntp>,
    pub users: Option<Vec<User>>,
    pub disk_setup: Option<DiskSetup>,
    pub mounts: Option<Vec<MountPoints>>,
}

impl ResolvedNodeConfig {
    /// Whether the shell-script part is emitted
    pub fn has_bootstrap_commands(&self) -> bool {
        !self.pre_bootstrap_commands.is_empty() || !self.post_bootstrap_commands.is_empty()
    }

    /// Whether the cloud-config part is emitted
    pub fn has_cloud_config(&self) -> bool {
        self.ntp.is_some() || self.disk_setup.is_some() || self.mounts.is_some() || self.users.is_some()
    }
}

/// Check that every identity field is set
///
/// Fields are checked in a fixed order and the first missing one is
/// reported.
pub fn validate(config: &NodeConfig) -> Result<(), UserDataError> {
    let required = [
        (RequiredField::ApiServerEndpoint, &config.api_server_endpoint),
        (RequiredField::CaCert, &config.ca_cert),
        (RequiredField::ClusterName, &config.cluster_name),
        (RequiredField::NodeGroupName, &config.node_group_name),
    ];

    for (field, value) in required {
        if value.is_empty() {
            return Err(UserDataError::MissingRequiredField(field));
        }
    }
    Ok(())
}

/// Validate a node config and compute all derived values
pub fn resolve(config: &NodeConfig) -> Result<ResolvedNodeConfig, UserDataError> {
    validate(config)?;

    let max_pods = config.max_pods.unwrap_or(if config.use_max_pods == Some(true) {
        LARGE_MAX_PODS
    } else {
        DEFAULT_MAX_PODS
    });

    let service_cidr = config
        .service_cidr
        .clone()
        .filter(|cidr| !cidr.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVICE_CIDR.to_string());

    let cluster_dns = config
        .dns_cluster_ip
        .clone()
        .filter(|ip| !ip.is_empty());

    let boundary = config
        .boundary
        .clone()
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| DEFAULT_BOUNDARY.to_string());

    let node_labels = compose_node_labels(config);

    // BTreeMap iteration keeps the flags sorted by name
    let kubelet_flags = config
        .kubelet_extra_args
        .iter()
        .filter(|(name, _)| name.as_str() != NODE_LABELS_ARG)
        .map(|(name, value)| KubeletFlag {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();

    debug!(
        "nodeadm userdata generation - maxPods: {}, node-labels: {}",
        max_pods, node_labels
    );

    Ok(ResolvedNodeConfig {
        cluster_name: config.cluster_name.clone(),
        api_server_endpoint: config.api_server_endpoint.clone(),
        ca_cert: config.ca_cert.clone(),
        node_group_name: config.node_group_name.clone(),
        service_cidr,
        max_pods,
        cluster_dns,
        node_labels,
        kubelet_flags,
        boundary,
        container_runtime: config.container_runtime.clone(),
        pre_bootstrap_commands: config.pre_bootstrap_commands.clone(),
        post_bootstrap_commands: config.post_bootstrap_commands.clone(),
        files: config.files.clone(),
        ntp: config.ntp.clone(),
        users: config.users.clone(),
        disk_setup: config.disk_setup.clone(),
        mounts: config.mounts.clone(),
    })
}
