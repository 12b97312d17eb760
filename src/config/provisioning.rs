//! Provisioning types rendered into the cloud-config part
//!
//! These mirror the cluster API bootstrap types for files, NTP, users,
//! disks and mounts. Their contents are opaque to the renderer.

use serde::{Deserialize, Serialize};

/// File to write on the node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct File {
    pub path: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    /// cloud-init encoding, e.g. `base64` or `gzip+base64`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
}

/// NTP configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ntp {
    pub servers: Vec<String>,
    /// Absent means enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// User account to create
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gecos: Option<String>,
    /// Comma separated supplementary groups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    /// Pre-hashed password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_password: Option<bool>,
    /// sudoers rule, e.g. `ALL=(ALL) NOPASSWD:ALL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sudo: Option<String>,
    pub ssh_authorized_keys: Vec<String>,
}

/// Disk partitioning and filesystem creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiskSetup {
    pub partitions: Vec<Partition>,
    pub filesystems: Vec<Filesystem>,
}

/// Partition table for a single device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Partition {
    pub device: String,
    /// Create a single partition spanning the device
    pub layout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    /// `gpt` (default) or `msdos`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
}

/// Filesystem to create on a device or partition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filesystem {
    pub device: String,
    pub filesystem: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    pub extra_opts: Vec<String>,
}

/// fstab fields: device, mount point, type, options, dump, pass
pub type MountPoints = Vec<String>;
