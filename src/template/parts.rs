//! Part templates
//!
//! Rendered with `trim_blocks` and `lstrip_blocks` enabled, so a line that
//! holds only block tags produces no output. Each part starts with a
//! newline and ends right after its close marker.

/// Shell script with the pre and post bootstrap commands
pub const SHELL_SCRIPT: &str = r#"
--{{ boundary }}
Content-Type: text/x-shellscript; charset="us-ascii"
MIME-Version: 1.0
Content-Transfer-Encoding: 7bit
Content-Disposition: attachment; filename="commands.sh"

#!/bin/bash
set -o errexit
set -o pipefail
set -o nounset
{% for command in pre_bootstrap_commands %}
{{ command }}
{% endfor %}
{% for command in post_bootstrap_commands %}
{{ command }}
{% endfor %}
--{{ boundary }}--"#;

/// nodeadm NodeConfig document
pub const NODE_CONFIG: &str = r#"
--{{ boundary }}
Content-Type: application/node.eks.aws

---
apiVersion: node.eks.aws/v1alpha1
kind: NodeConfig
spec:
  cluster:
    name: {{ cluster_name }}
    apiServerEndpoint: {{ api_server_endpoint }}
    certificateAuthority: {{ ca_cert }}
    cidr: {{ service_cidr }}
  kubelet:
    config:
      maxPods: {{ max_pods }}
      {% if cluster_dns %}
      clusterDNS:
      - {{ cluster_dns }}
      {% endif %}
    flags:
    - "--node-labels={{ node_labels }}"
    {% for flag in kubelet_flags %}
    - "--{{ flag.name }}={{ flag.value }}"
    {% endfor %}

--{{ boundary }}--"#;

/// cloud-config wrapper; runcmd sections are concatenated in a fixed order
pub const CLOUD_CONFIG: &str = r#"
--{{ boundary }}
Content-Type: text/cloud-config
MIME-Version: 1.0
Content-Transfer-Encoding: 7bit
Content-Disposition: attachment; filename="cloud-config.yaml"

#cloud-config
{% include "files" %}
runcmd:
{% include "ntp" %}
{% include "users" %}
{% include "disk_setup" %}
{% include "fs_setup" %}
{% include "mounts" %}
--{{ boundary }}--"#;

pub const FILES: &str = r#"{% if files %}
write_files:
{% for file in files %}
  - path: {{ file.path|yaml_str }}
{% if file.encoding %}
    encoding: {{ file.encoding|yaml_str }}
{% endif %}
{% if file.owner %}
    owner: {{ file.owner|yaml_str }}
{% endif %}
{% if file.permissions %}
    permissions: {{ file.permissions|yaml_str }}
{% endif %}
{% if file.append %}
    append: true
{% endif %}
    content: {{ file.content|yaml_str }}
{% endfor %}
{% else %}
write_files: []
{% endif %}
"#;

pub const NTP: &str = r#"{% if ntp and ntp.enabled != false %}
{% for server in ntp.servers %}
  - {{ ("echo " ~ ("server " ~ server ~ " iburst")|sh ~ " >> /etc/chrony.conf")|yaml_str }}
{% endfor %}
{% if ntp.servers %}
  - "systemctl restart chronyd"
{% endif %}
{% endif %}
"#;

pub const USERS: &str = r#"{% if users %}
{% for user in users %}
{% set useradd = "useradd --create-home" %}
{% if user.gecos %}{% set useradd = useradd ~ " --comment " ~ user.gecos|sh %}{% endif %}
{% if user.homeDir %}{% set useradd = useradd ~ " --home-dir " ~ user.homeDir|sh %}{% endif %}
{% if user.shell %}{% set useradd = useradd ~ " --shell " ~ user.shell|sh %}{% endif %}
{% if user.primaryGroup %}{% set useradd = useradd ~ " --gid " ~ user.primaryGroup|sh %}{% endif %}
{% if user.groups %}{% set useradd = useradd ~ " --groups " ~ user.groups|sh %}{% endif %}
  - {{ ("id " ~ user.name|sh ~ " >/dev/null 2>&1 || " ~ useradd ~ " " ~ user.name|sh)|yaml_str }}
{% if user.passwd %}
  - {{ ("echo " ~ (user.name ~ ":" ~ user.passwd)|sh ~ " | chpasswd -e")|yaml_str }}
{% endif %}
{% if user.lockPassword %}
  - {{ ("passwd -l " ~ user.name|sh)|yaml_str }}
{% endif %}
{% if user.sudo %}
{% set sudoers = ("/etc/sudoers.d/90-nodeadm-" ~ user.name)|sh %}
  - {{ ("echo " ~ (user.name ~ " " ~ user.sudo)|sh ~ " > " ~ sudoers ~ " && chmod 0440 " ~ sudoers)|yaml_str }}
{% endif %}
{% if user.sshAuthorizedKeys %}
{% if user.homeDir %}{% set ssh_dir = user.homeDir ~ "/.ssh" %}{% else %}{% set ssh_dir = "/home/" ~ user.name ~ "/.ssh" %}{% endif %}
  - {{ ("mkdir -p " ~ ssh_dir|sh ~ " && chmod 0700 " ~ ssh_dir|sh)|yaml_str }}
{% for key in user.sshAuthorizedKeys %}
  - {{ ("echo " ~ key|sh ~ " >> " ~ (ssh_dir ~ "/authorized_keys")|sh)|yaml_str }}
{% endfor %}
  - {{ ("chmod 0600 " ~ (ssh_dir ~ "/authorized_keys")|sh ~ " && chown -R " ~ user.name|sh ~ ": " ~ ssh_dir|sh)|yaml_str }}
{% endif %}
{% endfor %}
{% endif %}
"#;

pub const DISK_SETUP: &str = r#"{% if disk_setup %}
{% for partition in disk_setup.partitions %}
{% if partition.tableType %}{% set table = partition.tableType %}{% else %}{% set table = "gpt" %}{% endif %}
{% set parted = "parted --script " ~ partition.device|sh ~ " mklabel " ~ table|sh %}
{% if partition.layout %}{% set parted = parted ~ " mkpart primary 0% 100%" %}{% endif %}
{% if partition.overwrite %}
  - {{ parted|yaml_str }}
{% else %}
  - {{ ("blkid " ~ partition.device|sh ~ " || " ~ parted)|yaml_str }}
{% endif %}
{% endfor %}
{% endif %}
"#;

pub const FS_SETUP: &str = r#"{% if disk_setup %}
{% for fs in disk_setup.filesystems %}
{% set target = fs.device|partition_path(fs.partition) %}
{% set mkfs = "mkfs." ~ fs.filesystem %}
{% if fs.label %}{% set mkfs = mkfs ~ " -L " ~ fs.label|sh %}{% endif %}
{% if fs.extraOpts %}{% set mkfs = mkfs ~ " " ~ fs.extraOpts|join(" ") %}{% endif %}
{% set mkfs = mkfs ~ " " ~ target|sh %}
{% if fs.overwrite %}
  - {{ mkfs|yaml_str }}
{% else %}
  - {{ ("blkid -o value -s TYPE " ~ target|sh ~ " || " ~ mkfs)|yaml_str }}
{% endif %}
{% endfor %}
{% endif %}
"#;

pub const MOUNTS: &str = r#"{% if mounts %}
{% for mount in mounts if mount|length >= 2 %}
  - {{ ("mkdir -p " ~ mount[1]|sh)|yaml_str }}
  - {{ ("echo " ~ mount|fstab_entry|sh ~ " >> /etc/fstab")|yaml_str }}
{% endfor %}
  - "mount -a"
{% endif %}
"#;

/// All part templates as (name, source) pairs for registration
pub const ALL_TEMPLATES: &[(&str, &str)] = &[
    ("shell_script", SHELL_SCRIPT),
    ("node_config", NODE_CONFIG),
    ("cloud_config", CLOUD_CONFIG),
    ("files", FILES),
    ("ntp", NTP),
    ("users", USERS),
    ("disk_setup", DISK_SETUP),
    ("fs_setup", FS_SETUP),
    ("mounts", MOUNTS),
];
