//! Jinja2-compatible part rendering
//!
//! Renders the MIME parts of a nodeadm user-data document from the
//! templates in [`parts`]. Every render builds its own environment, so no
//! template state is shared between calls.

pub mod parts;

use crate::UserDataError;
use crate::userdata::ResolvedNodeConfig;
use minijinja::{Environment, Error, ErrorKind};
use tracing::debug;

/// A MIME part produced by a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    ShellScript,
    NodeConfig,
    CloudConfig,
}

impl Part {
    /// Name of the template that renders this part
    pub fn template_name(&self) -> &'static str {
        match self {
            Part::ShellScript => "shell_script",
            Part::NodeConfig => "node_config",
            Part::CloudConfig => "cloud_config",
        }
    }
}

/// Renders parts from a freshly built template environment
pub struct PartRenderer {
    env: Environment<'static>,
}

impl PartRenderer {
    /// Create a renderer with every part template registered
    pub fn new() -> Result<Self, UserDataError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_filter("sh", shell_quote);
        env.add_filter("yaml_str", yaml_string);
        env.add_filter("partition_path", partition_path);
        env.add_filter("fstab_entry", fstab_entry);

        for &(name, source) in parts::ALL_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| UserDataError::template(name, e))?;
        }

        Ok(Self { env })
    }

    /// Render a single part against the resolved node config
    pub fn render(
        &self,
        part: Part,
        config: &ResolvedNodeConfig,
    ) -> Result<String, UserDataError> {
        let name = part.template_name();
        debug!("Rendering {} part", name);

        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| UserDataError::template(name, e))?;

        tmpl.render(config)
            .map_err(|e| UserDataError::template(name, e))
    }
}

/// Quote a value as a single shell word
pub fn shell_quote(value: String) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render a value as a double-quoted YAML scalar
fn yaml_string(value: String) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, "cannot quote value for YAML").with_source(e)
    })
}

/// Device path of a numbered partition
///
/// `auto`, `any` and `none` mean the filesystem goes on the whole device.
/// Devices whose name ends in a digit (`/dev/nvme1n1`) take a `p` separator.
pub fn partition_path(device: String, partition: Option<String>) -> String {
    match partition.as_deref() {
        None | Some("") | Some("auto") | Some("any") | Some("none") => device,
        Some(number) if device.ends_with(|c: char| c.is_ascii_digit()) => {
            format!("{}p{}", device, number)
        }
        Some(number) => format!("{}{}", device, number),
    }
}

/// Complete an fstab entry with the cloud-init mount defaults
pub fn fstab_entry(fields: Vec<String>) -> String {
    const DEFAULTS: [&str; 6] = ["", "", "auto", "defaults,nofail", "0", "2"];

    DEFAULTS
        .iter()
        .enumerate()
        .map(|(i, default)| match fields.get(i) {
            Some(field) if !field.is_empty() => field.as_str(),
            _ => *default,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::userdata::resolve;

    fn resolved() -> ResolvedNodeConfig {
        resolve(&NodeConfig::new(
            "test-cluster",
            "https://example.com",
            "test-ca-cert",
            "test-nodegroup",
        ))
        .unwrap()
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("plain".to_string()), "'plain'");
        assert_eq!(shell_quote("it's".to_string()), r"'it'\''s'");
    }

    #[test]
    fn test_yaml_string() {
        assert_eq!(yaml_string("echo hi".to_string()).unwrap(), "\"echo hi\"");
        assert_eq!(
            yaml_string("say \"hi\"\n".to_string()).unwrap(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn test_partition_path() {
        assert_eq!(partition_path("/dev/xvdb".to_string(), None), "/dev/xvdb");
        assert_eq!(
            partition_path("/dev/xvdb".to_string(), Some("auto".to_string())),
            "/dev/xvdb"
        );
        assert_eq!(
            partition_path("/dev/xvdb".to_string(), Some("1".to_string())),
            "/dev/xvdb1"
        );
        assert_eq!(
            partition_path("/dev/nvme1n1".to_string(), Some("2".to_string())),
            "/dev/nvme1n1p2"
        );
    }

    #[test]
    fn test_fstab_entry_defaults() {
        assert_eq!(
            fstab_entry(vec!["/dev/xvdb1".to_string(), "/data".to_string()]),
            "/dev/xvdb1 /data auto defaults,nofail 0 2"
        );
        assert_eq!(
            fstab_entry(vec![
                "LABEL=logs".to_string(),
                "/var/log".to_string(),
                "xfs".to_string(),
                "noatime".to_string(),
            ]),
            "LABEL=logs /var/log xfs noatime 0 2"
        );
    }

    #[test]
    fn test_all_templates_parse() {
        assert!(PartRenderer::new().is_ok());
    }

    #[test]
    fn test_render_node_config_part() {
        let renderer = PartRenderer::new().unwrap();
        let part = renderer.render(Part::NodeConfig, &resolved()).unwrap();

        assert!(part.starts_with("\n--//\nContent-Type: application/node.eks.aws\n"));
        assert!(part.contains("    name: test-cluster\n"));
        assert!(part.contains("      maxPods: 58\n    flags:\n"));
        assert!(!part.contains("clusterDNS"));
        assert!(part.ends_with("\n\n--//--"));
    }

    #[test]
    fn test_render_shell_script_part() {
        let mut config = resolved();
        config.pre_bootstrap_commands = vec!["echo pre".to_string()];
        config.post_bootstrap_commands = vec!["echo post".to_string()];

        let renderer = PartRenderer::new().unwrap();
        let part = renderer.render(Part::ShellScript, &config).unwrap();
        assert!(part.ends_with("set -o nounset\necho pre\necho post\n--//--"));
    }
}
