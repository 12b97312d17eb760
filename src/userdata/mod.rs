//! nodeadm user-data generation
//!
//! Turns a [`NodeConfig`] into a multipart MIME document:
//! - Envelope header (always)
//! - Shell script part (when bootstrap commands are set)
//! - nodeadm NodeConfig part (always)
//! - Cloud-config part (when NTP, users, disks or mounts are set)

pub mod encoding;
pub mod labels;
pub mod mime;
pub mod output;
pub mod resolve;
pub mod types;

pub use encoding::{Encoding, encode};
pub use labels::compose_node_labels;
pub use mime::{DEFAULT_BOUNDARY, MimePart, parse_multipart};
pub use output::{write_to, write_user_data};
pub use resolve::{KubeletFlag, ResolvedNodeConfig, resolve, validate};
pub use types::ContentType;

use crate::UserDataError;
use crate::config::NodeConfig;
use crate::template::{Part, PartRenderer};
use tracing::{debug, info};

/// Render the user data for a node
///
/// Validation runs before anything is rendered. Any failure aborts the
/// whole render; no partial document is returned.
pub fn render(config: &NodeConfig) -> Result<Vec<u8>, UserDataError> {
    let resolved = resolve(config)?;
    compose(&resolved)
}

/// Assemble the document from an already resolved config
pub fn compose(config: &ResolvedNodeConfig) -> Result<Vec<u8>, UserDataError> {
    let renderer = PartRenderer::new()?;
    let mut document = String::new();

    mime::write_envelope_header(&mut document, &config.boundary);

    if config.has_bootstrap_commands() {
        document.push_str(&renderer.render(Part::ShellScript, config)?);
        document.push('\n');
    }

    document.push_str(&renderer.render(Part::NodeConfig, config)?);

    if config.has_cloud_config() {
        document.push_str(&renderer.render(Part::CloudConfig, config)?);
    } else {
        debug!("No cloud-config sections set, skipping cloud-config part");
    }

    info!(
        "Rendered {} bytes of user data for node group '{}'",
        document.len(),
        config.node_group_name
    );
    Ok(document.into_bytes())
}
