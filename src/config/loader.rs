//! Node config loader
//!
//! Loads node configs from YAML or JSON files on disk.

use super::NodeConfig;
use crate::UserDataError;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Load a node config from a single file
pub async fn load_node_config(path: impl AsRef<Path>) -> Result<NodeConfig, UserDataError> {
    let path = path.as_ref();
    debug!("Reading node config from {}", path.display());

    let content = fs::read_to_string(path).await?;
    let config = parse_node_config(&content)?;

    info!(
        "Loaded node config for cluster '{}' node group '{}'",
        config.cluster_name, config.node_group_name
    );
    Ok(config)
}

/// Parse a node config, rejecting empty documents
pub fn parse_node_config(content: &str) -> Result<NodeConfig, UserDataError> {
    if content.trim().is_empty() {
        return Err(UserDataError::InvalidData(
            "node config document is empty".to_string(),
        ));
    }
    Ok(NodeConfig::from_yaml(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_node_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("node.yaml");

        fs::write(
            &path,
            "clusterName: test\napiServerEndpoint: https://example.com\ncaCert: ca\nnodeGroupName: ng\n",
        )
        .await
        .unwrap();

        let config = load_node_config(&path).await.unwrap();
        assert_eq!(config.cluster_name, "test");
        assert_eq!(config.node_group_name, "ng");
    }

    #[tokio::test]
    async fn test_load_node_config_not_exists() {
        let result = load_node_config("/nonexistent/node.yaml").await;
        assert!(matches!(result, Err(UserDataError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_node_config_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("node.yaml");
        fs::write(&path, "clusterName: [unterminated").await.unwrap();

        let result = load_node_config(&path).await;
        assert!(matches!(result, Err(UserDataError::Yaml(_))));
    }

    #[test]
    fn test_parse_empty_document() {
        let result = parse_node_config("  \n");
        assert!(matches!(result, Err(UserDataError::InvalidData(_))));
    }
}
