//! Node label composition
//!
//! Merges the caller's `node-labels` kubelet argument with the labels the
//! managed node group controller expects on every node.

use crate::config::NodeConfig;

/// Kubelet extra arg that carries caller node labels
pub const NODE_LABELS_ARG: &str = "node-labels";

const NODE_LABEL_IMAGE: &str = "eks.amazonaws.com/nodegroup-image";
const NODE_LABEL_NODE_GROUP: &str = "eks.amazonaws.com/nodegroup";
const NODE_LABEL_CAPACITY_TYPE: &str = "eks.amazonaws.com/capacityType";

/// Compose the final `--node-labels` value
///
/// Caller labels always come first. The image label is skipped if the
/// caller already set it. The node group label is skipped under the same
/// condition, i.e. when the *image* label is present, not when the node
/// group label is. The capacity type label is always appended.
pub fn compose_node_labels(config: &NodeConfig) -> String {
    let base = config
        .kubelet_extra_args
        .get(NODE_LABELS_ARG)
        .map(String::as_str)
        .unwrap_or_default();

    let image_key = format!("{}=", NODE_LABEL_IMAGE);
    let has_image_label = base.contains(&image_key);

    let mut system_labels = Vec::with_capacity(3);

    let ami = config.ami_image_id.as_deref().filter(|ami| !ami.is_empty());
    if let Some(ami) = ami.filter(|_| !has_image_label) {
        system_labels.push(format!("{}={}", NODE_LABEL_IMAGE, ami));
    }

    if !config.node_group_name.is_empty() && !has_image_label {
        system_labels.push(format!(
            "{}={}",
            NODE_LABEL_NODE_GROUP, config.node_group_name
        ));
    }

    let capacity_type = config
        .capacity_type
        .as_ref()
        .map(|ct| ct.label_value())
        .unwrap_or_else(|| "ON_DEMAND".to_string());
    system_labels.push(format!("{}={}", NODE_LABEL_CAPACITY_TYPE, capacity_type));

    let joined = system_labels.join(",");
    if base.is_empty() {
        joined
    } else {
        format!("{},{}", base, joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CapacityType;

    fn test_config() -> NodeConfig {
        NodeConfig::new(
            "test-cluster",
            "https://example.com",
            "test-ca-cert",
            "test-nodegroup",
        )
    }

    #[test]
    fn test_system_labels_only() {
        let labels = compose_node_labels(&test_config());
        assert_eq!(
            labels,
            "eks.amazonaws.com/nodegroup=test-nodegroup,eks.amazonaws.com/capacityType=ON_DEMAND"
        );
    }

    #[test]
    fn test_caller_labels_come_first() {
        let mut config = test_config();
        config.kubelet_extra_args.insert(
            NODE_LABELS_ARG.to_string(),
            "app=my-app,environment=production".to_string(),
        );

        let labels = compose_node_labels(&config);
        assert!(labels.starts_with(
            "app=my-app,environment=production,eks.amazonaws.com/nodegroup=test-nodegroup"
        ));
        assert!(labels.ends_with("eks.amazonaws.com/capacityType=ON_DEMAND"));
    }

    #[test]
    fn test_image_label() {
        let mut config = test_config();
        config.ami_image_id = Some("ami-123456".to_string());

        let labels = compose_node_labels(&config);
        assert_eq!(
            labels,
            "eks.amazonaws.com/nodegroup-image=ami-123456,\
             eks.amazonaws.com/nodegroup=test-nodegroup,\
             eks.amazonaws.com/capacityType=ON_DEMAND"
        );
    }

    #[test]
    fn test_empty_ami_is_ignored() {
        let mut config = test_config();
        config.ami_image_id = Some(String::new());

        assert!(!compose_node_labels(&config).contains("nodegroup-image"));
    }

    #[test]
    fn test_image_label_not_duplicated() {
        let mut config = test_config();
        config.ami_image_id = Some("ami-123456".to_string());
        config.kubelet_extra_args.insert(
            NODE_LABELS_ARG.to_string(),
            "eks.amazonaws.com/nodegroup-image=ami-custom".to_string(),
        );

        let labels = compose_node_labels(&config);
        assert_eq!(labels.matches("nodegroup-image=").count(), 1);
        assert!(labels.contains("nodegroup-image=ami-custom"));
    }

    /// The node group label is guarded by the image label check. A caller
    /// supplied image label therefore also suppresses the node group label,
    /// while a caller supplied node group label does not.
    #[test]
    fn test_nodegroup_label_guarded_by_image_label() {
        let mut config = test_config();
        config.kubelet_extra_args.insert(
            NODE_LABELS_ARG.to_string(),
            "eks.amazonaws.com/nodegroup-image=ami-custom".to_string(),
        );
        assert!(!compose_node_labels(&config).contains("eks.amazonaws.com/nodegroup=test-nodegroup"));

        config.kubelet_extra_args.insert(
            NODE_LABELS_ARG.to_string(),
            "eks.amazonaws.com/nodegroup=custom".to_string(),
        );
        let labels = compose_node_labels(&config);
        assert!(labels.contains("eks.amazonaws.com/nodegroup=custom"));
        assert!(labels.contains("eks.amazonaws.com/nodegroup=test-nodegroup"));
    }

    #[test]
    fn test_capacity_types() {
        let mut config = test_config();

        config.capacity_type = Some(CapacityType::Spot);
        assert!(compose_node_labels(&config).ends_with("capacityType=SPOT"));

        config.capacity_type = Some(CapacityType::OnDemand);
        assert!(compose_node_labels(&config).ends_with("capacityType=ON_DEMAND"));

        config.capacity_type = Some(CapacityType::from("capacityBlock"));
        assert!(compose_node_labels(&config).ends_with("capacityType=CAPACITYBLOCK"));
    }
}
