//! Error types for nodeadm-userdata

use std::fmt;
use thiserror::Error;

/// Identity fields that must be set before any user data is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    ApiServerEndpoint,
    CaCert,
    ClusterName,
    NodeGroupName,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::ApiServerEndpoint => write!(f, "API server endpoint"),
            RequiredField::CaCert => write!(f, "CA certificate"),
            RequiredField::ClusterName => write!(f, "cluster name"),
            RequiredField::NodeGroupName => write!(f, "node group name"),
        }
    }
}

/// Main error type for nodeadm-userdata operations
#[derive(Error, Debug)]
pub enum UserDataError {
    #[error("{0} is required for nodeadm")]
    MissingRequiredField(RequiredField),

    #[error("failed to render {part} template: {source}")]
    TemplateRendering {
        part: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl UserDataError {
    /// Create a template rendering error for the named part
    pub fn template(part: &'static str, source: minijinja::Error) -> Self {
        Self::TemplateRendering { part, source }
    }
}
