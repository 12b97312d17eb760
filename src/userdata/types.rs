//! MIME part content types
//!
//! The part kinds a nodeadm user-data document is made of.

use std::fmt;

/// Content types emitted into nodeadm user data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Shell script with pre/post bootstrap commands
    Script,
    /// nodeadm NodeConfig document
    NodeConfig,
    /// Cloud-config YAML (#cloud-config)
    CloudConfig,
    /// MIME multipart envelope
    Multipart,
    /// Anything else
    Unknown,
}

impl ContentType {
    /// Get the MIME type string for this content type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Script => "text/x-shellscript",
            Self::NodeConfig => "application/node.eks.aws",
            Self::CloudConfig => "text/cloud-config",
            Self::Multipart => "multipart/mixed",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Parse content type from MIME type string
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_lowercase();
        let mime = mime.split(';').next().unwrap_or(&mime).trim();

        match mime {
            "text/x-shellscript" | "text/x-sh" => Self::Script,
            "application/node.eks.aws" => Self::NodeConfig,
            "text/cloud-config" | "text/x-cloud-config" => Self::CloudConfig,
            s if s.starts_with("multipart/") => Self::Multipart,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}
