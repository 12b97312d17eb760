//! nodeadm-userdata library
//!
//! Renders the boot-time user data a cloud instance consumes when it joins
//! a managed Kubernetes cluster as a worker node through nodeadm.
//!
//! # Design Principles
//!
//! - **Safety First**: No unsafe code (`#![forbid(unsafe_code)]`)
//! - **Fail Fast**: Required identity fields are validated before rendering
//! - **Reproducible**: Same input, byte-identical output
//! - **No Shared State**: Each render builds its own template environment

pub mod config;
pub mod template;
pub mod userdata;

mod error;

pub use config::NodeConfig;
pub use error::{RequiredField, UserDataError};
pub use userdata::{ResolvedNodeConfig, render};
