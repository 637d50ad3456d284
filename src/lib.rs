#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod selection;
pub mod splice;
pub mod writer;

pub use builder::{BundleReport, StandaloneDocsBuilder};
pub use config::{BundleConfig, ProjectLayout};
pub use encoding::TextEncoding;
pub use error::{BundleError, ErrorKind};
pub use selection::{IgnoredProjects, ProjectInclusion, ProjectMatch};
