//! Backends module - Filesystem access
//!
//! Provides:
//! - scan: Recursive file listing with walkdir
//! - frontmatter: Header block detection and YAML decoding

pub mod frontmatter;
pub mod scan;
