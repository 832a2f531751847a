//! Flows module - Pipeline stages that combine the backends
//!
//! Provides:
//! - order: Resolve scanned files into weight order
//! - assemble: Concatenate in order and write the output

pub mod assemble;
pub mod order;
