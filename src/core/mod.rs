//! Core module - Shared data structures and utilities
//!
//! This module provides:
//! - Pipeline configuration and policies
//! - Typed pipeline errors
//! - Data model (weights, manifest, result items)
//! - Rendering functions for different output formats
//! - Path normalization utilities

pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
