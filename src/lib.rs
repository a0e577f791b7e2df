//! Patina - synthetic weathering for training images
//!
//! Host layer around the aug-engine crate: CLI, job configuration, and the
//! parallel batch driver. This library exposes modules for integration
//! testing.

pub mod error;
pub mod models;
pub mod services;
