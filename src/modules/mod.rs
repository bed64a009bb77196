//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for external services. Currently S3-compatible object
//! storage for report media.

pub mod storage;
