//! Tollgate core: the permission model, resource types and configuration
//! shared by the storage and service crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod permission;
pub mod types;
