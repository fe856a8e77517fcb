//! Authorization decisions and default authorization provisioning for tasks.

pub mod auth;
pub mod error;
pub mod task;
