//! Authorization record storage.
//!
//! [`store::AuthorizationStore`] is the seam the service layer talks to; it is
//! implemented in memory and on `PostgreSQL`.

pub mod db;
pub mod error;
pub mod model;
pub mod query;
pub mod store;
