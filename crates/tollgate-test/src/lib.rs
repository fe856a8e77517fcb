//! Tollgate authorization engine - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `tollgate_test::component::` paths.

pub mod component {
    pub use tollgate_core::{config, constants, error as core_error, permission, types};
    pub use tollgate_service::{auth, error, task};

    pub mod db {
        pub use tollgate_db::db::*;
        pub use tollgate_db::query::AuthorizationQuery;
        pub use tollgate_db::store::{AuthorizationStore, MemoryAuthorizationStore, PgAuthorizationStore};
    }

    pub mod model {
        pub use tollgate_db::model::*;
    }
}
