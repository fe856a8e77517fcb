pub mod check;
pub mod denied;
pub mod guard;
pub mod identity;
pub mod provider;
pub mod service;
pub mod validate;


pub use check::{CompositeCheck, PermissionCheck, ResourceId};
pub use denied::{AuthorizationDenied, MissingAuthorization};
pub use guard::AuthorizationGuard;
pub use identity::{AuthContext, Identity};
pub use provider::{DefaultAuthorizationProvider, IdentityKind, IdentityLink, LinkRole};
pub use service::{Authorizer, AuthzResult};
pub use validate::{IdentityRole, ReservedIdentifierUsed, ensure_not_wildcard};
