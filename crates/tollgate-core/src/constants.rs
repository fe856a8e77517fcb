/// Wildcard identifier. As a resource id it means "every resource of the type";
/// as a user or group id it means "every identity".
pub const ANY: &str = "*";

/// Tail of every message rejecting [`ANY`] as a concrete identity.
pub const RESERVED_IDENTIFIER_DETAIL: &str =
    const_str::concat!("id cannot be ", ANY, ". ", ANY, " is a reserved identifier.");

/// Permission name granted to newly linked identities unless configured otherwise.
pub const DEFAULT_TASK_PERMISSION: &str = "TASK_WORK";

/// Returns `true` if `id` is the wildcard identifier.
#[must_use]
pub fn is_any(id: &str) -> bool {
    id == ANY
}
