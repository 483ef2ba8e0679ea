//! Authorization configuration.

/// Configuration for the assignment service and access checker.
#[derive(Debug, Clone)]
pub struct AuthzConfig {
    /// Treat a literal `*` host scope as matching every host
    /// (default: true).
    pub honor_wildcard_host: bool,
    /// Accept `*` as a host value on updates (default: true). When off,
    /// a wildcard in an update is rejected as an invalid host.
    pub allow_wildcard_assignment: bool,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            honor_wildcard_host: true,
            allow_wildcard_assignment: true,
        }
    }
}
