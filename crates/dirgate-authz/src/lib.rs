//! dirgate authz: the single write path for member roles and host
//! scopes, and the host-namespaced access check that reads them.

pub mod access;
pub mod assignment;
pub mod config;
pub mod error;

pub use access::AccessChecker;
pub use assignment::{AssignmentService, UpdateRolesInput};
pub use config::AuthzConfig;
pub use error::AuthzError;
