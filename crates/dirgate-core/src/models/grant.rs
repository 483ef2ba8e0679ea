//! Combined role and host-scope state of a member.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::role::RoleName;

/// A member's roles and `HOST` scope values, read from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGrants {
    pub roles: BTreeSet<RoleName>,
    pub hosts: BTreeSet<String>,
}

/// A validated change to apply atomically.
///
/// `None` leaves that dimension untouched; `Some` with an empty set clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantChange {
    pub roles: Option<BTreeSet<RoleName>>,
    pub hosts: Option<BTreeSet<String>>,
}

impl GrantChange {
    pub fn is_empty(&self) -> bool {
        self.roles.is_none() && self.hosts.is_none()
    }
}
