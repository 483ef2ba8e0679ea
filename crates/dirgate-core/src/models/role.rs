//! Role registry.
//!
//! The set of administrative roles is closed and fixed at compile time.
//! Every persisted role assignment must name one of these variants, and
//! callers reject anything else with [`DirgateError::UnknownRole`] before
//! touching storage.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirgateError;

/// Administrative role names as they appear on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleName {
    #[serde(rename = "DEMO_DAY_ADMIN")]
    DemoDayAdmin,
    #[serde(rename = "DIRECTORYADMIN")]
    DirectoryAdmin,
}

/// An administrative action a role grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    ManageDemoDays,
    ManageDemoDayParticipants,
    ManageMembers,
    ManageTeams,
    ManageProjects,
    ManageFocusAreas,
}

impl RoleName {
    pub const ALL: [RoleName; 2] = [RoleName::DemoDayAdmin, RoleName::DirectoryAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::DemoDayAdmin => "DEMO_DAY_ADMIN",
            RoleName::DirectoryAdmin => "DIRECTORYADMIN",
        }
    }

    /// Capabilities granted by this role.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        let caps: &[Capability] = match self {
            RoleName::DemoDayAdmin => &[
                Capability::ManageDemoDays,
                Capability::ManageDemoDayParticipants,
            ],
            RoleName::DirectoryAdmin => &[
                Capability::ManageMembers,
                Capability::ManageTeams,
                Capability::ManageProjects,
                Capability::ManageFocusAreas,
            ],
        };
        caps.iter().copied().collect()
    }

    /// Whether holding this role is only meaningful together with a
    /// matching `HOST` scope entry.
    pub fn requires_host_scope(&self) -> bool {
        matches!(self, RoleName::DemoDayAdmin)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = DirgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DirgateError::UnknownRole { name: s.to_string() })
    }
}

/// Returns `true` if `name` is a registered role.
pub fn is_valid_role(name: &str) -> bool {
    name.parse::<RoleName>().is_ok()
}

/// Capabilities granted by the role called `name`.
pub fn capabilities_of(name: &str) -> Result<BTreeSet<Capability>, DirgateError> {
    Ok(name.parse::<RoleName>()?.capabilities())
}

/// Parse a list of raw role names, failing on the first unknown one.
///
/// Duplicates collapse into a single entry.
pub fn parse_roles<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<RoleName>, DirgateError> {
    names.iter().map(|n| n.as_ref().parse::<RoleName>()).collect()
}
