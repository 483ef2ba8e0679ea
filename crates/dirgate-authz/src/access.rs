//! Host-namespaced access checks.
//!
//! Every check answers with a plain `bool`. A missing member, missing
//! scopes, an unknown demo day and storage failures all read as "not
//! authorized", so callers cannot tell a non-existent member from an
//! unauthorized one.

use std::collections::BTreeSet;

use dirgate_core::models::role::{Capability, RoleName};
use dirgate_core::models::scope::WILDCARD_HOST;
use dirgate_core::repository::{DemoDayRepository, GrantRepository};
use tracing::{debug, warn};

use crate::config::AuthzConfig;

/// Read-only authorization checks over persisted roles and scopes.
pub struct AccessChecker<G: GrantRepository, D: DemoDayRepository> {
    grant_repo: G,
    demo_day_repo: D,
    config: AuthzConfig,
}

impl<G: GrantRepository, D: DemoDayRepository> AccessChecker<G, D> {
    pub fn new(grant_repo: G, demo_day_repo: D, config: AuthzConfig) -> Self {
        Self {
            grant_repo,
            demo_day_repo,
            config,
        }
    }

    /// Whether `member_uid` holds `required_role` and a `HOST` scope
    /// matching `target_host`.
    pub async fn can_administer(
        &self,
        member_uid: &str,
        required_role: RoleName,
        target_host: &str,
    ) -> bool {
        let hosts = match self.grant_repo.hosts_if_role(member_uid, required_role).await {
            Ok(Some(hosts)) => hosts,
            Ok(None) => return false,
            Err(e) => {
                warn!(member_uid = %member_uid, error = %e, "Access check read failed");
                return false;
            }
        };

        let allowed = self.host_matches(&hosts, target_host);
        debug!(
            member_uid = %member_uid,
            role = %required_role,
            host = %target_host,
            allowed,
            "Access check"
        );
        allowed
    }

    /// Whether `member_uid` may administer the demo day at `slug_url`,
    /// matched against that demo day's host.
    pub async fn can_administer_demo_day(&self, member_uid: &str, slug_url: &str) -> bool {
        let demo_day = match self.demo_day_repo.get_by_slug(slug_url).await {
            Ok(demo_day) => demo_day,
            Err(e) => {
                debug!(slug_url = %slug_url, error = %e, "Demo day lookup failed");
                return false;
            }
        };

        self.can_administer(member_uid, RoleName::DemoDayAdmin, &demo_day.host)
            .await
    }

    /// Capabilities the member can exercise against `host`.
    ///
    /// Roles that require a host scope only contribute when the host
    /// matches; other roles contribute unconditionally.
    pub async fn capabilities_for_host(&self, member_uid: &str, host: &str) -> BTreeSet<Capability> {
        let grants = match self.grant_repo.get_grants(member_uid).await {
            Ok(grants) => grants,
            Err(e) => {
                warn!(member_uid = %member_uid, error = %e, "Capability lookup failed");
                return BTreeSet::new();
            }
        };

        let host_ok = self.host_matches(&grants.hosts, host);
        grants
            .roles
            .iter()
            .filter(|role| !role.requires_host_scope() || host_ok)
            .flat_map(|role| role.capabilities())
            .collect()
    }

    fn host_matches(&self, hosts: &BTreeSet<String>, target_host: &str) -> bool {
        hosts.contains(target_host)
            || (self.config.honor_wildcard_host && hosts.contains(WILDCARD_HOST))
    }
}
