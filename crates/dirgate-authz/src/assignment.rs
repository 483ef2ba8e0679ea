//! Assignment service, the only writer of member roles and host scopes.
//!
//! Updates are validate-then-commit: role names and hosts are checked and
//! the member's existence confirmed before a single storage transaction
//! replaces the affected sets. When a role update drops `DEMO_DAY_ADMIN`
//! and the caller did not say anything about hosts, the member's host
//! scopes are cleared in the same transaction.

use std::collections::BTreeSet;

use dirgate_core::error::DirgateResult;
use dirgate_core::models::grant::{GrantChange, MemberGrants};
use dirgate_core::models::role::{RoleName, parse_roles};
use dirgate_core::models::scope::{WILDCARD_HOST, validate_host};
use dirgate_core::repository::{GrantRepository, MemberRepository};
use tracing::info;

use crate::config::AuthzConfig;
use crate::error::AuthzError;

/// Body of a member-roles update. Omitted fields are left untouched;
/// empty lists clear the dimension.
#[derive(Debug, Clone, Default)]
pub struct UpdateRolesInput {
    pub roles: Option<Vec<String>>,
    pub hosts: Option<Vec<String>>,
}

/// Assignment service.
///
/// Generic over repository implementations so that the authorization
/// layer has no dependency on the database crate.
pub struct AssignmentService<M: MemberRepository, G: GrantRepository> {
    member_repo: M,
    grant_repo: G,
    config: AuthzConfig,
}

impl<M: MemberRepository, G: GrantRepository> AssignmentService<M, G> {
    pub fn new(member_repo: M, grant_repo: G, config: AuthzConfig) -> Self {
        Self {
            member_repo,
            grant_repo,
            config,
        }
    }

    /// Replace a member's roles and/or host scopes atomically.
    pub async fn update_member_roles_and_hosts(
        &self,
        member_uid: &str,
        input: UpdateRolesInput,
    ) -> DirgateResult<()> {
        // 1. Validate everything before touching storage.
        let change = self.build_change(input)?;

        // 2. The target member must exist.
        if !self.member_repo.exists(member_uid).await? {
            return Err(AuthzError::MemberNotFound(member_uid.to_string()).into());
        }

        if change.is_empty() {
            return Ok(());
        }

        let role_count = change.roles.as_ref().map(BTreeSet::len);
        let host_count = change.hosts.as_ref().map(BTreeSet::len);

        // 3. One transaction for both dimensions.
        self.grant_repo.apply(member_uid, change).await?;

        info!(
            member_uid = %member_uid,
            roles = ?role_count,
            hosts = ?host_count,
            "Member roles and hosts updated"
        );
        Ok(())
    }

    /// Current roles and hosts of an existing member.
    pub async fn member_grants(&self, member_uid: &str) -> DirgateResult<MemberGrants> {
        if !self.member_repo.exists(member_uid).await? {
            return Err(AuthzError::MemberNotFound(member_uid.to_string()).into());
        }
        self.grant_repo.get_grants(member_uid).await
    }

    fn build_change(&self, input: UpdateRolesInput) -> DirgateResult<GrantChange> {
        let roles = input.roles.as_deref().map(parse_roles).transpose()?;
        let hosts = input
            .hosts
            .map(|hosts| self.validate_hosts(hosts))
            .transpose()?;

        let hosts = match (&roles, hosts) {
            (Some(roles), None) if !roles.contains(&RoleName::DemoDayAdmin) => {
                Some(BTreeSet::new())
            }
            (_, hosts) => hosts,
        };

        Ok(GrantChange { roles, hosts })
    }

    fn validate_hosts(&self, hosts: Vec<String>) -> DirgateResult<BTreeSet<String>> {
        for host in &hosts {
            if host == WILDCARD_HOST && !self.config.allow_wildcard_assignment {
                return Err(AuthzError::WildcardNotAllowed(host.clone()).into());
            }
            validate_host(host)?;
        }
        Ok(hosts.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use dirgate_core::error::DirgateError;
    use dirgate_core::models::member::{CreateMember, Member};
    use dirgate_core::repository::{PaginatedResult, Pagination};

    use super::*;

    struct FakeMembers(Vec<&'static str>);

    impl MemberRepository for FakeMembers {
        async fn create(&self, _input: CreateMember) -> DirgateResult<Member> {
            unimplemented!()
        }
        async fn get_by_uid(&self, _uid: &str) -> DirgateResult<Member> {
            unimplemented!()
        }
        async fn exists(&self, uid: &str) -> DirgateResult<bool> {
            Ok(self.0.iter().any(|m| *m == uid))
        }
        async fn delete(&self, _uid: &str) -> DirgateResult<()> {
            unimplemented!()
        }
        async fn list(&self, _pagination: Pagination) -> DirgateResult<PaginatedResult<Member>> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct RecordingGrants(Mutex<Vec<GrantChange>>);

    impl GrantRepository for RecordingGrants {
        async fn apply(&self, _member_uid: &str, change: GrantChange) -> DirgateResult<()> {
            self.0.lock().unwrap().push(change);
            Ok(())
        }
        async fn get_grants(&self, _member_uid: &str) -> DirgateResult<MemberGrants> {
            Ok(MemberGrants::default())
        }
        async fn hosts_if_role(
            &self,
            _member_uid: &str,
            _role: RoleName,
        ) -> DirgateResult<Option<BTreeSet<String>>> {
            Ok(None)
        }
    }

    fn service(config: AuthzConfig) -> AssignmentService<FakeMembers, RecordingGrants> {
        AssignmentService::new(FakeMembers(vec!["m-1"]), RecordingGrants::default(), config)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn applied(svc: &AssignmentService<FakeMembers, RecordingGrants>) -> Vec<GrantChange> {
        svc.grant_repo.0.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn unknown_role_aborts_before_any_write() {
        let svc = service(AuthzConfig::default());
        let err = svc
            .update_member_roles_and_hosts(
                "m-1",
                UpdateRolesInput {
                    roles: Some(strings(&["BAD_ROLE"])),
                    hosts: Some(strings(&["x.io"])),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DirgateError::UnknownRole { name } if name == "BAD_ROLE"));
        assert!(applied(&svc).is_empty());
    }

    #[tokio::test]
    async fn invalid_host_is_named() {
        let svc = service(AuthzConfig::default());
        let err = svc
            .update_member_roles_and_hosts(
                "m-1",
                UpdateRolesInput {
                    roles: None,
                    hosts: Some(strings(&["ok.io", "Bad Host"])),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DirgateError::InvalidHost { host } if host == "Bad Host"));
        assert!(applied(&svc).is_empty());
    }

    #[tokio::test]
    async fn missing_member_is_not_found() {
        let svc = service(AuthzConfig::default());
        let err = svc
            .update_member_roles_and_hosts(
                "ghost",
                UpdateRolesInput {
                    roles: Some(strings(&["DEMO_DAY_ADMIN"])),
                    hosts: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DirgateError::NotFound { id, .. } if id == "ghost"));
        assert!(applied(&svc).is_empty());
    }

    #[tokio::test]
    async fn omitted_hosts_are_untouched_while_role_is_kept() {
        let svc = service(AuthzConfig::default());
        svc.update_member_roles_and_hosts(
            "m-1",
            UpdateRolesInput {
                roles: Some(strings(&["DEMO_DAY_ADMIN"])),
                hosts: None,
            },
        )
        .await
        .unwrap();

        let changes = applied(&svc);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].hosts, None);
    }

    #[tokio::test]
    async fn dropping_demo_day_admin_clears_hosts() {
        let svc = service(AuthzConfig::default());
        svc.update_member_roles_and_hosts(
            "m-1",
            UpdateRolesInput {
                roles: Some(strings(&["DIRECTORYADMIN"])),
                hosts: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(applied(&svc)[0].hosts, Some(BTreeSet::new()));
    }

    #[tokio::test]
    async fn explicit_hosts_win_over_cascade() {
        let svc = service(AuthzConfig::default());
        svc.update_member_roles_and_hosts(
            "m-1",
            UpdateRolesInput {
                roles: Some(vec![]),
                hosts: Some(strings(&["plnetwork.io"])),
            },
        )
        .await
        .unwrap();

        let change = &applied(&svc)[0];
        assert_eq!(change.roles, Some(BTreeSet::new()));
        assert_eq!(change.hosts, Some(["plnetwork.io".to_string()].into()));
    }

    #[tokio::test]
    async fn duplicate_inputs_collapse() {
        let svc = service(AuthzConfig::default());
        svc.update_member_roles_and_hosts(
            "m-1",
            UpdateRolesInput {
                roles: Some(strings(&["DEMO_DAY_ADMIN", "DEMO_DAY_ADMIN"])),
                hosts: Some(strings(&["a.io", "a.io", "b.io"])),
            },
        )
        .await
        .unwrap();

        let change = &applied(&svc)[0];
        assert_eq!(change.roles.as_ref().unwrap().len(), 1);
        assert_eq!(change.hosts.as_ref().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn wildcard_assignment_can_be_disabled() {
        let svc = service(AuthzConfig {
            allow_wildcard_assignment: false,
            ..AuthzConfig::default()
        });
        let err = svc
            .update_member_roles_and_hosts(
                "m-1",
                UpdateRolesInput {
                    roles: None,
                    hosts: Some(strings(&["*"])),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DirgateError::InvalidHost { host } if host == "*"));
    }

    #[tokio::test]
    async fn empty_update_writes_nothing() {
        let svc = service(AuthzConfig::default());
        svc.update_member_roles_and_hosts("m-1", UpdateRolesInput::default())
            .await
            .unwrap();
        assert!(applied(&svc).is_empty());
    }
}
