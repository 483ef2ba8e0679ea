//! SurrealDB implementation of [`GrantRepository`], plus the set
//! replacement statements shared with the role and scope repositories.

use std::collections::BTreeSet;

use dirgate_core::error::DirgateResult;
use dirgate_core::models::grant::{GrantChange, MemberGrants};
use dirgate_core::models::role::RoleName;
use dirgate_core::models::scope::ScopeType;
use dirgate_core::repository::GrantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;

use crate::error::DbError;

/// Marker raised when the target member is gone at commit time.
pub(crate) const MEMBER_MISSING: &str = "member not found";

/// Abort unless `$member_uid` exists, then touch the member record so a
/// concurrent delete of the same member conflicts with this transaction.
pub(crate) const GUARD_MEMBER: &str = "\
IF !record::exists(type::record('member', $member_uid)) { \
    THROW 'member not found'; \
}; \
UPDATE type::record('member', $member_uid) SET updated_at = time::now();";

/// Replace every role of `$member_uid` with the names in `$roles`.
pub(crate) const REPLACE_ROLES: &str = "\
DELETE member_role WHERE member_uid = $member_uid; \
FOR $role IN $roles { \
    CREATE member_role SET member_uid = $member_uid, role_name = $role; \
};";

/// Replace every `$scope_type` entry of `$member_uid` with `$scope_values`.
pub(crate) const REPLACE_SCOPES: &str = "\
DELETE member_scope WHERE member_uid = $member_uid \
    AND scope_type = $scope_type; \
FOR $value IN $scope_values { \
    CREATE member_scope SET member_uid = $member_uid, \
        scope_type = $scope_type, scope_value = $value; \
};";

/// Wrap statements in one SurrealDB transaction.
pub(crate) fn transaction(statements: &[&str]) -> String {
    format!(
        "BEGIN TRANSACTION; {} COMMIT TRANSACTION;",
        statements.join(" ")
    )
}

/// Map a failed grant transaction, separating a vanished member from
/// other cancellations.
pub(crate) fn transaction_error(member_uid: &str, err: surrealdb::Error) -> DbError {
    let reason = err.to_string();
    if reason.contains(MEMBER_MISSING) {
        DbError::NotFound {
            entity: "member".into(),
            id: member_uid.to_string(),
        }
    } else {
        DbError::Transaction(reason)
    }
}

pub(crate) fn parse_role(name: &str) -> Result<RoleName, DbError> {
    name.parse()
        .map_err(|_| DbError::InvalidRow(format!("unknown stored role: {name}")))
}

pub(crate) fn role_strings(roles: &BTreeSet<RoleName>) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

#[derive(Debug, SurrealValue)]
struct GrantsRow {
    roles: Vec<String>,
    hosts: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct HeldRow {
    held: bool,
    hosts: Vec<String>,
}

/// SurrealDB implementation of the Grant repository.
#[derive(Clone)]
pub struct SurrealGrantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGrantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> GrantRepository for SurrealGrantRepository<C> {
    async fn apply(&self, member_uid: &str, change: GrantChange) -> DirgateResult<()> {
        if change.is_empty() {
            return Ok(());
        }

        let mut statements = vec![GUARD_MEMBER];
        if change.roles.is_some() {
            statements.push(REPLACE_ROLES);
        }
        if change.hosts.is_some() {
            statements.push(REPLACE_SCOPES);
        }

        let mut builder = self
            .db
            .query(transaction(&statements))
            .bind(("member_uid", member_uid.to_string()));

        if let Some(roles) = &change.roles {
            builder = builder.bind(("roles", role_strings(roles)));
        }
        if let Some(hosts) = change.hosts {
            builder = builder
                .bind(("scope_type", ScopeType::Host.as_str()))
                .bind(("scope_values", hosts.into_iter().collect::<Vec<_>>()));
        }

        builder
            .await
            .and_then(|response| response.check())
            .map_err(|e| transaction_error(member_uid, e))?;

        debug!(member_uid = %member_uid, "Grant change committed");
        Ok(())
    }

    async fn get_grants(&self, member_uid: &str) -> DirgateResult<MemberGrants> {
        // A single statement reads one snapshot.
        let mut result = self
            .db
            .query(
                "RETURN { \
                     roles: (SELECT VALUE role_name FROM member_role \
                         WHERE member_uid = $member_uid), \
                     hosts: (SELECT VALUE scope_value FROM member_scope \
                         WHERE member_uid = $member_uid AND scope_type = 'HOST') \
                 };",
            )
            .bind(("member_uid", member_uid.to_string()))
            .await
            .map_err(DbError::from)?;

        let row: Option<GrantsRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = row else {
            return Ok(MemberGrants::default());
        };

        let roles = row
            .roles
            .iter()
            .map(|name| parse_role(name))
            .collect::<Result<BTreeSet<_>, DbError>>()?;

        Ok(MemberGrants {
            roles,
            hosts: row.hosts.into_iter().collect(),
        })
    }

    async fn hosts_if_role(
        &self,
        member_uid: &str,
        role: RoleName,
    ) -> DirgateResult<Option<BTreeSet<String>>> {
        let mut result = self
            .db
            .query(
                "IF count((SELECT id FROM member_role \
                     WHERE member_uid = $member_uid AND role_name = $role_name)) > 0 { \
                     RETURN { held: true, hosts: (SELECT VALUE scope_value FROM member_scope \
                         WHERE member_uid = $member_uid AND scope_type = 'HOST') }; \
                 } ELSE { \
                     RETURN { held: false, hosts: [] }; \
                 };",
            )
            .bind(("member_uid", member_uid.to_string()))
            .bind(("role_name", role.as_str()))
            .await
            .map_err(DbError::from)?;

        let row: Option<HeldRow> = result.take(0).map_err(DbError::from)?;
        Ok(row
            .filter(|r| r.held)
            .map(|r| r.hosts.into_iter().collect()))
    }
}
