//! SurrealDB implementation of [`RoleAssignmentRepository`].

use std::collections::BTreeSet;

use dirgate_core::error::DirgateResult;
use dirgate_core::models::role::RoleName;
use dirgate_core::repository::RoleAssignmentRepository;
use surrealdb::{Connection, Surreal};

use super::grant::{
    GUARD_MEMBER, REPLACE_ROLES, parse_role, role_strings, transaction, transaction_error,
};
use crate::error::DbError;

/// SurrealDB implementation of the role assignment repository.
#[derive(Clone)]
pub struct SurrealRoleAssignmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleAssignmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleAssignmentRepository for SurrealRoleAssignmentRepository<C> {
    async fn list_roles(&self, member_uid: &str) -> DirgateResult<BTreeSet<RoleName>> {
        let mut result = self
            .db
            .query(
                "SELECT VALUE role_name FROM member_role \
                 WHERE member_uid = $member_uid",
            )
            .bind(("member_uid", member_uid.to_string()))
            .await
            .map_err(DbError::from)?;

        let names: Vec<String> = result.take(0).map_err(DbError::from)?;
        names
            .iter()
            .map(|name| parse_role(name))
            .collect::<Result<BTreeSet<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn replace_roles(&self, member_uid: &str, roles: BTreeSet<RoleName>) -> DirgateResult<()> {
        self.db
            .query(transaction(&[GUARD_MEMBER, REPLACE_ROLES]))
            .bind(("member_uid", member_uid.to_string()))
            .bind(("roles", role_strings(&roles)))
            .await
            .and_then(|response| response.check())
            .map_err(|e| transaction_error(member_uid, e))?;

        Ok(())
    }

    async fn list_members_with_role(&self, role: RoleName) -> DirgateResult<Vec<String>> {
        let mut result = self
            .db
            .query(
                "SELECT VALUE member_uid FROM member_role \
                 WHERE role_name = $role_name",
            )
            .bind(("role_name", role.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut uids: Vec<String> = result.take(0).map_err(DbError::from)?;
        uids.sort();
        Ok(uids)
    }
}
