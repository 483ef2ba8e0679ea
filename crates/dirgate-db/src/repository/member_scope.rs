//! SurrealDB implementation of [`ScopeRepository`].

use std::collections::BTreeSet;

use dirgate_core::error::DirgateResult;
use dirgate_core::models::scope::{ScopeEntry, ScopeType};
use dirgate_core::repository::ScopeRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::grant::{GUARD_MEMBER, REPLACE_SCOPES, transaction, transaction_error};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ScopeRow {
    member_uid: String,
    scope_type: String,
    scope_value: String,
}

impl ScopeRow {
    fn try_into_entry(self) -> Result<ScopeEntry, DbError> {
        let scope_type = self
            .scope_type
            .parse::<ScopeType>()
            .map_err(|e| DbError::InvalidRow(e.to_string()))?;
        Ok(ScopeEntry {
            member_uid: self.member_uid,
            scope_type,
            scope_value: self.scope_value,
        })
    }
}

/// SurrealDB implementation of the Scope repository.
#[derive(Clone)]
pub struct SurrealScopeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealScopeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ScopeRepository for SurrealScopeRepository<C> {
    async fn list_scopes(&self, member_uid: &str) -> DirgateResult<BTreeSet<ScopeEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT member_uid, scope_type, scope_value FROM member_scope \
                 WHERE member_uid = $member_uid",
            )
            .bind(("member_uid", member_uid.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ScopeRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<BTreeSet<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn list_hosts(&self, member_uid: &str) -> DirgateResult<BTreeSet<String>> {
        let mut result = self
            .db
            .query(
                "SELECT VALUE scope_value FROM member_scope \
                 WHERE member_uid = $member_uid AND scope_type = $scope_type",
            )
            .bind(("member_uid", member_uid.to_string()))
            .bind(("scope_type", ScopeType::Host.as_str()))
            .await
            .map_err(DbError::from)?;

        let hosts: Vec<String> = result.take(0).map_err(DbError::from)?;
        Ok(hosts.into_iter().collect())
    }

    async fn replace_scopes(
        &self,
        member_uid: &str,
        scope_type: ScopeType,
        values: BTreeSet<String>,
    ) -> DirgateResult<()> {
        self.db
            .query(transaction(&[GUARD_MEMBER, REPLACE_SCOPES]))
            .bind(("member_uid", member_uid.to_string()))
            .bind(("scope_type", scope_type.as_str()))
            .bind(("scope_values", values.into_iter().collect::<Vec<_>>()))
            .await
            .and_then(|response| response.check())
            .map_err(|e| transaction_error(member_uid, e))?;

        Ok(())
    }
}
