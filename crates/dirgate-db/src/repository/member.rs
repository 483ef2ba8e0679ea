//! SurrealDB implementation of [`MemberRepository`].

use chrono::{DateTime, Utc};
use dirgate_core::error::{DirgateError, DirgateResult};
use dirgate_core::models::member::{CreateMember, Member};
use dirgate_core::repository::{MemberRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MemberRow {
    name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self, uid: String) -> Member {
        Member {
            uid,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct MemberRowWithId {
    record_id: String,
    name: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Member repository.
#[derive(Clone)]
pub struct SurrealMemberRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMemberRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MemberRepository for SurrealMemberRepository<C> {
    async fn create(&self, input: CreateMember) -> DirgateResult<Member> {
        if input.uid.is_empty() {
            return Err(DirgateError::Validation {
                message: "member uid must not be empty".into(),
            });
        }
        if self.exists(&input.uid).await? {
            return Err(DirgateError::AlreadyExists {
                entity: "member".into(),
            });
        }

        let result = self
            .db
            .query(
                "CREATE type::record('member', $uid) SET \
                 name = $name, email = $email",
            )
            .bind(("uid", input.uid.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::InvalidRow(e.to_string()))?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "member".into(),
            id: input.uid.clone(),
        })?;

        Ok(row.into_member(input.uid))
    }

    async fn get_by_uid(&self, uid: &str) -> DirgateResult<Member> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('member', $uid)")
            .bind(("uid", uid.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "member".into(),
            id: uid.to_string(),
        })?;

        Ok(row.into_member(uid.to_string()))
    }

    async fn exists(&self, uid: &str) -> DirgateResult<bool> {
        let mut result = self
            .db
            .query("RETURN record::exists(type::record('member', $uid))")
            .bind(("uid", uid.to_string()))
            .await
            .map_err(DbError::from)?;

        let found: Option<bool> = result.take(0).map_err(DbError::from)?;
        Ok(found.unwrap_or(false))
    }

    async fn delete(&self, uid: &str) -> DirgateResult<()> {
        if !self.exists(uid).await? {
            return Err(DbError::NotFound {
                entity: "member".into(),
                id: uid.to_string(),
            }
            .into());
        }

        // Role and scope rows go with the member, all or nothing.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE member_role WHERE member_uid = $uid; \
                 DELETE member_scope WHERE member_uid = $uid; \
                 DELETE type::record('member', $uid); \
                 COMMIT TRANSACTION;",
            )
            .bind(("uid", uid.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        info!(member_uid = %uid, "Member deleted");
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> DirgateResult<PaginatedResult<Member>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM member GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM member \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| Member {
                uid: row.record_id,
                name: row.name,
                email: row.email,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
