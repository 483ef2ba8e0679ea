//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Operations that mutate a
//! member's roles or scopes replace whole sets inside a single storage
//! transaction; partial application is never observable.

use std::collections::BTreeSet;

use crate::error::DirgateResult;
use crate::models::{
    demo_day::{CreateDemoDay, DemoDay, DemoDayStatus},
    grant::{GrantChange, MemberGrants},
    member::{CreateMember, Member},
    role::RoleName,
    scope::{ScopeEntry, ScopeType},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

pub trait MemberRepository: Send + Sync {
    fn create(&self, input: CreateMember) -> impl Future<Output = DirgateResult<Member>> + Send;
    fn get_by_uid(&self, uid: &str) -> impl Future<Output = DirgateResult<Member>> + Send;
    fn exists(&self, uid: &str) -> impl Future<Output = DirgateResult<bool>> + Send;
    /// Removes the member together with all of its role and scope rows.
    fn delete(&self, uid: &str) -> impl Future<Output = DirgateResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = DirgateResult<PaginatedResult<Member>>> + Send;
}

// ---------------------------------------------------------------------------
// Roles and scopes
// ---------------------------------------------------------------------------

pub trait RoleAssignmentRepository: Send + Sync {
    fn list_roles(
        &self,
        member_uid: &str,
    ) -> impl Future<Output = DirgateResult<BTreeSet<RoleName>>> + Send;

    /// Delete every role of the member, then insert `roles`, atomically.
    fn replace_roles(
        &self,
        member_uid: &str,
        roles: BTreeSet<RoleName>,
    ) -> impl Future<Output = DirgateResult<()>> + Send;

    /// Uids of all members holding `role`, sorted.
    fn list_members_with_role(
        &self,
        role: RoleName,
    ) -> impl Future<Output = DirgateResult<Vec<String>>> + Send;
}

pub trait ScopeRepository: Send + Sync {
    fn list_scopes(
        &self,
        member_uid: &str,
    ) -> impl Future<Output = DirgateResult<BTreeSet<ScopeEntry>>> + Send;

    /// Values of the member's `HOST` scope entries.
    fn list_hosts(
        &self,
        member_uid: &str,
    ) -> impl Future<Output = DirgateResult<BTreeSet<String>>> + Send;

    /// Delete every entry of `scope_type` for the member, then insert
    /// `values`, atomically. Idempotent.
    fn replace_scopes(
        &self,
        member_uid: &str,
        scope_type: ScopeType,
        values: BTreeSet<String>,
    ) -> impl Future<Output = DirgateResult<()>> + Send;
}

/// Joint access to roles and host scopes.
pub trait GrantRepository: Send + Sync {
    /// Apply a role and/or host replacement in one transaction.
    ///
    /// Fails with `AssignmentTransaction` when the store rejects any part;
    /// prior state is then unchanged.
    fn apply(
        &self,
        member_uid: &str,
        change: GrantChange,
    ) -> impl Future<Output = DirgateResult<()>> + Send;

    /// Roles and hosts read from one consistent snapshot.
    fn get_grants(&self, member_uid: &str)
    -> impl Future<Output = DirgateResult<MemberGrants>> + Send;

    /// The member's `HOST` values if it holds `role`, `None` otherwise.
    ///
    /// Scopes are not read when the role is absent.
    fn hosts_if_role(
        &self,
        member_uid: &str,
        role: RoleName,
    ) -> impl Future<Output = DirgateResult<Option<BTreeSet<String>>>> + Send;
}

// ---------------------------------------------------------------------------
// Demo days
// ---------------------------------------------------------------------------

pub trait DemoDayRepository: Send + Sync {
    fn create(&self, input: CreateDemoDay) -> impl Future<Output = DirgateResult<DemoDay>> + Send;
    fn get_by_slug(&self, slug_url: &str) -> impl Future<Output = DirgateResult<DemoDay>> + Send;
    /// Forward-only status change.
    fn update_status(
        &self,
        slug_url: &str,
        status: DemoDayStatus,
    ) -> impl Future<Output = DirgateResult<DemoDay>> + Send;
    /// Only permitted while the demo day is still upcoming.
    fn update_host(
        &self,
        slug_url: &str,
        host: String,
    ) -> impl Future<Output = DirgateResult<DemoDay>> + Send;
    fn list_by_host(&self, host: &str) -> impl Future<Output = DirgateResult<Vec<DemoDay>>> + Send;
}
