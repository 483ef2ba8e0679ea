//! Shared handler state.

use std::sync::Arc;

use dirgate_authz::{AccessChecker, AssignmentService, AuthzConfig};
use dirgate_db::repository::{
    SurrealDemoDayRepository, SurrealGrantRepository, SurrealMemberRepository,
};
use surrealdb::{Connection, Surreal};

pub type Assignments<C> = AssignmentService<SurrealMemberRepository<C>, SurrealGrantRepository<C>>;
pub type Access<C> = AccessChecker<SurrealGrantRepository<C>, SurrealDemoDayRepository<C>>;

/// Services shared by every request.
pub struct AppState<C: Connection> {
    pub assignments: Arc<Assignments<C>>,
    pub access: Arc<Access<C>>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            assignments: Arc::clone(&self.assignments),
            access: Arc::clone(&self.access),
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>, config: AuthzConfig) -> Self {
        let assignments = AssignmentService::new(
            SurrealMemberRepository::new(db.clone()),
            SurrealGrantRepository::new(db.clone()),
            config.clone(),
        );
        let access = AccessChecker::new(
            SurrealGrantRepository::new(db.clone()),
            SurrealDemoDayRepository::new(db),
            config,
        );

        Self {
            assignments: Arc::new(assignments),
            access: Arc::new(access),
        }
    }
}
