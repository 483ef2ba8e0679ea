//! SurrealDB repository implementations.

mod demo_day;
mod grant;
mod member;
mod member_role;
mod member_scope;

pub use demo_day::SurrealDemoDayRepository;
pub use grant::SurrealGrantRepository;
pub use member::SurrealMemberRepository;
pub use member_role::SurrealRoleAssignmentRepository;
pub use member_scope::SurrealScopeRepository;
