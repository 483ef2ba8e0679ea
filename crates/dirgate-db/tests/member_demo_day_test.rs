//! Integration tests for the Member and DemoDay repositories using
//! in-memory SurrealDB.

use dirgate_core::error::DirgateError;
use dirgate_core::models::demo_day::{CreateDemoDay, DemoDayStatus};
use dirgate_core::models::grant::GrantChange;
use dirgate_core::models::member::CreateMember;
use dirgate_core::models::role::RoleName;
use dirgate_core::repository::{
    DemoDayRepository, GrantRepository, MemberRepository, Pagination,
};
use dirgate_db::repository::{
    SurrealDemoDayRepository, SurrealGrantRepository, SurrealMemberRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dirgate_db::run_migrations(&db).await.unwrap();
    db
}

fn member(uid: &str) -> CreateMember {
    CreateMember {
        uid: uid.into(),
        name: format!("Member {uid}"),
        email: None,
    }
}

fn demo_day(slug: &str, host: &str) -> CreateDemoDay {
    CreateDemoDay {
        slug_url: slug.into(),
        name: format!("Demo Day {slug}"),
        host: host.into(),
    }
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_member() {
    let repo = SurrealMemberRepository::new(setup().await);

    let created = repo.create(member("uid-1")).await.unwrap();
    assert_eq!(created.uid, "uid-1");

    let fetched = repo.get_by_uid("uid-1").await.unwrap();
    assert_eq!(fetched.name, "Member uid-1");
    assert!(repo.exists("uid-1").await.unwrap());
    assert!(!repo.exists("uid-2").await.unwrap());
}

#[tokio::test]
async fn duplicate_member_is_rejected() {
    let repo = SurrealMemberRepository::new(setup().await);

    repo.create(member("uid-1")).await.unwrap();
    let err = repo.create(member("uid-1")).await.unwrap_err();
    assert!(matches!(err, DirgateError::AlreadyExists { .. }));
}

#[tokio::test]
async fn get_missing_member_is_not_found() {
    let repo = SurrealMemberRepository::new(setup().await);

    let err = repo.get_by_uid("ghost").await.unwrap_err();
    assert!(matches!(err, DirgateError::NotFound { entity, .. } if entity == "member"));
}

#[tokio::test]
async fn delete_member_cascades_grants() {
    let db = setup().await;
    let members = SurrealMemberRepository::new(db.clone());
    let grants = SurrealGrantRepository::new(db);

    members.create(member("uid-1")).await.unwrap();
    grants
        .apply(
            "uid-1",
            GrantChange {
                roles: Some([RoleName::DemoDayAdmin].into()),
                hosts: Some(["plnetwork.io".to_string()].into()),
            },
        )
        .await
        .unwrap();

    members.delete("uid-1").await.unwrap();

    assert!(!members.exists("uid-1").await.unwrap());
    let left = grants.get_grants("uid-1").await.unwrap();
    assert!(left.roles.is_empty());
    assert!(left.hosts.is_empty());

    let err = members.delete("uid-1").await.unwrap_err();
    assert!(matches!(err, DirgateError::NotFound { .. }));
}

#[tokio::test]
async fn list_members_paginates() {
    let repo = SurrealMemberRepository::new(setup().await);
    for uid in ["uid-1", "uid-2", "uid-3"] {
        repo.create(member(uid)).await.unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
}

// ---------------------------------------------------------------------------
// Demo days
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_demo_day_starts_upcoming() {
    let repo = SurrealDemoDayRepository::new(setup().await);

    let day = repo
        .create(demo_day("pl-genesis", "plnetwork.io"))
        .await
        .unwrap();
    assert_eq!(day.status, DemoDayStatus::Upcoming);

    let fetched = repo.get_by_slug("pl-genesis").await.unwrap();
    assert_eq!(fetched.id, day.id);
    assert_eq!(fetched.host, "plnetwork.io");
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let repo = SurrealDemoDayRepository::new(setup().await);

    repo.create(demo_day("pl-genesis", "plnetwork.io"))
        .await
        .unwrap();
    let err = repo
        .create(demo_day("pl-genesis", "founders.plnetwork.io"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirgateError::AlreadyExists { .. }));
}

#[tokio::test]
async fn demo_day_host_must_be_concrete() {
    let repo = SurrealDemoDayRepository::new(setup().await);

    for host in ["*", "", "Not A Host"] {
        let err = repo.create(demo_day("bad", host)).await.unwrap_err();
        assert!(matches!(err, DirgateError::InvalidHost { .. }), "{host:?}");
    }
}

#[tokio::test]
async fn status_moves_forward_only() {
    let repo = SurrealDemoDayRepository::new(setup().await);
    repo.create(demo_day("pl-genesis", "plnetwork.io"))
        .await
        .unwrap();

    let live = repo
        .update_status("pl-genesis", DemoDayStatus::Live)
        .await
        .unwrap();
    assert_eq!(live.status, DemoDayStatus::Live);

    let err = repo
        .update_status("pl-genesis", DemoDayStatus::Upcoming)
        .await
        .unwrap_err();
    assert!(matches!(err, DirgateError::Validation { .. }));

    let done = repo
        .update_status("pl-genesis", DemoDayStatus::Completed)
        .await
        .unwrap();
    assert_eq!(done.status, DemoDayStatus::Completed);
}

#[tokio::test]
async fn host_is_fixed_once_live() {
    let repo = SurrealDemoDayRepository::new(setup().await);
    repo.create(demo_day("pl-genesis", "plnetwork.io"))
        .await
        .unwrap();

    let moved = repo
        .update_host("pl-genesis", "founders.plnetwork.io".into())
        .await
        .unwrap();
    assert_eq!(moved.host, "founders.plnetwork.io");

    repo.update_status("pl-genesis", DemoDayStatus::Live)
        .await
        .unwrap();
    let err = repo
        .update_host("pl-genesis", "plnetwork.io".into())
        .await
        .unwrap_err();
    assert!(matches!(err, DirgateError::Validation { .. }));
    assert_eq!(
        repo.get_by_slug("pl-genesis").await.unwrap().host,
        "founders.plnetwork.io"
    );
}

#[tokio::test]
async fn list_by_host_filters() {
    let repo = SurrealDemoDayRepository::new(setup().await);
    repo.create(demo_day("a", "plnetwork.io")).await.unwrap();
    repo.create(demo_day("b", "enterprise.ai.plnetwork.io"))
        .await
        .unwrap();
    repo.create(demo_day("c", "plnetwork.io")).await.unwrap();

    let days = repo.list_by_host("plnetwork.io").await.unwrap();
    let slugs: Vec<_> = days.iter().map(|d| d.slug_url.as_str()).collect();
    assert_eq!(slugs.len(), 2);
    assert!(slugs.contains(&"a") && slugs.contains(&"c"));
}
