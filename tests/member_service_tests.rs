/*!
 * Member service integration tests: CRUD, the soft-delete invariant, points
 * and ledger writes, counter maintenance, bulk atomicity, and export shape.
 */

use std::collections::BTreeMap;

use serde_json::json;

use clubhub::collections;
use clubhub::db::Query;
use clubhub::errors::{MemberError, StoreError};
use clubhub::models::{
    CreateMember, MemberListOptions, MemberStatus, PointsEntry, SkillRef, UpdateMember,
};
use clubhub::test_utils::TestContext;

fn skill(id: &str, name: &str, level: &str) -> SkillRef {
    SkillRef {
        skill_id: id.to_string(),
        name: name.to_string(),
        level: level.to_string(),
    }
}

#[tokio::test]
async fn create_then_get_returns_a_pending_zeroed_member() {
    let ctx = TestContext::new();
    ctx.create_department("MD", "Media").await;

    let created = ctx
        .create_member("Jane Doe", "jane@example.com", "MD")
        .await;
    let fetched = ctx.members.get_member(&created.id).await.unwrap();

    assert_eq!(fetched.status, MemberStatus::Pending);
    assert_eq!(fetched.total_points, 0);
    assert_eq!(fetched.full_name, "Jane Doe");
    assert_eq!(fetched.email, "jane@example.com");
    assert_eq!(fetched.role, "member");
    assert_eq!(fetched.level, "regular");
    assert!(fetched.code.starts_with("MEM"));

    let department = ctx.departments.get_department_by_code("MD").await.unwrap();
    assert_eq!(department.total_members, 1);
}

#[tokio::test]
async fn create_member_rejects_invalid_input() {
    let ctx = TestContext::new();
    let err = ctx
        .members
        .create_member(CreateMember {
            full_name: String::new(),
            email: "bad".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    match err {
        MemberError::ValidationFailed { errors } => assert_eq!(errors.len(), 2),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn create_member_survives_an_unknown_department() {
    let ctx = TestContext::new();
    let member = ctx
        .create_member("Jane Doe", "jane@example.com", "ZZ")
        .await;
    assert_eq!(member.department, "ZZ");
    assert!(ctx.members.get_member(&member.id).await.is_ok());
}

#[tokio::test]
async fn lookups_distinguish_missing_from_deleted() {
    let ctx = TestContext::new();
    let member = ctx.create_member("Jane Doe", "jane@example.com", "").await;

    let err = ctx.members.get_member("ghost").await.unwrap_err();
    assert!(matches!(err, MemberError::NotFoundById { .. }));

    ctx.members.delete_member(&member.id).await.unwrap();
    let err = ctx.members.get_member(&member.id).await.unwrap_err();
    assert!(matches!(err, MemberError::AlreadyDeleted { .. }));

    let err = ctx
        .members
        .get_member_by_code(&member.code)
        .await
        .unwrap_err();
    assert!(matches!(err, MemberError::NotFoundByCode { .. }));

    let err = ctx.members.delete_member(&member.id).await.unwrap_err();
    assert!(matches!(err, MemberError::AlreadyDeleted { .. }));
}

#[tokio::test]
async fn soft_deleted_members_disappear_from_every_read_path() {
    let ctx = TestContext::new();
    ctx.create_department("MD", "Media").await;
    let keep = ctx.create_member("Keep Me", "keep@example.com", "MD").await;
    let drop = ctx.create_member("Drop Me", "drop@example.com", "MD").await;
    ctx.members
        .bulk_update_status(&[keep.id.clone(), drop.id.clone()], MemberStatus::Active)
        .await
        .unwrap();

    ctx.members.delete_member(&drop.id).await.unwrap();

    let page = ctx
        .members
        .get_all_members(MemberListOptions::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.members[0].id, keep.id);

    let found = ctx
        .members
        .search_members(BTreeMap::from([("department".to_string(), json!("MD"))]))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let stats = ctx.members.get_member_stats().await.unwrap();
    assert_eq!(stats.total, 1);

    let leaderboard = ctx.members.get_leaderboard(10).await.unwrap();
    assert_eq!(leaderboard.len(), 1);
    assert_eq!(leaderboard[0].member.id, keep.id);

    let department = ctx.departments.get_department_by_code("MD").await.unwrap();
    assert_eq!(department.total_members, 1);
}

#[tokio::test]
async fn changing_department_moves_the_counters() {
    let ctx = TestContext::new();
    ctx.create_department("MD", "Media").await;
    ctx.create_department("ER", "External Relations").await;
    let member = ctx.create_member("Jane Doe", "jane@example.com", "MD").await;
    assert_eq!(
        ctx.departments
            .get_department_by_code("MD")
            .await
            .unwrap()
            .total_members,
        1
    );

    ctx.members
        .update_member(
            &member.id,
            UpdateMember {
                department: Some("ER".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let md = ctx.departments.get_department_by_code("MD").await.unwrap();
    let er = ctx.departments.get_department_by_code("ER").await.unwrap();
    assert_eq!(md.total_members, 0);
    assert_eq!(er.total_members, 1);

    let updated = ctx.members.get_member(&member.id).await.unwrap();
    assert_eq!(updated.department, "ER");
}

#[tokio::test]
async fn update_without_department_change_leaves_counters_alone() {
    let ctx = TestContext::new();
    ctx.create_department("MD", "Media").await;
    let member = ctx.create_member("Jane Doe", "jane@example.com", "MD").await;

    ctx.members
        .update_member(
            &member.id,
            UpdateMember {
                bio: Some("hello".to_string()),
                status: Some(MemberStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = ctx.members.get_member(&member.id).await.unwrap();
    assert_eq!(updated.bio, "hello");
    assert_eq!(updated.status, MemberStatus::Active);
    assert_eq!(
        ctx.departments
            .get_department_by_code("MD")
            .await
            .unwrap()
            .total_members,
        1
    );
}

#[tokio::test]
async fn add_points_increments_total_and_appends_one_ledger_entry() {
    let ctx = TestContext::new();
    let member = ctx.create_member("Jane Doe", "jane@example.com", "").await;

    ctx.members
        .add_points(&member.id, 50, "x", None)
        .await
        .unwrap();

    let updated = ctx.members.get_member(&member.id).await.unwrap();
    assert_eq!(updated.total_points, 50);

    let entries: Vec<PointsEntry> = ctx
        .db
        .find(
            collections::POINTS,
            Query::new().filter("memberId", member.id.clone()),
        )
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].points, 50);
    assert_eq!(entries[0].reason, "x");
    assert_eq!(entries[0].source_id, None);
}

#[tokio::test]
async fn add_points_to_a_missing_member_writes_no_ledger_entry() {
    let ctx = TestContext::new();
    let err = ctx
        .members
        .add_points("ghost", 50, "x", None)
        .await
        .unwrap_err();
    assert!(matches!(err, MemberError::NotFoundById { .. }));

    let entries: Vec<PointsEntry> = ctx
        .db
        .find(collections::POINTS, Query::new())
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn bulk_status_update_is_all_or_nothing() {
    let ctx = TestContext::new();
    let a = ctx.create_member("Member A", "a@example.com", "").await;
    let b = ctx.create_member("Member B", "b@example.com", "").await;
    let c = ctx.create_member("Member C", "c@example.com", "").await;

    let ids = vec![a.id.clone(), b.id.clone(), c.id.clone()];
    ctx.members
        .bulk_update_status(&ids, MemberStatus::Alumni)
        .await
        .unwrap();
    for id in &ids {
        assert_eq!(
            ctx.members.get_member(id).await.unwrap().status,
            MemberStatus::Alumni
        );
    }

    let with_ghost = vec![a.id.clone(), b.id.clone(), "ghost".to_string()];
    let err = ctx
        .members
        .bulk_update_status(&with_ghost, MemberStatus::Suspended)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MemberError::Store(StoreError::BatchFailed { .. })
    ));
    for id in &ids {
        assert_eq!(
            ctx.members.get_member(id).await.unwrap().status,
            MemberStatus::Alumni,
            "a failed batch must not leave partial state"
        );
    }
}

#[tokio::test]
async fn listing_paginates_after_fetching_the_full_filtered_set() {
    let ctx = TestContext::new();
    ctx.create_department("MD", "Media").await;
    for i in 0..25 {
        ctx.create_member(
            &format!("Member {:02}", i),
            &format!("member{:02}@example.com", i),
            "MD",
        )
        .await;
    }

    let page = ctx
        .members
        .get_all_members(MemberListOptions {
            page: 2,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.members.len(), 10);
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_more);

    let last = ctx
        .members
        .get_all_members(MemberListOptions {
            page: 3,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(last.members.len(), 5);
    assert!(!last.has_more);

    let searched = ctx
        .members
        .get_all_members(MemberListOptions {
            search: Some("member 07".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.total, 1);
    assert_eq!(searched.members[0].full_name, "Member 07");
}

#[tokio::test]
async fn search_members_composes_equality_filters() {
    let ctx = TestContext::new();
    ctx.create_department("MD", "Media").await;
    ctx.create_department("ER", "External Relations").await;
    ctx.create_member("In Media", "in.media@example.com", "MD").await;
    ctx.create_member("In Relations", "in.er@example.com", "ER").await;
    ctx.members
        .create_member(CreateMember {
            full_name: "Media Lead".to_string(),
            email: "lead@example.com".to_string(),
            department: Some("MD".to_string()),
            role: Some("lead".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let found = ctx
        .members
        .search_members(BTreeMap::from([
            ("department".to_string(), json!("MD")),
            ("role".to_string(), json!("member")),
        ]))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_name, "In Media");

    // Empty values are skipped rather than matching nothing.
    let all_md = ctx
        .members
        .search_members(BTreeMap::from([
            ("department".to_string(), json!("MD")),
            ("role".to_string(), json!("")),
        ]))
        .await
        .unwrap();
    assert_eq!(all_md.len(), 2);
}

#[tokio::test]
async fn members_are_found_by_skill_name() {
    let ctx = TestContext::new();
    ctx.members
        .create_member(CreateMember {
            full_name: "Reacter".to_string(),
            email: "react@example.com".to_string(),
            skills: Some(vec![skill("skill_react", "ReactJS", "intermediate")]),
            ..Default::default()
        })
        .await
        .unwrap();
    ctx.create_member("Plain", "plain@example.com", "").await;

    let found = ctx.members.get_members_by_skill("reactjs").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_name, "Reacter");
}

#[tokio::test]
async fn add_skill_is_a_set_union() {
    let ctx = TestContext::new();
    let member = ctx.create_member("Jane Doe", "jane@example.com", "").await;

    let entry = skill("skill_react", "ReactJS", "beginner");
    ctx.members.add_skill(&member.id, entry.clone()).await.unwrap();
    ctx.members.add_skill(&member.id, entry).await.unwrap();

    let updated = ctx.members.get_member(&member.id).await.unwrap();
    assert_eq!(updated.skills.len(), 1);

    // A different level is a different element under set semantics.
    ctx.members
        .add_skill(&member.id, skill("skill_react", "ReactJS", "advanced"))
        .await
        .unwrap();
    let updated = ctx.members.get_member(&member.id).await.unwrap();
    assert_eq!(updated.skills.len(), 2);
}

#[tokio::test]
async fn leaderboard_ranks_active_members_by_points() {
    let ctx = TestContext::new();
    let mut ids = Vec::new();
    for (name, email, points) in [
        ("First", "first@example.com", 30i64),
        ("Second", "second@example.com", 20),
        ("Third", "third@example.com", 10),
    ] {
        let member = ctx.create_member(name, email, "").await;
        ctx.members
            .add_points(&member.id, points, "seed", None)
            .await
            .unwrap();
        ids.push(member.id);
    }
    ctx.members
        .bulk_update_status(&ids, MemberStatus::Active)
        .await
        .unwrap();

    let top = ctx.members.get_leaderboard(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[0].member.full_name, "First");
    assert_eq!(top[1].rank, 2);
    assert_eq!(top[1].member.full_name, "Second");
}

#[tokio::test]
async fn export_rows_use_the_contracted_columns() {
    let ctx = TestContext::new();
    ctx.members
        .create_member(CreateMember {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("0912345678".to_string()),
            department: Some("MD".to_string()),
            skills: Some(vec![
                skill("skill_react", "ReactJS", "intermediate"),
                skill("skill_design", "UI/UX Design", "beginner"),
            ]),
            social_links: Some(BTreeMap::from([(
                "facebook".to_string(),
                "https://facebook.com/jane".to_string(),
            )])),
            ..Default::default()
        })
        .await
        .unwrap();

    let rows = ctx.members.export_members(&[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].skills, "ReactJS, UI/UX Design");
    assert_eq!(
        rows[0].social_links,
        r#"{"facebook":"https://facebook.com/jane"}"#
    );

    let value = serde_json::to_value(&rows[0]).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    for expected in [
        "Code",
        "Full Name",
        "Email",
        "Phone",
        "Department",
        "Role",
        "Status",
        "Join Date",
        "Total Points",
        "Skills",
        "Social Links",
    ] {
        assert!(keys.contains(&expected), "missing column {expected}");
    }
}

#[tokio::test]
async fn export_by_ids_fetches_exactly_those_members() {
    let ctx = TestContext::new();
    let a = ctx.create_member("Member A", "a@example.com", "").await;
    ctx.create_member("Member B", "b@example.com", "").await;

    let rows = ctx
        .members
        .export_members(&[a.id.clone(), "ghost".to_string()])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].full_name, "Member A");
}
