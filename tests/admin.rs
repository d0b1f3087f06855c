mod common;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cv_tailor::types::{CreditAdjustment, CreditReason, SectionKind, UserListQuery};
use cv_tailor::ApiError;

use common::{harness, make_token, valid_token};

fn admin_token() -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    make_token(json!({"id": "admin-1", "role": "admin", "exp": exp}))
}

#[tokio::test]
async fn test_non_admin_is_refused_locally() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, Some(valid_token()));
    let err = h.client.admin().analytics().await.unwrap_err();

    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(err.user_message(), "Admin access required");
    // Still a valid session, just not an admin one
    assert!(h.stored_token().is_some());
}

#[tokio::test]
async fn test_analytics_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/analytics/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 120,
            "active_users_7d": 31,
            "total_cvs_generated": 402,
            "revenue_mtd": 99.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some(admin_token()));
    let summary = h.client.admin().analytics().await.unwrap();

    assert_eq!(summary.total_users(), Some(120));
    assert_eq!(summary.active_users_7d(), Some(31));
    assert_eq!(summary.fields.get("revenue_mtd"), Some(&json!(99.5)));
}

#[tokio::test]
async fn test_list_users_sends_paging_and_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/"))
        .and(query_param("skip", "50"))
        .and(query_param("limit", "25"))
        .and(query_param("search", "ada lovelace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u-1", "email": "ada@example.com", "name": "Ada", "topup_credits": 5}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/"))
        .and(query_param("skip", "0"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some(admin_token()));
    let admin = h.client.admin();

    let users = admin
        .list_users(&UserListQuery::page(50, 25).search("ada lovelace"))
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, "u-1");
    assert_eq!(users[0].topup_credits(), Some(5));

    let first_page = admin
        .list_users(&UserListQuery::page(0, 50).search("  "))
        .await
        .unwrap();
    assert!(first_page.is_empty());
}

#[tokio::test]
async fn test_user_detail_history_and_activity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "subscription_type": "free"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/u-1/credits/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9, "amount": 10, "reason": "Promo", "balance_after": 15}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/u-1/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cvs": [{"id": "c1"}],
            "applications": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/u-1/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "education": [{"id": "e1", "school": "Cambridge"}],
            "work_experience": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some(admin_token()));
    let admin = h.client.admin();

    let user = admin.user_detail("u-1").await.unwrap();
    assert_eq!(user.subscription_type(), Some("free"));

    let history = admin.credit_history("u-1").await.unwrap();
    assert_eq!(history[0].id, "9");
    assert_eq!(history[0].amount(), Some(10));
    assert_eq!(history[0].balance_after(), Some(15));

    let activity = admin.user_activity("u-1").await.unwrap();
    assert_eq!(activity.cvs_count(), 1);
    assert_eq!(activity.applications_count(), 0);

    let profile = admin.user_profile("u-1").await.unwrap();
    assert_eq!(profile.section(SectionKind::Education).len(), 1);
    assert!(profile.section(SectionKind::WorkExperience).is_empty());
}

#[tokio::test]
async fn test_adjust_credits_posts_reason() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/users/u-1/credits"))
        .and(body_json(json!({"amount": 20, "reason": "Refund", "notes": "failed export"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"new_balance": 25})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some(admin_token()));
    let admin = h.client.admin();

    let result = admin
        .adjust_credits(
            "u-1",
            &CreditAdjustment {
                amount: 20,
                reason: CreditReason::Refund,
                notes: Some("failed export".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(result, json!({"new_balance": 25}));

    let err = admin
        .adjust_credits(
            "u-1",
            &CreditAdjustment {
                amount: 0,
                reason: CreditReason::Correction,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_adjust_credits_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/users/u-1/credits"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Deduction exceeds balance"})),
        )
        .mount(&server)
        .await;

    let h = harness(&server, Some(admin_token()));
    let err = h
        .client
        .admin()
        .adjust_credits(
            "u-1",
            &CreditAdjustment {
                amount: -500,
                reason: CreditReason::Violation,
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Deduction exceeds balance");
}
