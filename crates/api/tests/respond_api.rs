//! HTTP-level integration tests for the public respondent flow.
//!
//! Covers token resolution guards, saving answers with progress updates,
//! completion, capacity behaviour, and rate limiting.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, post_json_auth, put_json_auth, ROLE_ID_ADMIN};
use sqlx::PgPool;

use formpulse_api::config::RateLimitConfig;

/// Create a published form with an NPS question (order 1) and a
/// conditional follow-up (order 2, required when NPS < 7). Returns
/// `(admin_token, form_id, nps_question_id, followup_question_id)`.
async fn seed_published_form(pool: &PgPool) -> (String, i64, i64, i64) {
    let token = common::login_as(
        common::build_test_app(pool.clone()),
        pool,
        "admin1",
        ROLE_ID_ADMIN,
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/forms",
        &token,
        serde_json::json!({ "title": "Onboarding NPS" }),
    )
    .await;
    let json = body_json(response).await;
    let form_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}/questions"),
        &token,
        serde_json::json!({
            "question_type": "NPS",
            "text": "How likely are you to recommend us?",
            "required": true,
            "display_order": 1,
        }),
    )
    .await;
    let json = body_json(response).await;
    let nps_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}/questions"),
        &token,
        serde_json::json!({
            "question_type": "TEXT_LONG",
            "text": "What could we do better?",
            "required": true,
            "display_order": 2,
            "conditional_logic": { "depends_on": nps_id, "condition": "<", "value": 7 },
        }),
    )
    .await;
    let json = body_json(response).await;
    let followup_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}/publish"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    (token, form_id, nps_id, followup_id)
}

/// Mint a response link for a form, returning the opaque token.
async fn mint_token(pool: &PgPool, admin_token: &str, form_id: i64) -> String {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}/responses"),
        admin_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Resolution guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolve_happy_path(pool: PgPool) {
    let (admin_token, form_id, _nps_id, _followup_id) = seed_published_form(&pool).await;
    let token = mint_token(&pool, &admin_token, form_id).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/respond/{token}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["form"]["title"], "Onboarding NPS");
    assert_eq!(json["data"]["progress"], 0);

    let questions = json["data"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["question_type"], "NPS");
    assert_eq!(questions[0]["currently_required"], true);
    // The follow-up's dependency is unanswered, so it is not yet required.
    assert_eq!(questions[1]["currently_required"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_token_returns_404(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/api/v1/respond/doesnotexist00000000000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TOKEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unpublished_form_returns_403(pool: PgPool) {
    let (admin_token, form_id, _nps_id, _followup_id) = seed_published_form(&pool).await;
    let token = mint_token(&pool, &admin_token, form_id).await;

    // Pause the form after minting.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}/pause"),
        &admin_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/respond/{token}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORM_UNAVAILABLE");
}

/// Expiry wins over publication state and reports 410.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_form_returns_410(pool: PgPool) {
    let (admin_token, form_id, _nps_id, _followup_id) = seed_published_form(&pool).await;
    let token = mint_token(&pool, &admin_token, form_id).await;

    // Backdate the deadline, then also pause: expiry must still win.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}"),
        &admin_token,
        serde_json::json!({ "expires_at": "2020-01-01T00:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}/pause"),
        &admin_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/respond/{token}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::GONE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORM_EXPIRED");
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_saves_answers_and_progress(pool: PgPool) {
    let (admin_token, form_id, nps_id, followup_id) = seed_published_form(&pool).await;
    let token = mint_token(&pool, &admin_token, form_id).await;

    // Save a detractor score only: one of two questions answered.
    let body = serde_json::json!({
        "answers": { nps_id.to_string(): 5 },
        "completed": false,
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{token}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "IN_PROGRESS");
    assert_eq!(json["data"]["progress"], 50);

    // Resolve echoes the saved answer and flips the conditional follow-up
    // to required (5 < 7).
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{token}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["answers"][nps_id.to_string()], 5);
    assert_eq!(json["data"]["progress"], 50);
    let questions = json["data"]["questions"].as_array().unwrap();
    let followup = questions
        .iter()
        .find(|q| q["id"] == followup_id)
        .expect("follow-up present");
    assert_eq!(followup["currently_required"], true);

    // Each batch is the full answer set: one that carries only the
    // follow-up clears the saved score, and progress says so.
    let body = serde_json::json!({
        "answers": { followup_id.to_string(): "Faster onboarding" },
        "completed": false,
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{token}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress"], 50);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{token}"),
    )
    .await;
    let json = body_json(response).await;
    assert!(json["data"]["answers"][nps_id.to_string()].is_null());
    assert_eq!(
        json["data"]["answers"][followup_id.to_string()],
        "Faster onboarding"
    );

    // Complete with both answers in the batch.
    let body = serde_json::json!({
        "answers": {
            nps_id.to_string(): 5,
            followup_id.to_string(): "Faster onboarding",
        },
        "completed": true,
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{token}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "COMPLETED");
    assert_eq!(json["data"]["progress"], 100);

    // The committed answer rows back the reported progress: the score is
    // still stored and feeds the aggregate.
    let response = common::get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/dashboard",
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let questions = json["data"][0]["questions"].as_array().unwrap();
    let nps = questions
        .iter()
        .find(|q| q["question_id"] == nps_id)
        .expect("score aggregated");
    assert_eq!(nps["total"], 1);
    assert_eq!(nps["buckets"][5]["count"], 1);

    // A completed response rejects further writes.
    let body = serde_json::json!({ "answers": { nps_id.to_string(): 9 } });
    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/respond/{token}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_COMPLETED");
}

/// Null clears a saved answer and progress drops accordingly.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_null_clears_answer(pool: PgPool) {
    let (admin_token, form_id, nps_id, _followup_id) = seed_published_form(&pool).await;
    let token = mint_token(&pool, &admin_token, form_id).await;

    let body = serde_json::json!({ "answers": { nps_id.to_string(): 8 } });
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{token}"),
        body,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress"], 50);

    let body = serde_json::json!({ "answers": { nps_id.to_string(): null } });
    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/respond/{token}"),
        body,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress"], 0);
}

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

/// Capacity blocks new resolutions but an in-flight response may still
/// complete.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_capacity_blocks_resolution_not_submission(pool: PgPool) {
    let (admin_token, form_id, nps_id, _followup_id) = seed_published_form(&pool).await;

    // Cap at one completed response.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/forms/{form_id}"),
        &admin_token,
        serde_json::json!({ "max_responses": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let first = mint_token(&pool, &admin_token, form_id).await;
    let second = mint_token(&pool, &admin_token, form_id).await;

    // Both respondents start before anyone finishes.
    for token in [&first, &second] {
        let response = get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/respond/{token}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // First completes, filling the form.
    let body = serde_json::json!({
        "answers": { nps_id.to_string(): 9 },
        "completed": true,
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{first}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Second can no longer resolve the form...
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/respond/{second}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORM_FULL");

    // ...but their submission still lands: the write path does not
    // re-check capacity.
    let body = serde_json::json!({
        "answers": { nps_id.to_string(): 4 },
        "completed": true,
    });
    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/respond/{second}"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "COMPLETED");
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rate_limit_returns_429(pool: PgPool) {
    let (admin_token, form_id, _nps_id, _followup_id) = seed_published_form(&pool).await;
    let token = mint_token(&pool, &admin_token, form_id).await;

    let mut config = common::test_config();
    config.rate_limit = RateLimitConfig {
        max_requests: 2,
        window_secs: 60,
    };
    // One app instance so all requests share the same limiter.
    let app = common::build_test_app_with_config(pool, config);

    for _ in 0..2 {
        let response = get(app.clone(), &format!("/api/v1/respond/{token}")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(app, &format!("/api/v1/respond/{token}")).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");
}
