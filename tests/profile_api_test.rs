mod common;

use axum::http::{Method, StatusCode};
use common::{days_from_start, token_for, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn identity_without_profile_is_anonymous() {
    let app = TestApp::new();
    let token = token_for(Uuid::new_v4());

    let (status, body) = app.get("/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "anonymous");
    assert!(body.get("company").is_none());

    let (status, _) = app.send(Method::GET, "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn an_identity_holds_one_profile_kind() {
    let app = TestApp::new();
    let token = app.company("Acme").await;

    let (status, body) = app.get("/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "company");
    assert_eq!(body["company"]["name"], "Acme");

    let (status, body) = app
        .post(
            "/api/candidates",
            &token,
            json!({ "phone": "+351 910 000 000", "location": "Porto" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (status, _) = app
        .post(
            "/api/companies",
            &token,
            json!({
                "name": "Acme again",
                "description": "Second try",
                "location": "Lisbon",
                "phone": "+351 210 000 001"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn registration_payloads_are_validated() {
    let app = TestApp::new();
    let token = token_for(Uuid::new_v4());

    let (status, body) = app
        .post(
            "/api/companies",
            &token,
            json!({
                "name": "",
                "description": "Widgets",
                "location": "Lisbon",
                "phone": "+351 210 000 000 000 000 000",
                "website": "not a url"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["name"].is_array(), "{body}");
    assert!(body["fields"]["phone"].is_array(), "{body}");
    assert!(body["fields"]["website"].is_array(), "{body}");

    let (_, me) = app.get("/api/me", Some(&token)).await;
    assert_eq!(me["role"], "anonymous");
}

#[tokio::test]
async fn profiles_are_edited_in_place() {
    let app = TestApp::new();
    let company = app.company("Acme").await;
    let candidate = app.candidate().await;

    let (status, body) = app
        .patch(
            "/api/companies/me",
            &company,
            json!({ "location": "Madrid", "website": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["location"], "Madrid");
    assert_eq!(body["name"], "Acme");
    assert!(body["website"].is_null());

    let (status, body) = app
        .patch(
            "/api/candidates/me",
            &candidate,
            json!({ "skills": "rust, go", "resume": "resumes/jane.pdf" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["skills"], "rust, go");
    assert_eq!(body["resume"], "resumes/jane.pdf");
    assert_eq!(body["location"], "Porto");

    let (status, _) = app
        .patch("/api/companies/me", &candidate, json!({ "name": "Nope" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn removing_a_company_cascades_to_offers_and_applications() {
    let app = TestApp::new();
    let company = app.company("Acme").await;
    let candidate = app.candidate().await;
    let offer_id = app
        .publish(&company, "Designer", "graphic_design", &days_from_start(5))
        .await;
    app.apply(&candidate, &offer_id).await;

    let (status, _) = app.delete("/api/me", &company).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/offers/{offer_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, mine) = app.get("/api/applications/mine", Some(&candidate)).await;
    assert!(mine.as_array().unwrap().is_empty());

    let (_, me) = app.get("/api/me", Some(&company)).await;
    assert_eq!(me["role"], "anonymous");
    let (status, _) = app.delete("/api/me", &company).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn removing_a_candidate_drops_their_applications() {
    let app = TestApp::new();
    let company = app.company("Acme").await;
    let candidate = app.candidate().await;
    let offer_id = app
        .publish(&company, "Designer", "graphic_design", &days_from_start(5))
        .await;
    app.apply(&candidate, &offer_id).await;

    let (status, _) = app.delete("/api/me", &candidate).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, applications) = app
        .get(&format!("/api/offers/{offer_id}/applications"), Some(&company))
        .await;
    assert!(applications.as_array().unwrap().is_empty());
}
