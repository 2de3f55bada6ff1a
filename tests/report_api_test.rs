mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{days_from_start, TestApp};
use serde_json::json;

#[tokio::test]
async fn category_counts_cover_every_category_and_sum_to_the_listing() {
    let app = TestApp::new();
    let company = app.company("Acme").await;
    app.publish(&company, "Rust developer", "software_development", &days_from_start(5))
        .await;
    app.publish(&company, "Go developer", "software_development", &days_from_start(5))
        .await;
    app.publish(&company, "Illustrator", "graphic_design", &days_from_start(5))
        .await;
    app.publish(&company, "Closing soon", "content_writing", &days_from_start(0))
        .await;
    app.clock.advance(Duration::days(1));

    let (status, counts) = app.get("/api/offers/by-category", None).await;
    assert_eq!(status, StatusCode::OK);
    let counts = counts.as_array().unwrap();
    assert_eq!(counts.len(), 4);

    let count_of = |key: &str| {
        counts
            .iter()
            .find(|entry| entry["category"] == key)
            .map(|entry| entry["count"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(count_of("software_development"), 2);
    assert_eq!(count_of("graphic_design"), 1);
    assert_eq!(count_of("content_writing"), 0);
    assert_eq!(count_of("digital_marketing"), 0);

    let total: u64 = counts.iter().map(|e| e["count"].as_u64().unwrap()).sum();
    let (_, listed) = app.get("/api/offers", None).await;
    assert_eq!(total as usize, listed.as_array().unwrap().len());
}

#[tokio::test]
async fn expiring_soon_is_a_window_sorted_by_deadline() {
    let app = TestApp::new();
    let company = app.company("Acme").await;
    app.publish(&company, "In six days", "software_development", &days_from_start(6))
        .await;
    app.publish(&company, "Today", "software_development", &days_from_start(0))
        .await;
    app.publish(&company, "In a month", "software_development", &days_from_start(30))
        .await;
    let hidden = app
        .publish(&company, "Deactivated", "software_development", &days_from_start(2))
        .await;
    app.patch(
        &format!("/api/offers/{hidden}"),
        &company,
        json!({ "is_active": false }),
    )
    .await;

    let (status, body) = app.get("/api/offers/expiring-soon", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Today", "In six days"]);

    let (_, narrow) = app.get("/api/offers/expiring-soon?days=0", None).await;
    assert_eq!(narrow.as_array().unwrap().len(), 1);

    let (_, wide) = app.get("/api/offers/expiring-soon?days=45", None).await;
    assert_eq!(wide.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn dashboard_counts_use_the_open_predicate() {
    let app = TestApp::new();
    let company = app.company("Acme").await;
    let rival = app.company("Globex").await;
    let candidate = app.candidate().await;

    let open = app
        .publish(&company, "Open role", "software_development", &days_from_start(5))
        .await;
    let closing = app
        .publish(&company, "Closing role", "graphic_design", &days_from_start(0))
        .await;
    app.publish(&rival, "Rival role", "graphic_design", &days_from_start(5))
        .await;
    app.apply(&candidate, &open).await;
    app.apply(&candidate, &closing).await;
    app.clock.advance(Duration::days(1));

    let (status, body) = app.get("/api/company/dashboard", Some(&company)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["stats"]["total_offers"], 2);
    assert_eq!(body["stats"]["active_offers"], 1);
    assert_eq!(body["stats"]["total_applications"], 2);

    let offers = body["offers"].as_array().unwrap();
    assert_eq!(offers.len(), 2);
    assert!(offers.iter().all(|o| o["application_count"] == 1));
    let closing_entry = offers.iter().find(|o| o["title"] == "Closing role").unwrap();
    assert_eq!(closing_entry["is_expired"], true);
    assert_eq!(body["applications"].as_array().unwrap().len(), 2);

    let (status, _) = app.get("/api/company/dashboard", Some(&candidate)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
