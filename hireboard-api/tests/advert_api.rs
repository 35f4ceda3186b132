#![cfg(feature = "test-staging")]

use rocket::http::Status;
use rocket::local::asynchronous::Client;
use rocket::tokio;
use serde_json::json;

use hireboard_api::orm::testing::test_rocket;

/// Helper to login with specific credentials and get the session cookie
async fn login(client: &Client, email: &str, password: &str) -> rocket::http::Cookie<'static> {
    let response = client
        .post("/api/1/login")
        .json(&json!({ "email": email, "password": password }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    response
        .cookies()
        .get("session")
        .expect("Session cookie should be set")
        .clone()
        .into_owned()
}

fn advert_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "company_name": "Acme Corp",
        "experience_level": "mid_level",
        "employment_type": "full_time",
        "description": "Design and run backend services.",
        "job_type": "remote",
        "location": "Berlin",
        "deadline": "2030-01-01T00:00:00",
        "skills": "rust,sql"
    })
}

/// Helper to create an advert and return its id
async fn create_advert(
    client: &Client,
    cookie: &rocket::http::Cookie<'static>,
    title: &str,
) -> i64 {
    let response = client
        .post("/api/1/adverts")
        .cookie(cookie.clone())
        .json(&advert_body(title))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let body: serde_json::Value = response.into_json().await.unwrap();
    body["id"].as_i64().expect("advert id")
}

#[tokio::test]
async fn creating_requires_authentication() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client
        .post("/api/1/adverts")
        .json(&advert_body("Unauthenticated"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn create_and_fetch_an_advert() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    let owner = login(&client, "owner@example.com", "ownerpass").await;

    let advert_id = create_advert(&client, &owner, "Backend Engineer").await;

    let response = client
        .get(format!("/api/1/adverts/{}", advert_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["title"], "Backend Engineer");
    assert_eq!(body["company_name"], "Acme Corp");
    assert_eq!(body["is_published"], true);
    assert_eq!(body["total_applicants"], 0);
}

#[tokio::test]
async fn fetching_a_missing_advert_is_404() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/adverts/9999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn unknown_enum_values_fail_body_parsing() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    let owner = login(&client, "owner@example.com", "ownerpass").await;

    let mut body = advert_body("Bad enum");
    body["experience_level"] = json!("wizard_level");

    let response = client
        .post("/api/1/adverts")
        .cookie(owner)
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}

#[tokio::test]
async fn only_the_owner_may_update() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    let owner = login(&client, "owner@example.com", "ownerpass").await;
    let advert_id = create_advert(&client, &owner, "Original title").await;
    client.post("/api/1/logout").cookie(owner.clone()).dispatch().await;

    let rival = login(&client, "rival@example.com", "rivalpass").await;
    let mut update = advert_body("Hijacked title");
    update.as_object_mut().unwrap().remove("is_published");

    let response = client
        .put(format!("/api/1/adverts/{}", advert_id))
        .cookie(rival)
        .json(&update)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "You do not have permission to edit this advert.");

    // Nothing changed.
    let response = client
        .get(format!("/api/1/adverts/{}", advert_id))
        .dispatch()
        .await;
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["title"], "Original title");
}

#[tokio::test]
async fn the_owner_updates_everything_but_publication() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    let owner = login(&client, "owner@example.com", "ownerpass").await;
    let advert_id = create_advert(&client, &owner, "Original title").await;

    let response = client
        .put(format!("/api/1/adverts/{}", advert_id))
        .cookie(owner.clone())
        .json(&json!({
            "title": "Revised title",
            "company_name": "Acme Corp",
            "experience_level": "senior_level",
            "employment_type": "contract",
            "description": "Now with more scope.",
            "job_type": "hybrid",
            "location": "Munich",
            "deadline": "2031-06-01T00:00:00",
            "skills": "rust,kafka"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["title"], "Revised title");
    assert_eq!(body["experience_level"], "senior_level");
    assert_eq!(body["location"], "Munich");
    // Still published; the update payload cannot touch it.
    assert_eq!(body["is_published"], true);
}

#[tokio::test]
async fn only_the_owner_may_delete() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    let owner = login(&client, "owner@example.com", "ownerpass").await;
    let advert_id = create_advert(&client, &owner, "Short lived").await;
    client.post("/api/1/logout").cookie(owner.clone()).dispatch().await;

    let rival = login(&client, "rival@example.com", "rivalpass").await;
    let response = client
        .delete(format!("/api/1/adverts/{}", advert_id))
        .cookie(rival.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    client.post("/api/1/logout").cookie(rival).dispatch().await;

    let owner = login(&client, "owner@example.com", "ownerpass").await;
    let response = client
        .delete(format!("/api/1/adverts/{}", advert_id))
        .cookie(owner)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get(format!("/api/1/adverts/{}", advert_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn publishing_makes_a_draft_visible() {
    let client = Client::tracked(test_rocket()).await.unwrap();
    let owner = login(&client, "owner@example.com", "ownerpass").await;

    let mut draft = advert_body("Quiet draft");
    draft["is_published"] = json!(false);
    let response = client
        .post("/api/1/adverts")
        .cookie(owner.clone())
        .json(&draft)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let body: serde_json::Value = response.into_json().await.unwrap();
    let advert_id = body["id"].as_i64().unwrap();
    assert_eq!(body["is_published"], false);

    // Drafts are invisible to the public listing.
    let response = client.get("/api/1/adverts").dispatch().await;
    let listing: serde_json::Value = response.into_json().await.unwrap();
    assert!(
        listing["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|advert| advert["id"].as_i64() != Some(advert_id))
    );

    let response = client
        .post(format!("/api/1/adverts/{}/publish", advert_id))
        .cookie(owner)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client.get("/api/1/adverts").dispatch().await;
    let listing: serde_json::Value = response.into_json().await.unwrap();
    assert!(
        listing["items"]
            .as_array()
            .unwrap()
            .iter()
            .any(|advert| advert["id"].as_i64() == Some(advert_id))
    );
}

#[tokio::test]
async fn my_adverts_shows_only_the_callers_rows() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let owner = login(&client, "owner@example.com", "ownerpass").await;
    create_advert(&client, &owner, "Owner role A").await;
    create_advert(&client, &owner, "Owner role B").await;
    client.post("/api/1/logout").cookie(owner.clone()).dispatch().await;

    let rival = login(&client, "rival@example.com", "rivalpass").await;
    create_advert(&client, &rival, "Rival role").await;

    let response = client
        .get("/api/1/my/adverts")
        .cookie(rival)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["items"][0]["title"], "Rival role");
}
