#![cfg(feature = "test-staging")]

use rocket::http::Status;
use rocket::tokio;
use serde_json::json;

use hireboard_api::orm::testing::test_rocket;

#[tokio::test]
async fn logout_revokes_the_session() {
    let client = rocket::local::asynchronous::Client::tracked(test_rocket())
        .await
        .unwrap();

    let response = client
        .post("/api/1/login")
        .json(&json!({
            "email": "testuser@example.com",
            "password": "admin"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let session_cookie = response
        .cookies()
        .get("session")
        .expect("Session cookie should be set")
        .clone()
        .into_owned();

    // A protected route works while the session lives.
    let response = client
        .get("/api/1/my/adverts")
        .cookie(session_cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post("/api/1/logout")
        .cookie(session_cookie.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["message"], "You have been logged out.");

    // The revoked token no longer authenticates, even if replayed.
    let response = client
        .get("/api/1/my/adverts")
        .cookie(session_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[tokio::test]
async fn logout_without_a_session_still_succeeds() {
    let client = rocket::local::asynchronous::Client::tracked(test_rocket())
        .await
        .unwrap();

    let response = client.post("/api/1/logout").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}
