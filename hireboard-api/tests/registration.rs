#![cfg(feature = "test-staging")]

use rocket::http::Status;
use rocket::local::asynchronous::Client;
use rocket::tokio;
use serde_json::json;

use hireboard_api::mail::Mailer;
use hireboard_api::orm::testing::test_rocket;

/// Pulls the most recent verification code handed to the capturing mailer.
fn last_verification_code(client: &Client) -> String {
    let mailer = client
        .rocket()
        .state::<Mailer>()
        .expect("capturing mailer should be managed");
    let captured = mailer.captured();
    let mail = captured.last().expect("a mail should have been captured");
    assert_eq!(mail.template, "email_verification");
    mail.params["verification_code"]
        .as_str()
        .expect("verification code param")
        .to_string()
}

#[tokio::test]
async fn register_verify_and_end_up_logged_in() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client
        .post("/api/1/register")
        .json(&json!({
            "email": "Newcomer@Example.com",
            "password": "a fine passphrase"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    // Address is normalized to lowercase before anything is stored or sent.
    assert_eq!(body["email"], "newcomer@example.com");

    let code = last_verification_code(&client);

    let response = client
        .post("/api/1/verify-account")
        .json(&json!({
            "email": "newcomer@example.com",
            "code": code
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let session_cookie = response
        .cookies()
        .get("session")
        .expect("verification logs the new user in")
        .clone()
        .into_owned();
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["email"], "newcomer@example.com");

    let response = client
        .get("/api/1/my/adverts")
        .cookie(session_cookie)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    // The account is real now: password login works too.
    client.post("/api/1/logout").dispatch().await;
    let response = client
        .post("/api/1/login")
        .json(&json!({
            "email": "newcomer@example.com",
            "password": "a fine passphrase"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

#[tokio::test]
async fn registering_a_taken_email_conflicts() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client
        .post("/api/1/register")
        .json(&json!({
            "email": "testuser@example.com",
            "password": "whatever"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "Email already registered.");
}

#[tokio::test]
async fn reregistering_invalidates_the_previous_code() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    client
        .post("/api/1/register")
        .json(&json!({
            "email": "twice@example.com",
            "password": "first password"
        }))
        .dispatch()
        .await;
    let first_code = last_verification_code(&client);

    client
        .post("/api/1/register")
        .json(&json!({
            "email": "twice@example.com",
            "password": "second password"
        }))
        .dispatch()
        .await;
    let second_code = last_verification_code(&client);
    assert_ne!(first_code, second_code);

    // The replaced code is dead.
    let response = client
        .post("/api/1/verify-account")
        .json(&json!({
            "email": "twice@example.com",
            "code": first_code
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // The fresh code converts, carrying the second password.
    let response = client
        .post("/api/1/verify-account")
        .json(&json!({
            "email": "twice@example.com",
            "code": second_code
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    client.post("/api/1/logout").dispatch().await;
    let response = client
        .post("/api/1/login")
        .json(&json!({
            "email": "twice@example.com",
            "password": "second password"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

#[tokio::test]
async fn bogus_code_creates_no_account() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    client
        .post("/api/1/register")
        .json(&json!({
            "email": "hopeful@example.com",
            "password": "pw"
        }))
        .dispatch()
        .await;

    let response = client
        .post("/api/1/verify-account")
        .json(&json!({
            "email": "hopeful@example.com",
            "code": "NOT-THE-CODE"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert!(response.cookies().get("session").is_none());
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "Invalid or expired verification code.");

    // No user was materialized, so login fails.
    let response = client
        .post("/api/1/login")
        .json(&json!({
            "email": "hopeful@example.com",
            "password": "pw"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    // Retrying the bogus code is just as dead; the flow is repeatable.
    let response = client
        .post("/api/1/verify-account")
        .json(&json!({
            "email": "hopeful@example.com",
            "code": "NOT-THE-CODE"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn registering_while_authenticated_conflicts() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client
        .post("/api/1/login")
        .json(&json!({
            "email": "testuser@example.com",
            "password": "admin"
        }))
        .dispatch()
        .await;
    let session_cookie = response
        .cookies()
        .get("session")
        .expect("Session cookie should be set")
        .clone()
        .into_owned();

    let response = client
        .post("/api/1/register")
        .cookie(session_cookie)
        .json(&json!({
            "email": "someone-else@example.com",
            "password": "pw"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}
