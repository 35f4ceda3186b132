#![cfg(feature = "test-staging")]

use rocket::http::Status;
use rocket::local::asynchronous::Client;
use rocket::tokio;

use bistro_api::testing::test_rocket;

#[tokio::test]
async fn lists_every_restaurant() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/restaurants").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();

    let restaurants = body["restaurants"].as_array().unwrap();
    assert_eq!(restaurants.len(), 3);
    assert_eq!(restaurants[0]["name"], "Casa Piccola");
    assert_eq!(restaurants[1]["cuisine"], "nigerian");
}

#[tokio::test]
async fn fetches_one_restaurant_by_id() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/restaurants/2").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["name"], "Mama Put");
    assert_eq!(body["rating"], 4.8);
}

#[tokio::test]
async fn missing_restaurant_is_404() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/restaurants/999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "Restaurant not found.");
}

#[tokio::test]
async fn health_check_reports_running() {
    let client = Client::tracked(test_rocket()).await.unwrap();

    let response = client.get("/api/1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(body["status"], "running");
}
