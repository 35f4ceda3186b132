/*
API version 1
*/

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::Serialize;

use crate::DbConn;
use crate::models::Restaurant;
use crate::orm::{get_restaurant, list_all_restaurants};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct Restaurants {
    pub restaurants: Vec<Restaurant>,
}

// GET all restaurants
#[rocket::get("/1/restaurants")]
pub async fn list_restaurants(
    db: DbConn,
) -> Result<Json<Restaurants>, status::Custom<Json<ErrorResponse>>> {
    db.run(|conn| list_all_restaurants(conn))
        .await
        .map(|restaurants| Json(Restaurants { restaurants }))
        .map_err(|e| {
            eprintln!("Error listing restaurants: {:?}", e);
            status::Custom(
                Status::InternalServerError,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })
}

// GET a single restaurant by id
#[rocket::get("/1/restaurants/<restaurant_id>")]
pub async fn get_restaurant_by_id(
    db: DbConn,
    restaurant_id: i32,
) -> Result<Json<Restaurant>, status::Custom<Json<ErrorResponse>>> {
    let found = db
        .run(move |conn| get_restaurant(conn, restaurant_id))
        .await
        .map_err(|e| {
            eprintln!("Error loading restaurant: {:?}", e);
            status::Custom(
                Status::InternalServerError,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?;

    found.map(Json).ok_or_else(|| {
        status::Custom(
            Status::NotFound,
            Json(ErrorResponse {
                error: "Restaurant not found.".to_string(),
            }),
        )
    })
}

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

#[rocket::get("/1/status")]
pub fn health_status() -> Json<HealthStatus> {
    Json(HealthStatus { status: "running" })
}

pub fn routes() -> Vec<Route> {
    routes![list_restaurants, get_restaurant_by_id, health_status]
}
