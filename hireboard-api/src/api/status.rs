//! API version 1 - Status endpoints
//!
//! Health check endpoint for monitoring the application's operational
//! state and availability.

use rocket::{Route, serde::json::Json};
use serde::Serialize;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
    version: &'static str,
    built: &'static str,
}

/// Health Status endpoint.
///
/// - **URL:** `/api/1/status`
/// - **Method:** `GET`
/// - **Purpose:** Returns the health status of the application
/// - **Authentication:** None required
#[rocket::get("/1/status")]
pub fn health_status() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        built: built_info::BUILT_TIME_UTC,
    })
}

pub fn routes() -> Vec<Route> {
    routes![health_status]
}
