//! API version 1 route handlers, one module per resource.

pub mod advert;
pub mod application;
pub mod login;
pub mod logout;
pub mod password_reset;
pub mod register;
pub mod status;

use rocket::Route;
use rocket::http::Status;
use rocket::response::status as rocket_status;
use rocket::serde::json::Json;
use serde::Serialize;

/// Error payload returned by every endpoint on failure.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Plain acknowledgement payload for operations without a resource body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn error_response(
    status: Status,
    message: &str,
) -> rocket_status::Custom<Json<ErrorResponse>> {
    rocket_status::Custom(
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub(crate) fn internal_error() -> rocket_status::Custom<Json<ErrorResponse>> {
    error_response(Status::InternalServerError, "Internal server error")
}

/// Returns all routes defined across the API modules.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.append(&mut status::routes());
    routes.append(&mut register::routes());
    routes.append(&mut login::routes());
    routes.append(&mut logout::routes());
    routes.append(&mut password_reset::routes());
    routes.append(&mut advert::routes());
    routes.append(&mut application::routes());
    routes
}
