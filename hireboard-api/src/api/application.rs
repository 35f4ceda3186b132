//! API endpoints for job applications.
//!
//! # Authorization Rules
//! - Anyone, signed in or not, may apply to an advert
//! - Viewing an advert's applications and deciding outcomes is restricted
//!   to the advert's owner with a hard 403

use chrono::Utc;
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, serde::json::json};
use serde::{Deserialize, Serialize};

use crate::DbConn;
use crate::api::{ErrorResponse, error_response, internal_error};
use crate::mail::{Mailer, OutboundEmail};
use crate::models::{ApplicationStatus, JobAdvert, JobApplication, NewJobApplication};
use crate::orm::job_advert::get_advert;
use crate::orm::job_application::{
    application_exists, applications_by_email, applications_for_advert, get_application,
    insert_application, set_application_status,
};
use crate::orm::pagination::Page;
use crate::session_guards::AuthenticatedUser;

/// Request payload for submitting an application. `resume` carries the
/// opaque reference to the externally stored upload.
#[derive(Deserialize)]
pub struct SubmitApplicationRequest {
    pub name: String,
    pub email: String,
    pub portfolio_url: Option<String>,
    pub resume: String,
}

/// Request payload for an outcome decision. Unknown status strings fail
/// body parsing; nothing unvetted reaches the database.
#[derive(Deserialize)]
pub struct DecisionRequest {
    pub status: ApplicationStatus,
}

#[derive(Serialize)]
pub struct DecisionResponse {
    pub message: String,
    pub application: JobApplication,
}

/// Apply endpoint.
///
/// - **URL:** `/api/1/adverts/<advert_id>/applications`
/// - **Method:** `POST`
/// - **Purpose:** Submits an application to an advert
/// - **Authentication:** None; applicants are identified by email
///
/// A second application with the same email for the same advert is turned
/// away with 409 before anything is written. The stored email is compared
/// exactly, case included.
#[post("/1/adverts/<advert_id>/applications", data = "<request>")]
pub async fn apply(
    db: DbConn,
    advert_id: i32,
    request: Json<SubmitApplicationRequest>,
) -> Result<status::Created<Json<JobApplication>>, status::Custom<Json<ErrorResponse>>> {
    let form = request.into_inner();

    db.run(move |conn| {
        match get_advert(conn, advert_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(error_response(Status::NotFound, "Job advert not found.")),
            Err(e) => {
                error!("Error loading advert: {:?}", e);
                return Err(internal_error());
            }
        }

        let duplicate = application_exists(conn, advert_id, &form.email).map_err(|e| {
            error!("Error checking for duplicate application: {:?}", e);
            internal_error()
        })?;
        if duplicate {
            return Err(error_response(
                Status::Conflict,
                "You have already applied for this job.",
            ));
        }

        let new_application = NewJobApplication {
            name: form.name,
            email: form.email,
            portfolio_url: form.portfolio_url,
            resume: form.resume,
            status: ApplicationStatus::Applied.as_str().to_string(),
            job_advert_id: advert_id,
            created_at: Utc::now().naive_utc(),
        };

        insert_application(conn, new_application)
            .map(|application| {
                let location_uri = format!("/api/1/adverts/{}", advert_id);
                status::Created::new(location_uri).body(Json(application))
            })
            .map_err(|e| {
                error!("Error storing application: {:?}", e);
                internal_error()
            })
    })
    .await
}

/// Advert Applications endpoint.
///
/// - **URL:** `/api/1/adverts/<advert_id>/applications?page=N`
/// - **Method:** `GET`
/// - **Purpose:** One page of an advert's applications
/// - **Authentication:** Required
/// - **Authorization:** Advert owner only
#[get("/1/adverts/<advert_id>/applications?<page>")]
pub async fn advert_applications(
    db: DbConn,
    auth_user: AuthenticatedUser,
    advert_id: i32,
    page: Option<i64>,
) -> Result<Json<Page<JobApplication>>, status::Custom<Json<ErrorResponse>>> {
    let user_id = auth_user.user.id;

    db.run(move |conn| {
        let advert = match get_advert(conn, advert_id) {
            Ok(Some(advert)) => advert,
            Ok(None) => return Err(error_response(Status::NotFound, "Job advert not found.")),
            Err(e) => {
                error!("Error loading advert: {:?}", e);
                return Err(internal_error());
            }
        };

        if advert.created_by != user_id {
            return Err(error_response(
                Status::Forbidden,
                "You do not have permission to view these applications.",
            ));
        }

        applications_for_advert(conn, advert_id, page)
            .map(Json)
            .map_err(|e| {
                error!("Error listing applications: {:?}", e);
                internal_error()
            })
    })
    .await
}

/// Decision endpoint.
///
/// - **URL:** `/api/1/applications/<application_id>/decision`
/// - **Method:** `POST`
/// - **Purpose:** Moves an application to a new status
/// - **Authentication:** Required
/// - **Authorization:** Owner of the owning advert only; a non-owner gets
///   403 and the status is left untouched
///
/// A move to REJECTED notifies the applicant by email with the job title
/// and company name; other outcomes are silent.
#[post("/1/applications/<application_id>/decision", data = "<request>")]
pub async fn decide(
    db: DbConn,
    mailer: &State<Mailer>,
    auth_user: AuthenticatedUser,
    application_id: i32,
    request: Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, status::Custom<Json<ErrorResponse>>> {
    let user_id = auth_user.user.id;
    let new_status = request.status;

    let (application, advert): (JobApplication, JobAdvert) = db
        .run(move |conn| {
            let application = match get_application(conn, application_id) {
                Ok(Some(application)) => application,
                Ok(None) => {
                    return Err(error_response(Status::NotFound, "Job application not found."));
                }
                Err(e) => {
                    error!("Error loading application: {:?}", e);
                    return Err(internal_error());
                }
            };

            let advert = match get_advert(conn, application.job_advert_id) {
                Ok(Some(advert)) => advert,
                Ok(None) => {
                    error!("application {} points at a missing advert", application.id);
                    return Err(internal_error());
                }
                Err(e) => {
                    error!("Error loading advert: {:?}", e);
                    return Err(internal_error());
                }
            };

            if advert.created_by != user_id {
                return Err(error_response(
                    Status::Forbidden,
                    "You do not have permission to change the status of this application.",
                ));
            }

            let updated = set_application_status(conn, application_id, new_status).map_err(|e| {
                error!("Error updating application status: {:?}", e);
                internal_error()
            })?;

            Ok((updated, advert))
        })
        .await?;

    if new_status == ApplicationStatus::Rejected {
        mailer
            .send(OutboundEmail {
                subject: format!("Application outcome for {}", advert.title),
                to: vec![application.email.clone()],
                template: "job_application_update".to_string(),
                params: json!({
                    "applicant_name": application.name,
                    "job_title": advert.title,
                    "company_name": advert.company_name,
                }),
            })
            .await;
    }

    Ok(Json(DecisionResponse {
        message: format!(
            "Application status updated successfully to {}.",
            new_status.as_str()
        ),
        application,
    }))
}

/// My Applications endpoint.
///
/// - **URL:** `/api/1/my/applications?page=N`
/// - **Method:** `GET`
/// - **Purpose:** One page of applications submitted under the caller's
///   email address
/// - **Authentication:** Required
#[get("/1/my/applications?<page>")]
pub async fn my_applications(
    db: DbConn,
    auth_user: AuthenticatedUser,
    page: Option<i64>,
) -> Result<Json<Page<JobApplication>>, status::Custom<Json<ErrorResponse>>> {
    let user_email = auth_user.user.email.clone();
    db.run(move |conn| applications_by_email(conn, &user_email, page))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error listing own applications: {:?}", e);
            internal_error()
        })
}

pub fn routes() -> Vec<Route> {
    routes![
        apply,
        advert_applications,
        decide,
        my_applications
    ]
}
