//! API endpoints for job adverts.
//!
//! # Authorization Rules
//! - Anyone may read adverts, list active ones, and search
//! - Creating requires an authenticated user, who becomes the owner
//! - Updating, publishing, and deleting are owner-only; a non-owner gets a
//!   hard 403 and no mutation takes place

use chrono::{NaiveDateTime, Utc};
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::DbConn;
use crate::api::{ErrorResponse, MessageResponse, error_response, internal_error};
use crate::models::{
    EmploymentType, ExperienceLevel, JobAdvert, JobAdvertChanges, LocationType, NewJobAdvert,
};
use crate::orm::job_advert::{
    adverts_by_owner, count_applications, delete_advert, get_advert, insert_advert,
    list_active_adverts, publish_advert, search_active_adverts, update_advert,
};
use crate::orm::pagination::Page;
use crate::session_guards::AuthenticatedUser;

/// Request payload for creating a new advert. Enum fields reject unknown
/// values at the body boundary.
#[derive(Deserialize)]
pub struct CreateAdvertRequest {
    pub title: String,
    pub company_name: String,
    pub experience_level: ExperienceLevel,
    pub employment_type: EmploymentType,
    pub description: String,
    pub job_type: LocationType,
    pub location: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    pub deadline: NaiveDateTime,
    pub skills: Option<String>,
}

fn default_published() -> bool {
    true
}

/// Request payload for updating an advert. Publication state is absent on
/// purpose; publishing is a separate one-way operation.
#[derive(Deserialize)]
pub struct UpdateAdvertRequest {
    pub title: String,
    pub company_name: String,
    pub experience_level: ExperienceLevel,
    pub employment_type: EmploymentType,
    pub description: String,
    pub job_type: LocationType,
    pub location: Option<String>,
    pub deadline: NaiveDateTime,
    pub skills: Option<String>,
}

#[derive(Serialize)]
pub struct AdvertDetail {
    #[serde(flatten)]
    pub advert: JobAdvert,
    pub total_applicants: i64,
}

/// Create Advert endpoint.
///
/// - **URL:** `/api/1/adverts`
/// - **Method:** `POST`
/// - **Purpose:** Creates a job advert owned by the caller
/// - **Authentication:** Required
#[post("/1/adverts", data = "<request>")]
pub async fn create_advert(
    db: DbConn,
    auth_user: AuthenticatedUser,
    request: Json<CreateAdvertRequest>,
) -> Result<status::Created<Json<JobAdvert>>, status::Custom<Json<ErrorResponse>>> {
    let form = request.into_inner();
    let new_advert = NewJobAdvert {
        title: form.title,
        company_name: form.company_name,
        experience_level: form.experience_level.as_str().to_string(),
        employment_type: form.employment_type.as_str().to_string(),
        description: form.description,
        job_type: form.job_type.as_str().to_string(),
        location: form.location,
        is_published: form.is_published,
        deadline: form.deadline,
        skills: form.skills,
        created_by: auth_user.user.id,
        created_at: Utc::now().naive_utc(),
    };

    let advert = db
        .run(move |conn| insert_advert(conn, new_advert))
        .await
        .map_err(|e| {
            error!("Error creating advert: {:?}", e);
            internal_error()
        })?;

    let location_uri = format!("/api/1/adverts/{}", advert.id);
    Ok(status::Created::new(location_uri).body(Json(advert)))
}

/// Get Advert endpoint.
///
/// - **URL:** `/api/1/adverts/<advert_id>`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves one advert with its applicant count
/// - **Authentication:** None
#[get("/1/adverts/<advert_id>")]
pub async fn get_advert_detail(
    db: DbConn,
    advert_id: i32,
) -> Result<Json<AdvertDetail>, status::Custom<Json<ErrorResponse>>> {
    db.run(move |conn| {
        let advert = match get_advert(conn, advert_id) {
            Ok(Some(advert)) => advert,
            Ok(None) => return Err(error_response(Status::NotFound, "Job advert not found.")),
            Err(e) => {
                error!("Error loading advert: {:?}", e);
                return Err(internal_error());
            }
        };

        let total_applicants = count_applications(conn, advert_id).map_err(|e| {
            error!("Error counting applications: {:?}", e);
            internal_error()
        })?;

        Ok(Json(AdvertDetail {
            advert,
            total_applicants,
        }))
    })
    .await
}

/// List Adverts endpoint.
///
/// - **URL:** `/api/1/adverts?page=N`
/// - **Method:** `GET`
/// - **Purpose:** One page of active adverts, newest first
/// - **Authentication:** None
///
/// Active means published with the deadline not yet passed. Out-of-range
/// page numbers clamp to the nearest valid page.
#[get("/1/adverts?<page>")]
pub async fn list_adverts(
    db: DbConn,
    page: Option<i64>,
) -> Result<Json<Page<JobAdvert>>, status::Custom<Json<ErrorResponse>>> {
    db.run(move |conn| list_active_adverts(conn, page))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error listing adverts: {:?}", e);
            internal_error()
        })
}

/// Search Adverts endpoint.
///
/// - **URL:** `/api/1/adverts/search?keyword=..&location=..&page=N`
/// - **Method:** `GET`
/// - **Purpose:** Keyword and location search over active adverts
/// - **Authentication:** None
///
/// The keyword matches title, description, company name, or skills; the
/// location term narrows the result further. Both are case-insensitive
/// substring matches.
#[get("/1/adverts/search?<keyword>&<location>&<page>")]
pub async fn search_adverts(
    db: DbConn,
    keyword: Option<String>,
    location: Option<String>,
    page: Option<i64>,
) -> Result<Json<Page<JobAdvert>>, status::Custom<Json<ErrorResponse>>> {
    let keyword = keyword.filter(|k| !k.trim().is_empty());
    let location = location.filter(|l| !l.trim().is_empty());

    db.run(move |conn| {
        search_active_adverts(conn, keyword.as_deref(), location.as_deref(), page)
    })
    .await
    .map(Json)
    .map_err(|e| {
        error!("Error searching adverts: {:?}", e);
        internal_error()
    })
}

/// Update Advert endpoint.
///
/// - **URL:** `/api/1/adverts/<advert_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces the advert's editable fields
/// - **Authentication:** Required
/// - **Authorization:** Owner only; non-owners get 403 and nothing changes
#[put("/1/adverts/<advert_id>", data = "<request>")]
pub async fn update_advert_fields(
    db: DbConn,
    auth_user: AuthenticatedUser,
    advert_id: i32,
    request: Json<UpdateAdvertRequest>,
) -> Result<Json<JobAdvert>, status::Custom<Json<ErrorResponse>>> {
    let user_id = auth_user.user.id;
    let form = request.into_inner();

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
                "You do not have permission to edit this advert.",
            ));
        }

        let changes = JobAdvertChanges {
            title: form.title,
            company_name: form.company_name,
            experience_level: form.experience_level.as_str().to_string(),
            employment_type: form.employment_type.as_str().to_string(),
            description: form.description,
            job_type: form.job_type.as_str().to_string(),
            location: form.location,
            deadline: form.deadline,
            skills: form.skills,
        };

        update_advert(conn, advert_id, changes).map(Json).map_err(|e| {
            error!("Error updating advert: {:?}", e);
            internal_error()
        })
    })
    .await
}

/// Publish Advert endpoint.
///
/// - **URL:** `/api/1/adverts/<advert_id>/publish`
/// - **Method:** `POST`
/// - **Purpose:** The one-way Draft -> Published transition
/// - **Authentication:** Required
/// - **Authorization:** Owner only
#[post("/1/adverts/<advert_id>/publish")]
pub async fn publish_advert_endpoint(
    db: DbConn,
    auth_user: AuthenticatedUser,
    advert_id: i32,
) -> Result<Json<MessageResponse>, status::Custom<Json<ErrorResponse>>> {
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
                "You do not have permission to edit this advert.",
            ));
        }

        publish_advert(conn, advert_id).map_err(|e| {
            error!("Error publishing advert: {:?}", e);
            internal_error()
        })?;

        Ok(Json(MessageResponse {
            message: "Job advert published.".to_string(),
        }))
    })
    .await
}

/// Delete Advert endpoint.
///
/// - **URL:** `/api/1/adverts/<advert_id>`
/// - **Method:** `DELETE`
/// - **Purpose:** Removes the advert and, by cascade, its applications
/// - **Authentication:** Required
/// - **Authorization:** Owner only; non-owners get 403 and nothing changes
#[delete("/1/adverts/<advert_id>")]
pub async fn delete_advert_endpoint(
    db: DbConn,
    auth_user: AuthenticatedUser,
    advert_id: i32,
) -> Result<Json<MessageResponse>, status::Custom<Json<ErrorResponse>>> {
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
                "You do not have permission to delete this advert.",
            ));
        }

        delete_advert(conn, advert_id).map_err(|e| {
            error!("Error deleting advert: {:?}", e);
            internal_error()
        })?;

        Ok(Json(MessageResponse {
            message: "Job advert deleted successfully.".to_string(),
        }))
    })
    .await
}

/// My Adverts endpoint.
///
/// - **URL:** `/api/1/my/adverts?page=N`
/// - **Method:** `GET`
/// - **Purpose:** One page of the caller's own adverts, active or not
/// - **Authentication:** Required
#[get("/1/my/adverts?<page>")]
pub async fn my_adverts(
    db: DbConn,
    auth_user: AuthenticatedUser,
    page: Option<i64>,
) -> Result<Json<Page<JobAdvert>>, status::Custom<Json<ErrorResponse>>> {
    let user_id = auth_user.user.id;
    db.run(move |conn| adverts_by_owner(conn, user_id, page))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error listing own adverts: {:?}", e);
            internal_error()
        })
}

pub fn routes() -> Vec<Route> {
    routes![
        create_advert,
        get_advert_detail,
        list_adverts,
        search_adverts,
        update_advert_fields,
        publish_advert_endpoint,
        delete_advert_endpoint,
        my_adverts
    ]
}
