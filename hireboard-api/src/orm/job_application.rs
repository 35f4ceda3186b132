//! Database operations for job applications.

use diesel::prelude::*;

use crate::models::{ApplicationStatus, JobApplication, NewJobApplication};
use crate::orm::db::last_insert_rowid;
use crate::orm::pagination::{PAGE_SIZE, Page, clamp_page, offset_for, total_pages};

/// Whether an application with this email already exists for the advert.
/// Exact, case-sensitive match on the stored email.
pub fn application_exists(
    conn: &mut SqliteConnection,
    advert_id: i32,
    applicant_email: &str,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::job_applications::dsl::*;

    let count: i64 = job_applications
        .filter(job_advert_id.eq(advert_id))
        .filter(email.eq(applicant_email))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

pub fn insert_application(
    conn: &mut SqliteConnection,
    new_application: NewJobApplication,
) -> Result<JobApplication, diesel::result::Error> {
    use crate::schema::job_applications::dsl::*;

    diesel::insert_into(job_applications)
        .values(&new_application)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    job_applications
        .filter(id.eq(last_id))
        .first::<JobApplication>(conn)
}

pub fn get_application(
    conn: &mut SqliteConnection,
    application_id: i32,
) -> Result<Option<JobApplication>, diesel::result::Error> {
    use crate::schema::job_applications::dsl::*;
    job_applications
        .filter(id.eq(application_id))
        .first::<JobApplication>(conn)
        .optional()
}

/// One page of an advert's applications, in submission order.
pub fn applications_for_advert(
    conn: &mut SqliteConnection,
    advert_id: i32,
    requested_page: Option<i64>,
) -> Result<Page<JobApplication>, diesel::result::Error> {
    use crate::schema::job_applications::dsl::*;

    let total_items: i64 = job_applications
        .filter(job_advert_id.eq(advert_id))
        .count()
        .get_result(conn)?;
    let pages = total_pages(total_items, PAGE_SIZE);
    let page = clamp_page(requested_page, pages);

    let items = job_applications
        .filter(job_advert_id.eq(advert_id))
        .order(id.asc())
        .limit(PAGE_SIZE)
        .offset(offset_for(page, PAGE_SIZE))
        .load::<JobApplication>(conn)?;

    Ok(Page {
        items,
        page,
        total_pages: pages,
        total_items,
    })
}

/// One page of the applications submitted under an email address, in
/// submission order.
pub fn applications_by_email(
    conn: &mut SqliteConnection,
    applicant_email: &str,
    requested_page: Option<i64>,
) -> Result<Page<JobApplication>, diesel::result::Error> {
    use crate::schema::job_applications::dsl::*;

    let total_items: i64 = job_applications
        .filter(email.eq(applicant_email))
        .count()
        .get_result(conn)?;
    let pages = total_pages(total_items, PAGE_SIZE);
    let page = clamp_page(requested_page, pages);

    let items = job_applications
        .filter(email.eq(applicant_email))
        .order(id.asc())
        .limit(PAGE_SIZE)
        .offset(offset_for(page, PAGE_SIZE))
        .load::<JobApplication>(conn)?;

    Ok(Page {
        items,
        page,
        total_pages: pages,
        total_items,
    })
}

/// Stores a new status for an application and returns the updated row.
/// Input is already a member of the closed status set by the time it
/// reaches this layer.
pub fn set_application_status(
    conn: &mut SqliteConnection,
    application_id: i32,
    new_status: ApplicationStatus,
) -> Result<JobApplication, diesel::result::Error> {
    use crate::schema::job_applications::dsl::*;

    diesel::update(job_applications.filter(id.eq(application_id)))
        .set(status.eq(new_status.as_str()))
        .execute(conn)?;

    job_applications
        .filter(id.eq(application_id))
        .first::<JobApplication>(conn)
}
