//! Database operations for job adverts.
//!
//! Listing and search only ever see "active" adverts: published rows whose
//! deadline has not passed, evaluated against the clock at query time.
//! Ownership checks live at the API layer; functions here trust their ids.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::models::{JobAdvert, JobAdvertChanges, NewJobAdvert};
use crate::orm::db::last_insert_rowid;
use crate::orm::pagination::{PAGE_SIZE, Page, clamp_page, offset_for, total_pages};
use crate::schema::{job_adverts, job_applications};

pub fn insert_advert(
    conn: &mut SqliteConnection,
    new_advert: NewJobAdvert,
) -> Result<JobAdvert, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;

    diesel::insert_into(job_adverts)
        .values(&new_advert)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    job_adverts.filter(id.eq(last_id)).first::<JobAdvert>(conn)
}

pub fn get_advert(
    conn: &mut SqliteConnection,
    advert_id: i32,
) -> Result<Option<JobAdvert>, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;
    job_adverts
        .filter(id.eq(advert_id))
        .first::<JobAdvert>(conn)
        .optional()
}

/// Applies an owner's edits and returns the updated row. Publication state
/// is untouched; see [`publish_advert`].
pub fn update_advert(
    conn: &mut SqliteConnection,
    advert_id: i32,
    changes: JobAdvertChanges,
) -> Result<JobAdvert, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;

    diesel::update(job_adverts.filter(id.eq(advert_id)))
        .set(&changes)
        .execute(conn)?;

    job_adverts.filter(id.eq(advert_id)).first::<JobAdvert>(conn)
}

/// The one-way Draft -> Published transition.
pub fn publish_advert(
    conn: &mut SqliteConnection,
    advert_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;
    diesel::update(job_adverts.filter(id.eq(advert_id)))
        .set(is_published.eq(true))
        .execute(conn)
}

/// Deletes an advert; its applications cascade with it.
pub fn delete_advert(
    conn: &mut SqliteConnection,
    advert_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;
    diesel::delete(job_adverts.filter(id.eq(advert_id))).execute(conn)
}

pub fn count_applications(
    conn: &mut SqliteConnection,
    advert_id: i32,
) -> Result<i64, diesel::result::Error> {
    job_applications::table
        .filter(job_applications::job_advert_id.eq(advert_id))
        .count()
        .get_result(conn)
}

/// Builds the active-adverts query, optionally narrowed by a keyword over
/// title/description/company/skills (OR) and a location substring (AND).
/// SQLite LIKE is case-insensitive for ASCII, which is what "substring
/// match" means for this data.
fn active_adverts_query(
    now: NaiveDateTime,
    keyword: Option<&str>,
    location_term: Option<&str>,
) -> job_adverts::BoxedQuery<'static, Sqlite> {
    use crate::schema::job_adverts::dsl::*;

    let mut query = job_adverts
        .filter(is_published.eq(true))
        .filter(deadline.ge(now))
        .into_boxed();

    if let Some(kw) = keyword {
        let pattern = format!("%{}%", kw);
        query = query.filter(
            title
                .like(pattern.clone())
                .or(description.like(pattern.clone()))
                .or(company_name.like(pattern.clone()))
                .nullable()
                .or(skills.like(pattern)),
        );
    }

    if let Some(term) = location_term {
        query = query.filter(location.like(format!("%{}%", term)));
    }

    query
}

/// One page of active adverts, newest first.
pub fn list_active_adverts(
    conn: &mut SqliteConnection,
    requested_page: Option<i64>,
) -> Result<Page<JobAdvert>, diesel::result::Error> {
    search_active_adverts(conn, None, None, requested_page)
}

/// One page of active adverts matching the search terms, newest first.
pub fn search_active_adverts(
    conn: &mut SqliteConnection,
    keyword: Option<&str>,
    location_term: Option<&str>,
    requested_page: Option<i64>,
) -> Result<Page<JobAdvert>, diesel::result::Error> {
    let now = Utc::now().naive_utc();

    let total_items: i64 = active_adverts_query(now, keyword, location_term)
        .count()
        .get_result(conn)?;
    let pages = total_pages(total_items, PAGE_SIZE);
    let page = clamp_page(requested_page, pages);

    let items = active_adverts_query(now, keyword, location_term)
        .order(job_adverts::created_at.desc())
        .limit(PAGE_SIZE)
        .offset(offset_for(page, PAGE_SIZE))
        .load::<JobAdvert>(conn)?;

    Ok(Page {
        items,
        page,
        total_pages: pages,
        total_items,
    })
}

/// Returns all adverts in ascending order by id, for operator tooling.
pub fn list_all_adverts(
    conn: &mut SqliteConnection,
) -> Result<Vec<JobAdvert>, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;
    job_adverts.order(id.asc()).load::<JobAdvert>(conn)
}

/// One page of a user's own adverts, active or not, newest first.
pub fn adverts_by_owner(
    conn: &mut SqliteConnection,
    owner_id: i32,
    requested_page: Option<i64>,
) -> Result<Page<JobAdvert>, diesel::result::Error> {
    use crate::schema::job_adverts::dsl::*;

    let total_items: i64 = job_adverts
        .filter(created_by.eq(owner_id))
        .count()
        .get_result(conn)?;
    let pages = total_pages(total_items, PAGE_SIZE);
    let page = clamp_page(requested_page, pages);

    let items = job_adverts
        .filter(created_by.eq(owner_id))
        .order(created_at.desc())
        .limit(PAGE_SIZE)
        .offset(offset_for(page, PAGE_SIZE))
        .load::<JobAdvert>(conn)?;

    Ok(Page {
        items,
        page,
        total_pages: pages,
        total_items,
    })
}
