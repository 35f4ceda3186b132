use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};
use serde::Serialize;

use crate::schema::job_applications;

#[derive(Queryable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = job_applications)]
pub struct JobApplication {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub portfolio_url: Option<String>,
    pub resume: String, // Opaque reference to the externally stored upload
    pub status: String,
    pub job_advert_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = job_applications)]
pub struct NewJobApplication {
    pub name: String,
    pub email: String,
    pub portfolio_url: Option<String>,
    pub resume: String,
    pub status: String,
    pub job_advert_id: i32,
    pub created_at: NaiveDateTime,
}
