use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::Serialize;

use crate::schema::job_adverts;

#[derive(Queryable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = job_adverts)]
pub struct JobAdvert {
    pub id: i32,
    pub title: String,
    pub company_name: String,
    pub experience_level: String,
    pub employment_type: String,
    pub description: String,
    pub job_type: String,
    pub location: Option<String>,
    pub is_published: bool,
    pub deadline: NaiveDateTime,
    pub skills: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = job_adverts)]
pub struct NewJobAdvert {
    pub title: String,
    pub company_name: String,
    pub experience_level: String,
    pub employment_type: String,
    pub description: String,
    pub job_type: String,
    pub location: Option<String>,
    pub is_published: bool,
    pub deadline: NaiveDateTime,
    pub skills: Option<String>,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
}

/// Owner edits. Publication state is not editable here; the publish
/// transition is one-way and has its own operation.
#[derive(AsChangeset)]
#[diesel(table_name = job_adverts, treat_none_as_null = true)]
pub struct JobAdvertChanges {
    pub title: String,
    pub company_name: String,
    pub experience_level: String,
    pub employment_type: String,
    pub description: String,
    pub job_type: String,
    pub location: Option<String>,
    pub deadline: NaiveDateTime,
    pub skills: Option<String>,
}

impl JobAdvert {
    /// An advert is active while it is published and its deadline has not
    /// passed. Derived on read; never stored.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.is_published && self.deadline >= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn advert(is_published: bool, deadline: NaiveDateTime) -> JobAdvert {
        JobAdvert {
            id: 1,
            title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            experience_level: "mid_level".to_string(),
            employment_type: "full_time".to_string(),
            description: "Build things".to_string(),
            job_type: "remote".to_string(),
            location: None,
            is_published,
            deadline,
            skills: Some("rust,sql".to_string()),
            created_by: 1,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn published_with_future_deadline_is_active() {
        let now = Utc::now().naive_utc();
        assert!(advert(true, now + Duration::days(1)).is_active_at(now));
    }

    #[test]
    fn published_with_past_deadline_is_not_active() {
        let now = Utc::now().naive_utc();
        assert!(!advert(true, now - Duration::days(1)).is_active_at(now));
    }

    #[test]
    fn unpublished_is_never_active() {
        let now = Utc::now().naive_utc();
        assert!(!advert(false, now + Duration::days(1)).is_active_at(now));
    }
}
