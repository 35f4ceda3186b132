use chrono::Utc;
use diesel::prelude::*;

use crate::models::{NewUser, User, UserInput};
use crate::orm::db::last_insert_rowid;

/// Inserts a new user. New accounts start active; staff status comes from
/// the caller (operator CLI or the bootstrap fairing).
pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: UserInput,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let insertable_user = NewUser {
        email: new_user.email,
        password_hash: new_user.password_hash,
        is_active: true,
        is_staff: new_user.is_staff,
        created_at: Utc::now().naive_utc(),
    };

    diesel::insert_into(users)
        .values(&insertable_user)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    users.filter(id.eq(last_id)).first::<User>(conn)
}

pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(id.eq(user_id)).first::<User>(conn).optional()
}

pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    target_email: &str,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(email.eq(target_email))
        .first::<User>(conn)
        .optional()
}

/// Returns all users in ascending order by id.
pub fn list_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.order(id.asc()).load::<User>(conn)
}

pub fn set_password_hash(
    conn: &mut SqliteConnection,
    user_id: i32,
    new_hash: &str,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    diesel::update(users.filter(id.eq(user_id)))
        .set(password_hash.eq(new_hash))
        .execute(conn)
}

/// Deletes a user row. Sessions, tokens, and adverts cascade with it.
pub fn delete_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    diesel::delete(users.filter(id.eq(user_id))).execute(conn)
}

#[cfg(all(test, feature = "test-staging"))]
mod tests {
    use super::*;
    use crate::orm::login::hash_password;
    use crate::orm::testing::setup_test_db;

    #[test]
    fn insert_then_lookup_by_email() {
        let mut conn = setup_test_db();
        let created = insert_user(
            &mut conn,
            UserInput {
                email: "first@example.com".to_string(),
                password_hash: hash_password("pw"),
                is_staff: true,
            },
        )
        .expect("insert user");

        assert!(created.is_active);
        assert!(created.is_staff);

        let found = get_user_by_email(&mut conn, "first@example.com")
            .expect("lookup")
            .expect("user exists");
        assert_eq!(found.id, created.id);
    }

    #[test]
    fn set_password_hash_replaces_stored_hash() {
        let mut conn = setup_test_db();
        let created = insert_user(
            &mut conn,
            UserInput {
                email: "first@example.com".to_string(),
                password_hash: hash_password("old"),
                is_staff: false,
            },
        )
        .expect("insert user");

        let new_hash = hash_password("new");
        let changed = set_password_hash(&mut conn, created.id, &new_hash).expect("update");
        assert_eq!(changed, 1);

        let reloaded = get_user(&mut conn, created.id).expect("lookup").unwrap();
        assert_eq!(reloaded.password_hash, new_hash);
    }
}
