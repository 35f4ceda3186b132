#![cfg(feature = "test-staging")]

//! Test scaffolding: an in-memory Rocket instance with seeded data, plus
//! synchronous connection helpers for ORM unit tests. Compiled only with
//! the `test-staging` feature so none of it can reach production builds.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use rocket_sync_db_pools::diesel;

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::mail::Mailer;
use crate::models::UserInput;
use crate::orm::login::hash_password;
use crate::orm::user::{get_user_by_email, insert_user};

/// Configures SQLite with performance-optimized settings for testing.
///
/// Sets `synchronous = OFF` and `journal_mode = OFF`. Faster but less
/// durable - only for tests.
///
/// # Panics
/// Panics if the PRAGMA commands fail to execute
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for migration");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

/// Creates a Rocket fairing that seeds the standard test accounts.
fn test_data_init_fairing() -> AdHoc {
    AdHoc::on_ignite("Test Data Initialization", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test data initialization");

        conn.run(|c| {
            if let Err(e) = create_test_data(c) {
                eprintln!("[test-data-init] ERROR: Failed to create test data: {:?}", e);
            }
        })
        .await;

        rocket
    })
}

/// Standard accounts every integration test can rely on.
fn create_test_data(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    create_test_user(conn, "owner@example.com", "ownerpass", false)?;
    create_test_user(conn, "rival@example.com", "rivalpass", false)?;
    create_test_user(conn, "testuser@example.com", "admin", false)?;
    create_test_user(conn, "admin@example.com", "admin", true)?;
    Ok(())
}

fn create_test_user(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    is_staff: bool,
) -> Result<(), diesel::result::Error> {
    if get_user_by_email(conn, email)?.is_some() {
        return Ok(());
    }

    insert_user(
        conn,
        UserInput {
            email: email.to_string(),
            password_hash: hash_password(password),
            is_staff,
        },
    )?;

    Ok(())
}

/// Creates and configures a Rocket instance for testing with a unique
/// in-memory SQLite database.
///
/// The returned instance has the connection pool attached, foreign keys
/// enabled, testing pragmas set, all migrations run, the standard test
/// accounts seeded, a capturing [`Mailer`] managed as state, and the API
/// routes mounted.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Unique shared in-memory DB per test instance
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let databases = map!["hireboard_db" => db_config];

    let figment = rocket::Config::figment().merge(("databases", databases));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(test_data_init_fairing())
        .manage(Mailer::capturing());

    crate::mount_api_routes(rocket)
}

/// Creates a synchronous in-memory SQLite connection for unit tests, with
/// migrations run and foreign keys enabled. Each call returns a new,
/// independent database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}

/// A minimal async-compatible wrapper for a synchronous SQLite connection.
///
/// Lets unit tests drive code written against the Rocket-style `.run()`
/// interface without standing up a full Rocket instance.
pub struct FakeDbConn<'a>(pub &'a mut diesel::SqliteConnection);

impl<'a> FakeDbConn<'a> {
    /// Executes a closure with a mutable reference to the underlying
    /// connection, mimicking the async `.run()` interface synchronously.
    ///
    /// # Safety
    /// Converts an immutable reference to mutable, which is sound here
    /// because tests hold exclusive access to the connection.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        unsafe {
            let conn_ptr =
                self.0 as *const diesel::SqliteConnection as *mut diesel::SqliteConnection;
            f(&mut *conn_ptr)
        }
    }
}

/// Wraps a connection from [`setup_test_db`] for async-style testing.
pub fn setup_test_dbconn<'a>(conn: &'a mut diesel::SqliteConnection) -> FakeDbConn<'a> {
    FakeDbConn(conn)
}
