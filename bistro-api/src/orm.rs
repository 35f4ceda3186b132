//! Database plumbing and queries for the restaurant table.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rocket::fairing::AdHoc;
use rocket_sync_db_pools::database;

use crate::models::{NewRestaurant, Restaurant};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("bistro_db")]
pub struct DbConn(diesel::SqliteConnection);

/// Runs all pending database migrations on the provided connection.
///
/// # Panics
/// Panics if any migration fails to run
pub fn run_pending_migrations(conn: &mut SqliteConnection) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run pending migrations");
}

/// Creates a Rocket fairing that runs database migrations on ignition.
pub fn run_migrations_fairing() -> AdHoc {
    AdHoc::on_ignite("Diesel Migrations", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for migration");
        conn.run(|c| {
            run_pending_migrations(c);
        })
        .await;
        rocket
    })
}

/// Returns all restaurants in ascending order by id.
pub fn list_all_restaurants(
    conn: &mut SqliteConnection,
) -> Result<Vec<Restaurant>, diesel::result::Error> {
    use crate::schema::restaurants::dsl::*;
    restaurants.order(id.asc()).load::<Restaurant>(conn)
}

pub fn get_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> Result<Option<Restaurant>, diesel::result::Error> {
    use crate::schema::restaurants::dsl::*;
    restaurants
        .filter(id.eq(restaurant_id))
        .first::<Restaurant>(conn)
        .optional()
}

pub fn insert_restaurant(
    conn: &mut SqliteConnection,
    new_restaurant: NewRestaurant,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::restaurants::dsl::*;
    diesel::insert_into(restaurants)
        .values(&new_restaurant)
        .execute(conn)
}
