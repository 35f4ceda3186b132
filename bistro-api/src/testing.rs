#![cfg(feature = "test-staging")]

//! In-memory Rocket instance with a seeded restaurant table for tests.

use diesel::sqlite::SqliteConnection;
use rocket::fairing::AdHoc;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket};

use crate::models::NewRestaurant;
use crate::orm::{DbConn, insert_restaurant, run_pending_migrations};

fn seed_restaurants(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    let rows = [
        ("Casa Piccola", "italian", "12 Vine Street", 4.5),
        ("Mama Put", "nigerian", "3 Broad Street", 4.8),
        ("Golden Wok", "chinese", "88 Canal Road", 4.1),
    ];

    for (name, cuisine, address, rating) in rows {
        insert_restaurant(
            conn,
            NewRestaurant {
                name: name.to_string(),
                cuisine: cuisine.to_string(),
                address: address.to_string(),
                rating,
            },
        )?;
    }
    Ok(())
}

fn seed_data_fairing() -> AdHoc {
    AdHoc::on_ignite("Seed Restaurants", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for seeding");
        conn.run(|c| {
            if let Err(e) = seed_restaurants(c) {
                eprintln!("[test-data-init] ERROR: Failed to seed restaurants: {:?}", e);
            }
        })
        .await;
        rocket
    })
}

/// A Rocket instance over a unique in-memory database with migrations run
/// and three restaurants seeded.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    let unique_db_name = format!("file:bistro_test_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };
    let databases = map!["bistro_db" => db_config];

    let figment = rocket::Config::figment().merge(("databases", databases));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(AdHoc::on_ignite("Diesel Migrations", |rocket| async {
            let conn = DbConn::get_one(&rocket)
                .await
                .expect("database connection for migration");
            conn.run(|c| run_pending_migrations(c)).await;
            rocket
        }))
        .attach(seed_data_fairing());

    crate::mount_api_routes(rocket)
}
