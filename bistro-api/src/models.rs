use diesel::{Identifiable, Insertable, Queryable};
use serde::Serialize;

use crate::schema::restaurants;

#[derive(Queryable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = restaurants)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub cuisine: String,
    pub address: String,
    pub rating: f64,
}

#[derive(Insertable)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant {
    pub name: String,
    pub cuisine: String,
    pub address: String,
    pub rating: f64,
}
