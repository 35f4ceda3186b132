// bistro-api/src/main.rs

#[rocket::main]
async fn main() {
    dotenvy::dotenv().ok();

    bistro_api::rocket()
        .launch()
        .await
        .expect("Rocket server failed to launch");
}
