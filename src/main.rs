use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::repository::database::Database;

mod api;
mod models;
mod repository;
mod utils;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database = Database::new()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let database = web::Data::new(database);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(8080);

    info!(%host, %port, "starting adversary tracker");

    HttpServer::new(move || {
        App::new()
            .app_data(database.clone())
            .configure(api::config::config)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
