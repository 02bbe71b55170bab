use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use tracker_backend::config::Config;
use tracker_backend::db::Store;
use tracker_backend::{configure_app, not_found};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load()?;
    let store = Store::init(&config.database_path)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!("Using database {}", store.path().display());

    let bind = config.bind_address();
    info!("Server running at http://{}", bind);

    let json_limit = config.json_limit;
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure_app(store.clone(), json_limit))
            .default_service(web::route().to(not_found))
    })
    .bind(bind)?
    .run()
    .await
}
