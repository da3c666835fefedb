use actix_web::{
    App, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Condition, Logger, from_fn},
    web::{self, Data},
};
use api::{create, db, delete, list, nested, show, update};
use app_data::AppData;
use clap::Parser;
use cli::Cli;
use environment::Environment;
use log::LevelFilter;

mod api;
pub mod app_data;
mod cli;
pub mod database;
pub mod environment;
mod middleware;
#[cfg(test)]
mod test_utils;

pub fn build_app(
    app_data: AppData,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let quiet = app_data.quiet;

    App::new()
        .app_data(Data::new(app_data))
        .wrap(from_fn(middleware::read_only))
        .wrap(from_fn(middleware::delay))
        .wrap(middleware::no_cache())
        .wrap(Condition::new(!quiet, Logger::default()))
        .service(db::db)
        .service(nested::list_nested)
        .service(nested::create_nested)
        .service(show::show)
        .service(update::update)
        .service(delete::delete_document)
        .service(list::list)
        .service(create::create)
        .service(update::update_singleton)
        .default_service(web::to(api::not_found))
}

/// `info` unless `RUST_LOG` says otherwise. Quiet mode only reports errors.
fn init_logger(quiet: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    if quiet {
        builder.filter_level(LevelFilter::Error);
    } else {
        builder.filter_level(LevelFilter::Info);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
    }
    builder.init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let environment = Environment::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load .env: {}", e)))?;

    let cli = Cli::parse();
    init_logger(cli.quiet);
    if let Some(path) = environment.dotenv_path {
        log::debug!("Loaded {}", path.display());
    }

    let app_data = AppData::new(&cli)?;

    if !cli.quiet {
        log::info!("jsonrest starting...");
        log::info!("Loaded {}", cli.source.display());
        let base = format!("http://{}:{}", cli.host, cli.port);
        for (name, kind) in app_data.database.jsonrest.resources().await {
            log::info!("{}/{} ({})", base, name, kind);
        }
        if cli.fake {
            log::info!("Fake mode: writes are answered but not stored");
        }
    }

    HttpServer::new(move || build_app(app_data.clone()))
        .bind((cli.host.as_str(), cli.port))?
        .run()
        .await
}
