use actix_cors::Cors;
use actix_web::{
    dev::Server, error::JsonPayloadError, http::header, middleware, web, App,
    HttpRequest, HttpServer,
};

use crate::{
    configuration::{AppState, Config, State},
    controller::{auth, pricing, profile, reservations, subscribe},
    error::Error,
};

const ALLOWED_METHODS: [&str; 6] = ["DELETE", "GET", "OPTIONS", "PATCH", "POST", "PUT"];

const ALLOWED_HEADERS: [&str; 14] = [
    "accept",
    "accept-encoding",
    "authorization",
    "content-type",
    "dnt",
    "origin",
    "user-agent",
    "x-csrftoken",
    "x-requested-with",
    "x-goog-authuser",
    "x-origin",
    "sec-fetch-dest",
    "sec-fetch-mode",
    "sec-fetch-site",
];

const PREFLIGHT_MAX_AGE: usize = 24 * 60 * 60;

pub async fn server_task(app_state: &AppState<State>) -> Result<(), Error> {
    let app = app_state.clone();
    tokio::spawn(async move {
        let server = init_server(app)?;
        server.await?;
        Ok(())
    })
    .await?
}

pub fn cors(config: &Config) -> Cors {
    let allowed_origins = config.allowed_origins.clone();
    let cors_access_all = allowed_origins.iter().any(|origin| origin == "*");

    Cors::default()
        .allowed_origin_fn(move |origin, _| {
            if cors_access_all {
                return true;
            }
            if let Ok(origin) = origin.to_str() {
                return allowed_origins.iter().any(|item| item == origin);
            }
            false
        })
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers(ALLOWED_HEADERS)
        .expose_headers([header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE)
}

fn json_error(err: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    Error::BadRequest(err.to_string()).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error)
}

/// Registers every API route; mounted under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::google)
        .service(auth::login)
        .service(auth::registration)
        .service(auth::refresh)
        .service(auth::logout)
        .service(auth::current_user)
        .service(reservations::list)
        .service(reservations::create)
        .service(reservations::retrieve)
        .service(reservations::replace)
        .service(reservations::update)
        .service(reservations::destroy)
        .service(reservations::toggle_complete)
        .service(reservations::toggle_payment)
        .service(reservations::flight_status)
        .service(profile::index)
        .service(profile::set_plan)
        .service(pricing::quote)
        .service(pricing::index)
        .service(pricing::update)
        .service(subscribe::post_index)
        .service(subscribe::delete_index);
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;

    tracing::info!("Listening on {}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(&app_state.config))
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Compress::default())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(json_config())
            .service(web::scope("/api").configure(configure))
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
