//! Server construction: configuration, migrations, state wiring, and the
//! Actix listener.

mod config;

pub use config::ServerConfig;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::domain::auth::TokenService;
use backend::domain::ports::{BootcampRepository, UserRepository};
use backend::domain::services::{
    AccountService, BootcampService, CourseService, ReviewService, UserService,
};
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::configure_api;
use backend::outbound::geocode::NominatimGeocoder;
use backend::outbound::mail::{SmtpConfig, SmtpMailer};
use backend::outbound::persistence::{
    DbPool, DieselBootcampRepository, DieselCourseRepository, DieselReviewRepository,
    DieselUserRepository, PoolConfig,
};
use backend::outbound::photos::LocalPhotoStore;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations over a blocking connection.
///
/// # Errors
///
/// Propagates connection and migration failures as [`std::io::Error`].
pub async fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        Ok(())
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
}

/// Wire the production adapters into the handler state bundle.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the pool, geocoder client, or mailer
/// cannot be constructed.
pub async fn build_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let pool = DbPool::new(
        PoolConfig::new(config.database_url.clone()).with_max_size(config.db_pool_size),
    )
    .await
    .map_err(std::io::Error::other)?;

    let users: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool.clone()));
    let bootcamps: Arc<dyn BootcampRepository> =
        Arc::new(DieselBootcampRepository::new(pool.clone()));
    let courses = Arc::new(DieselCourseRepository::new(pool.clone()));
    let reviews = Arc::new(DieselReviewRepository::new(pool));

    let geocoder = Arc::new(
        NominatimGeocoder::new(config.geocoder_endpoint.clone(), &config.geocoder_user_agent)
            .map_err(std::io::Error::other)?,
    );
    let mailer = Arc::new(
        SmtpMailer::new(SmtpConfig {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            credentials: config.smtp_credentials(),
            from: config.from_email.clone(),
        })
        .map_err(std::io::Error::other)?,
    );
    let photos = Arc::new(LocalPhotoStore::new(config.upload_dir.clone()));
    let tokens = TokenService::new(config.jwt_secret.as_bytes());

    Ok(HttpState {
        account: AccountService::new(
            users.clone(),
            tokens,
            mailer,
            config.public_url.clone(),
        ),
        bootcamps: BootcampService::new(
            bootcamps.clone(),
            geocoder,
            photos,
            config.max_file_upload,
        ),
        courses: CourseService::new(courses, bootcamps.clone()),
        reviews: ReviewService::new(reviews, bootcamps),
        users: UserService::new(users),
        cookie_secure: config.cookie_secure,
    })
}

/// Construct the Actix HTTP server.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(state: HttpState, bind_addr: SocketAddr) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    let server = HttpServer::new(move || {
        let app = App::new().app_data(state.clone()).configure(configure_api);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        #[cfg(not(debug_assertions))]
        let app = app;

        app
    })
    .bind(bind_addr)?
    .run();
    Ok(server)
}
