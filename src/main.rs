#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod image;
mod ratelimit;
mod route;
#[cfg(test)]
mod test;
mod token;

use argon2::Argon2;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::Config;
pub use error::Error;

use image::ImageStore;
use token::TokenSigner;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool, a hash configuration (if it's expensive
/// to create), or a cache client.
///
/// For dependencies only used by a single handler, you can combine states instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub tokens: TokenSigner,
	pub images: ImageStore,
}

impl State {
	fn new(database: Database, config: &Config) -> Self {
		Self {
			database,
			hasher: Argon2::default(),
			tokens: TokenSigner::new(config.token_secret.as_bytes(), config.token_ttl),
			images: ImageStore::new(config.upload_dir.clone()),
		}
	}
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "rv_journal=debug,tower_http=debug".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let config = Config::from_env().expect("invalid configuration");

	let database = sqlx::postgres::PgPoolOptions::new()
		.max_connections(10)
		.acquire_timeout(std::time::Duration::from_secs(5))
		.connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let limiter = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&limiter]);

	let app = route::router(State::new(database, &config))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new())
				.layer(PropagateRequestIdLayer::x_request_id()),
		)
		.layer(GovernorLayer { config: limiter });

	let port = config.port;
	let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
	)
	.await
	.unwrap();
}
