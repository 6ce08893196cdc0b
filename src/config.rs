use std::path::PathBuf;

use chrono::Duration;

/// Process-wide configuration, read from the environment once at startup and
/// injected into the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
	/// Postgres connection string.
	pub database_url: String,
	/// Port the HTTP server binds to.
	pub port: u16,
	/// Secret the bearer tokens are signed with.
	pub token_secret: String,
	/// How long an issued token stays valid.
	pub token_ttl: Duration,
	/// Directory image attachments are stored under.
	pub upload_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{0} must be a number")]
	NotANumber(&'static str),
}

impl Config {
	/// Reads the configuration from the environment.
	///
	/// `DATABASE_URL` and `TOKEN_SECRET` are required; everything else has a
	/// default.
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self {
			database_url: require("DATABASE_URL")?,
			port: match std::env::var("PORT") {
				Ok(port) => port.parse().map_err(|_| ConfigError::NotANumber("PORT"))?,
				Err(_) => 3000,
			},
			token_secret: require("TOKEN_SECRET")?,
			token_ttl: match std::env::var("TOKEN_TTL_HOURS") {
				Ok(hours) => Duration::hours(
					hours
						.parse()
						.map_err(|_| ConfigError::NotANumber("TOKEN_TTL_HOURS"))?,
				),
				Err(_) => Duration::hours(24),
			},
			upload_dir: std::env::var("UPLOAD_DIR").map_or_else(|_| "uploads".into(), PathBuf::from),
		})
	}
}

fn require(name: &'static str) -> Result<String, ConfigError> {
	std::env::var(name).map_err(|_| ConfigError::Missing(name))
}
