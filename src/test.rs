pub use axum::http::header::AUTHORIZATION;
pub use axum_test::TestServer;
pub use serde_json::{json, Value};

pub use crate::Database;

use argon2::Argon2;
use axum::http::HeaderValue;
use chrono::Duration;

use crate::{image::ImageStore, route, token::TokenSigner, State};

/// Builds a [`TestServer`] around the full router, backed by the given pool.
///
/// Attachments go to a per-server temp directory; tokens are signed with a
/// fixed test secret.
pub fn app(pool: Database) -> TestServer {
	let state = State {
		database: pool,
		hasher: Argon2::default(),
		tokens: TokenSigner::new(b"test-secret", Duration::hours(24)),
		images: ImageStore::new(
			std::env::temp_dir().join(format!("rv-journal-test-{}", uuid::Uuid::new_v4())),
		),
	};

	TestServer::new(route::router(state)).expect("failed to start test server")
}

/// Registers a user and returns their bearer token.
pub async fn register(app: &TestServer, username: &str, email: &str) -> String {
	let response = app
		.post("/auth/register")
		.json(&json!({
			"username": username,
			"email": email,
			"password": "Hunter2hunter",
			"password_confirmation": "Hunter2hunter",
		}))
		.await;

	assert_eq!(response.status_code(), 201);

	response.json::<Value>()["token"]
		.as_str()
		.expect("no token in register response")
		.to_owned()
}

/// Formats a bearer token as an `Authorization` header value.
pub fn bearer(token: &str) -> HeaderValue {
	HeaderValue::from_str(&format!("Bearer {token}")).expect("invalid header value")
}
