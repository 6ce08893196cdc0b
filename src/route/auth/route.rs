use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{extract::State, http::StatusCode};

use crate::{
	extract::{Json, Session},
	AppState,
};

use super::{model, Error, RouteError};

/// Hashes a password into a PHC string with a freshly generated salt.
fn hash_password(hasher: &Argon2, password: &str) -> Result<String, Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Verifies a password against a stored PHC string.
fn verify_password(hasher: &Argon2, password: &str, hash: &str) -> Result<bool, Error> {
	let parsed = PasswordHash::new(hash)?;

	Ok(hasher.verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Registers a new account and returns a bearer token for it.
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<(StatusCode, Json<model::TokenResponse>), RouteError> {
	let password_hash = hash_password(&state.hasher, &input.password)?;

	let user = sqlx::query_as::<_, model::User>(
		r#"
			INSERT INTO users (email, username, password_hash)
			VALUES ($1, $2, $3)
			RETURNING *
		"#,
	)
	.bind(&input.email)
	.bind(&input.username)
	.bind(&password_hash)
	.fetch_one(&state.database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("users_email_key") => Error::EmailTaken.into(),
			Some("users_username_lower_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	let token = state.tokens.sign(user.id, &user.email).map_err(Error::Token)?;

	Ok((StatusCode::CREATED, Json(model::TokenResponse { token, user })))
}

/// Exchanges a correct email and password for a fresh bearer token.
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<Json<model::TokenResponse>, RouteError> {
	let user = sqlx::query_as::<_, model::User>("SELECT * FROM users WHERE email = $1")
		.bind(&input.email)
		.fetch_optional(&state.database)
		.await?;

	// The same error for an unknown email and a wrong password, so the
	// response cannot be used to probe which accounts exist.
	let Some(user) = user else {
		return Err(Error::InvalidCredentials.into());
	};

	if !verify_password(&state.hasher, &input.password, &user.password_hash)? {
		return Err(Error::InvalidCredentials.into());
	}

	let token = state.tokens.sign(user.id, &user.email).map_err(Error::Token)?;

	Ok(Json(model::TokenResponse { token, user }))
}

/// Confirms the presented bearer token is valid and returns its user.
pub async fn verify(session: Session) -> Json<model::VerifyResponse> {
	Json(model::VerifyResponse {
		valid: true,
		user: session.user,
	})
}
