use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A single user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The user's primary email address, used for logging in.
	pub email: String,
	/// The name the user registered under. Unique, ignoring case.
	pub username: String,
	/// Optional public display name.
	pub display_name: Option<String>,
	/// Optional free-text bio.
	pub bio: Option<String>,
	/// The salted password hash, in PHC string format. Never serialized.
	#[serde(skip_serializing)]
	pub password_hash: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
	if !username
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || c == '_')
	{
		return Err(ValidationError::new(
			"may only contain letters, digits and underscores",
		));
	}

	Ok(())
}

/// The password policy: at least one uppercase letter, one lowercase letter
/// and one digit. Length bounds live on the field.
fn validate_password(password: &str) -> Result<(), ValidationError> {
	let has_upper = password.chars().any(char::is_uppercase);
	let has_lower = password.chars().any(char::is_lowercase);
	let has_digit = password.chars().any(|c| c.is_ascii_digit());

	if !(has_upper && has_lower && has_digit) {
		return Err(ValidationError::new(
			"must contain an uppercase letter, a lowercase letter and a digit",
		));
	}

	Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 30), custom(function = "validate_username"))]
	pub username: String,
	#[validate(length(min = 8, max = 128), custom(function = "validate_password"))]
	pub password: String,
	#[validate(must_match(other = "password"))]
	pub password_confirmation: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	pub password: String,
}

/// A freshly issued bearer token, together with the user it belongs to.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
	pub token: String,
	pub user: User,
}

/// Response of the token verification endpoint.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
	pub valid: bool,
	pub user: User,
}
