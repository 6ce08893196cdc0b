use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::route::model::{not_blank, plausible_year, positive_length};

/// A single RV, owned by a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rv {
	pub id: Uuid,
	pub user_id: Uuid,
	pub name: String,
	pub make: Option<String>,
	pub model: Option<String>,
	pub year: Option<i32>,
	/// Exterior length in feet.
	pub length: Option<f64>,
	pub description: Option<String>,
	/// Whether this is the rig the user currently travels with. At most one
	/// RV per user holds the flag at a time.
	pub is_current: bool,
	/// Stored attachment name, if an image was uploaded.
	pub image: Option<String>,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRvInput {
	#[validate(custom(function = "not_blank"))]
	pub name: String,
	pub make: Option<String>,
	pub model: Option<String>,
	#[validate(custom(function = "plausible_year"))]
	pub year: Option<i32>,
	#[validate(custom(function = "positive_length"))]
	pub length: Option<f64>,
	pub description: Option<String>,
	pub is_current: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRvInput {
	#[validate(custom(function = "not_blank"))]
	pub name: Option<String>,
	pub make: Option<String>,
	pub model: Option<String>,
	#[validate(custom(function = "plausible_year"))]
	pub year: Option<i32>,
	#[validate(custom(function = "positive_length"))]
	pub length: Option<f64>,
	pub description: Option<String>,
	pub is_current: Option<bool>,
}
