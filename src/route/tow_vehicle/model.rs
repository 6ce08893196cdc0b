use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::route::model::{not_blank, plausible_year};

/// A single tow vehicle, owned by a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TowVehicle {
	pub id: Uuid,
	pub user_id: Uuid,
	pub name: String,
	pub make: String,
	pub model: String,
	pub year: i32,
	pub description: Option<String>,
	/// Whether this is the vehicle the user currently tows with. At most one
	/// tow vehicle per user holds the flag, independently of the RV flag.
	pub is_current: bool,
	/// Stored attachment name, if an image was uploaded.
	pub image: Option<String>,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTowVehicleInput {
	#[validate(custom(function = "not_blank"))]
	pub name: String,
	#[validate(custom(function = "not_blank"))]
	pub make: String,
	#[validate(custom(function = "not_blank"))]
	pub model: String,
	#[validate(custom(function = "plausible_year"))]
	pub year: i32,
	pub description: Option<String>,
	pub is_current: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTowVehicleInput {
	#[validate(custom(function = "not_blank"))]
	pub name: Option<String>,
	#[validate(custom(function = "not_blank"))]
	pub make: Option<String>,
	#[validate(custom(function = "not_blank"))]
	pub model: Option<String>,
	#[validate(custom(function = "plausible_year"))]
	pub year: Option<i32>,
	pub description: Option<String>,
	pub is_current: Option<bool>,
}
